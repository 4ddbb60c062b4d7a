use common::{
    misc::Gender,
    validate::{Checker, Validate},
};
use db::models::account::AccountDetails;
use serde::{Deserialize, Serialize};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub avatar: Option<String>,
}

impl Validate for RegisterUserRequest {
    fn validate(&self, c: &mut Checker) {
        check_identity(c, &self.username, &self.email, &self.password, &self.phone_number);
        if c.required("first_name", &self.first_name) {
            c.max_len("first_name", &self.first_name, 150);
        }
        if c.required("last_name", &self.last_name) {
            c.max_len("last_name", &self.last_name, 150);
        }
        c.one_of("gender", &self.gender, &Gender::CHOICES);
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RegisterSalonRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub salon_name: String,
    pub address_url: String,
    pub avatar: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Validate for RegisterSalonRequest {
    fn validate(&self, c: &mut Checker) {
        check_identity(c, &self.username, &self.email, &self.password, &self.phone_number);
        if c.required("salon_name", &self.salon_name) {
            c.max_len("salon_name", &self.salon_name, 255);
        }
        c.required("address_url", &self.address_url);
    }
}

fn check_identity(c: &mut Checker, username: &str, email: &str, password: &str, phone: &str) {
    if c.required("username", username) {
        c.max_len("username", username, 255);
        if username.contains(char::is_whitespace) {
            c.add("username", "Username must not contain spaces");
        }
    }
    c.email("email", email);
    if c.required("password", password) {
        c.min_len("password", password, MIN_PASSWORD_LEN);
    }
    c.phone("phone_number", phone);
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self, c: &mut Checker) {
        c.required("email_or_username", &self.email_or_username);
        c.required("password", &self.password);
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct VerifyRequest {
    pub email: String,
    pub otp: String,
}

impl Validate for VerifyRequest {
    fn validate(&self, c: &mut Checker) {
        c.required("email", &self.email);
        c.required("otp", &self.otp);
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ResendOtpRequest {
    pub email: String,
}

impl Validate for ResendOtpRequest {
    fn validate(&self, c: &mut Checker) {
        c.email("email", &self.email);
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: AccountDetails,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::{AppError, ErrorCode};

    fn customer() -> RegisterUserRequest {
        RegisterUserRequest {
            username: "lan.nguyen".to_string(),
            email: "lan@example.com".to_string(),
            password: "s3cret-pass".to_string(),
            phone_number: "0912345678".to_string(),
            first_name: "Lan".to_string(),
            last_name: "Nguyen".to_string(),
            gender: "female".to_string(),
            avatar: None,
        }
    }

    #[test]
    fn complete_customer_passes() {
        assert!(customer().validated("Register user failed").is_ok());
    }

    #[test]
    fn unknown_gender_is_invalid() {
        let mut req = customer();
        req.gender = "unicorn".to_string();
        let err = req.validated("Register user failed").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Invalid);
    }

    #[test]
    fn short_password_is_invalid() {
        let mut req = customer();
        req.password = "short".to_string();
        match req.validated("Register user failed").unwrap_err() {
            AppError::Validation { errors, .. } => assert!(errors.contains_key("password")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn salon_without_address_url_is_required() {
        let body: RegisterSalonRequest = serde_json::from_value(serde_json::json!({
            "username": "hair.house",
            "email": "hair@example.com",
            "password": "s3cret-pass",
            "phone_number": "0987654321",
            "salon_name": "Hair House",
        }))
        .unwrap();

        match body.validated("Register salon failed").unwrap_err() {
            AppError::Validation { code, errors, .. } => {
                assert_eq!(code, ErrorCode::Required);
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key("address_url"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
