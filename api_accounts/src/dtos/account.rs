use common::{
    misc::Gender,
    validate::{Checker, Validate},
};
use db::dtos::account::{ProfileUpdateRequest, SalonFilter, SalonSort};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct UpdateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub phone_number: Option<String>,
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self, c: &mut Checker) {
        if let Some(first_name) = &self.first_name {
            if c.required("first_name", first_name) {
                c.max_len("first_name", first_name, 150);
            }
        }
        if let Some(last_name) = &self.last_name {
            if c.required("last_name", last_name) {
                c.max_len("last_name", last_name, 150);
            }
        }
        if let Some(gender) = &self.gender {
            c.one_of("gender", gender, &Gender::CHOICES);
        }
        if let Some(phone_number) = &self.phone_number {
            c.phone("phone_number", phone_number);
        }
        if let Some(avatar) = &self.avatar {
            c.max_len("avatar", avatar, 256);
        }
    }
}

impl From<UpdateCustomerRequest> for ProfileUpdateRequest {
    fn from(req: UpdateCustomerRequest) -> Self {
        ProfileUpdateRequest {
            first_name: req.first_name.map(|v| v.trim().to_string()),
            last_name: req.last_name.map(|v| v.trim().to_string()),
            gender: req.gender.map(|v| v.trim().to_lowercase()),
            avatar: req.avatar,
            phone_number: req.phone_number.map(|v| v.trim().to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSalonRequest {
    pub salon_name: Option<String>,
    pub avatar: Option<String>,
    pub background_image: Option<String>,
    pub phone_number: Option<String>,
    pub is_closed: Option<bool>,
}

impl Validate for UpdateSalonRequest {
    fn validate(&self, c: &mut Checker) {
        if let Some(salon_name) = &self.salon_name {
            if c.required("salon_name", salon_name) {
                c.max_len("salon_name", salon_name, 255);
            }
        }
        if let Some(phone_number) = &self.phone_number {
            c.phone("phone_number", phone_number);
        }
        if let Some(avatar) = &self.avatar {
            c.max_len("avatar", avatar, 256);
        }
        if let Some(background_image) = &self.background_image {
            c.max_len("background_image", background_image, 256);
        }
    }
}

impl From<UpdateSalonRequest> for ProfileUpdateRequest {
    fn from(req: UpdateSalonRequest) -> Self {
        ProfileUpdateRequest {
            salon_name: req.salon_name.map(|v| v.trim().to_string()),
            avatar: req.avatar,
            background_image: req.background_image,
            phone_number: req.phone_number.map(|v| v.trim().to_string()),
            is_closed: req.is_closed,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SalonQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl From<SalonQuery> for SalonFilter {
    fn from(query: SalonQuery) -> Self {
        SalonFilter {
            query: query.q,
            sort: query.sort.as_deref().and_then(SalonSort::parse),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AddressRequest {
    pub address_url: String,
}

impl Validate for AddressRequest {
    fn validate(&self, c: &mut Checker) {
        c.required("address_url", &self.address_url);
    }
}
