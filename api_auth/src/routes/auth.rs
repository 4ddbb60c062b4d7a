use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{
    env_config::Config,
    error::Res,
    http::Success,
    mailer::Mailer,
    misc::AccountKind,
    validate::Validate,
};
use locator::AddressResolver;
use sqlx::PgPool;

use crate::dtos::auth::{
    AuthResponse, LoginRequest, RegisterSalonRequest, RegisterUserRequest, ResendOtpRequest,
    VerifyRequest,
};
use crate::services;

/// Registers a customer account and mails its one-time password.
///
/// # Input
/// - `req`: JSON payload with username, email, password, phone number, names and gender
///
/// # Output
/// - Success: 201 with the created account and an access token
/// - Error: `required`/`invalid` for malformed fields, `existed` when the
///   username, email or phone number is taken
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/register-user', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({
///     username: 'lan.nguyen',
///     email: 'lan@example.com',
///     password: 's3cret-pass',
///     phone_number: '0912345678',
///     first_name: 'Lan',
///     last_name: 'Nguyen',
///     gender: 'female'
///   })
/// });
/// const { data } = await response.json();
/// localStorage.setItem('authToken', data.access_token);
/// ```
#[post("/register-user")]
pub async fn post_register_user(
    req: web::Json<RegisterUserRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    mailer: web::Data<Mailer>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    req.validated("Register user failed")?;

    let pg_pool: &PgPool = &pool;
    let account = services::auth::register_customer(pg_pool, &mailer, req).await?;
    let access_token = services::auth::issue_token(&account.account, &config.jwt_config)?;
    Success::created(
        "Register user successfully",
        AuthResponse {
            account,
            access_token,
        },
    )
}

/// Registers a salon account. The `address_url` is a map share link that is
/// resolved into the salon's address before anything is stored.
#[post("/register-salon")]
pub async fn post_register_salon(
    req: web::Json<RegisterSalonRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    mailer: web::Data<Mailer>,
    resolver: web::Data<AddressResolver>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    req.validated("Register salon failed")?;

    let pg_pool: &PgPool = &pool;
    let account = services::auth::register_salon(pg_pool, &mailer, &resolver, req).await?;
    let access_token = services::auth::issue_token(&account.account, &config.jwt_config)?;
    Success::created(
        "Register salon successfully",
        AuthResponse {
            account,
            access_token,
        },
    )
}

#[post("/login-user")]
pub async fn post_login_user(
    req: web::Json<LoginRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    login(AccountKind::Customer, req.into_inner(), &pool, &config).await
}

#[post("/login-salon")]
pub async fn post_login_salon(
    req: web::Json<LoginRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    login(AccountKind::Salon, req.into_inner(), &pool, &config).await
}

async fn login(
    kind: AccountKind,
    req: LoginRequest,
    pool: &PgPool,
    config: &Config,
) -> Res<impl Responder + use<>> {
    req.validated("Login failed")?;

    let account = services::auth::authenticate(pool, kind, &req).await?;
    let access_token = services::auth::issue_token(&account, &config.jwt_config)?;
    let account = db::account::get_account_details(pool, account).await?;
    Success::ok_with(
        "Login successfully",
        AuthResponse {
            account,
            access_token,
        },
    )
}

/// Confirms the emailed one-time password of a customer.
///
/// # Output
/// - Success: the verified account
/// - Error: `verify_fail` on a wrong code, `invalid` when already verified,
///   `not_found` for an unknown email
#[post("/verify-user")]
pub async fn post_verify_user(
    req: web::Json<VerifyRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    req.validated("Verify failed")?;
    let account = services::auth::verify(&pool, AccountKind::Customer, &req).await?;
    Success::ok_with("Verify successfully", account)
}

#[post("/verify-salon")]
pub async fn post_verify_salon(
    req: web::Json<VerifyRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    req.validated("Verify failed")?;
    let account = services::auth::verify(&pool, AccountKind::Salon, &req).await?;
    Success::ok_with("Verify successfully", account)
}

#[post("/resend-otp")]
pub async fn post_resend_otp(
    req: web::Json<ResendOtpRequest>,
    pool: web::Data<Arc<PgPool>>,
    mailer: web::Data<Mailer>,
) -> Res<impl Responder> {
    req.validated("Resend OTP failed")?;
    services::auth::resend_otp(&pool, &mailer, &req).await?;
    Success::message("A new OTP was sent")
}
