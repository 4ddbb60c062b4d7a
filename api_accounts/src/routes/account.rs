use std::sync::Arc;

use actix_web::{Responder, delete, get, patch, web};
use common::{
    error::Res, http::Success, jwt::JwtClaims, misc::AccountKind, validate::Validate,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::account::{SalonQuery, UpdateCustomerRequest, UpdateSalonRequest};
use crate::services;

/// Endpoint to retrieve the authenticated account with its address.
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/account/me', {
///   headers: { 'Authorization': `Bearer ${localStorage.getItem('authToken')}` }
/// });
/// const { data } = await response.json();
/// ```
#[get("/me")]
pub async fn get_me(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let account = services::account::get_me(&pool, &claims).await?;
    Success::ok(account)
}

#[get("/user")]
pub async fn get_customers(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    claims.require_admin()?;
    let customers = services::account::list_customers(&pool).await?;
    Success::ok(customers)
}

#[get("/user/{id}")]
pub async fn get_customer(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let account =
        services::account::get_account(&pool, AccountKind::Customer, path.into_inner()).await?;
    Success::ok(account)
}

#[patch("/user/{id}")]
pub async fn patch_customer(
    path: web::Path<Uuid>,
    req: web::Json<UpdateCustomerRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    req.validated("Update user failed")?;
    let account = services::account::update_profile(
        &pool,
        &claims,
        AccountKind::Customer,
        path.into_inner(),
        req.into(),
    )
    .await?;
    Success::ok_with("Update user successfully", account)
}

/// Deactivates a customer. Admin only.
#[delete("/user/{id}")]
pub async fn delete_customer(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let account =
        services::account::deactivate(&pool, &claims, AccountKind::Customer, path.into_inner())
            .await?;
    Success::ok_with("Deactivate user successfully", account)
}

/// Lists active salons.
///
/// # Input
/// - `q`: optional case-insensitive fragment of the salon name
/// - `sort`: optional `salon_name`, `created_at`, `vote_rate` or
///   `total_completed_booking`, prefixed with `-` for descending order
#[get("/salon")]
pub async fn get_salons(
    query: web::Query<SalonQuery>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let salons = services::account::search_salons(&pool, query.into_inner().into()).await?;
    Success::ok(salons)
}

#[get("/salon/{id}")]
pub async fn get_salon(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let account =
        services::account::get_account(&pool, AccountKind::Salon, path.into_inner()).await?;
    Success::ok(account)
}

#[patch("/salon/{id}")]
pub async fn patch_salon(
    path: web::Path<Uuid>,
    req: web::Json<UpdateSalonRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let req = req.into_inner();
    req.validated("Update salon failed")?;
    let account = services::account::update_profile(
        &pool,
        &claims,
        AccountKind::Salon,
        path.into_inner(),
        req.into(),
    )
    .await?;
    Success::ok_with("Update salon successfully", account)
}

#[delete("/salon/{id}")]
pub async fn delete_salon(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let account =
        services::account::deactivate(&pool, &claims, AccountKind::Salon, path.into_inner())
            .await?;
    Success::ok_with("Deactivate salon successfully", account)
}
