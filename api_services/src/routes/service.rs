use std::sync::Arc;

use actix_web::{Responder, delete, get, post, web};
use common::{
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
    validate::Validate,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::service::CreateServiceRequest;
use crate::services;

#[get("")]
pub async fn get_services(pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let services = services::service::list_services(&pool).await?;
    Success::ok(services)
}

#[get("/{id}")]
pub async fn get_service(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let service = services::service::get_service(&pool, path.into_inner()).await?;
    Success::ok(service)
}

/// Creates a catalog service offered by the calling salon.
///
/// # Input
/// - `req`: `{ name, gender, price: { amount, currency? } }`
///
/// # Output
/// - Success: 201 with the salon's new offering
/// - Error: `existed` when a service with the same name (ignoring case) and
///   gender is already in the catalog
///
/// # Frontend Example
/// ```javascript
/// await fetch('/api/service', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   },
///   body: JSON.stringify({ name: 'Hair cut', gender: 'male', price: { amount: 80000 } })
/// });
/// ```
#[post("")]
pub async fn post_service(
    req: web::Json<CreateServiceRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    req.validated("Create service failed")?;
    let price = req
        .price
        .as_ref()
        .ok_or_else(|| AppError::Required("Price is required".to_string()))?
        .to_price()?;

    let created =
        services::service::create_service(&pool, &claims, &req.name, &req.gender, price).await?;
    Success::created("Create service successfully", created)
}

#[delete("/{id}")]
pub async fn delete_service(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    services::service::delete_service(&pool, &claims, path.into_inner()).await?;
    Success::message("Delete service successfully")
}
