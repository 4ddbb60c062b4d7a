use std::sync::Arc;

use actix_web::{Responder, delete, get, patch, post, web};
use common::{
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
    validate::Validate,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::service::{AttachServiceRequest, UpdatePriceRequest};
use crate::services;

#[get("")]
pub async fn get_own_salon_services(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    claims.require_salon()?;
    let offered = db::service::list_salon_services(&***pool, claims.account_id).await?;
    Success::ok(offered)
}

#[get("/salon/{salon_id}")]
pub async fn get_salon_services(
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let offered = services::salon_service::list_for_salon(&pool, path.into_inner()).await?;
    Success::ok(offered)
}

/// Attaches existing catalog services to the calling salon.
///
/// Body: `[{ "service": "<uuid>", "price": { "amount": 50000 } }, ...]`.
/// Already offered services are skipped and left out of the response.
#[post("")]
pub async fn post_salon_services(
    req: web::Json<Vec<AttachServiceRequest>>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let attached = services::salon_service::attach(&pool, &claims, req.into_inner()).await?;
    Success::created("Add services successfully", attached)
}

#[patch("/{id}")]
pub async fn patch_salon_service(
    path: web::Path<Uuid>,
    req: web::Json<UpdatePriceRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    req.validated("Update price failed")?;
    let price = req
        .price
        .as_ref()
        .ok_or_else(|| AppError::Required("Price is required".to_string()))?
        .to_price()?;

    let updated =
        services::salon_service::update_price(&pool, &claims, path.into_inner(), price).await?;
    Success::ok_with("Update price successfully", updated)
}

#[delete("/{id}")]
pub async fn delete_salon_service(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    services::salon_service::detach(&pool, &claims, path.into_inner()).await?;
    Success::message("Remove service successfully")
}
