use std::sync::Arc;

use actix_web::{Responder, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims, validate::Validate};
use locator::AddressResolver;
use sqlx::PgPool;

use crate::dtos::account::AddressRequest;
use crate::services;

/// Replaces the caller's address with the place behind a map share link.
#[put("/address")]
pub async fn put_address(
    req: web::Json<AddressRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    resolver: web::Data<AddressResolver>,
) -> Res<impl Responder> {
    req.validated("Update address failed")?;
    let address =
        services::account::update_address(&pool, &resolver, &claims, &req.address_url).await?;
    Success::ok_with("Update address successfully", address)
}
