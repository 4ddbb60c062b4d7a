use common::{
    error::{AppError, Res},
    jwt::JwtClaims,
};
use db::{
    dtos::service::{SalonServiceCreateRequest, ServiceCreateRequest},
    models::service::{SalonServiceDetail, Service},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::price::Price;

pub async fn list_services(pool: &PgPool) -> Res<Vec<Service>> {
    db::service::list_services(pool).await
}

pub async fn get_service(pool: &PgPool, service_id: Uuid) -> Res<Service> {
    db::service::get_service_by_id(pool, service_id)
        .await
        .map_err(|e| e.not_found_as(format!("The service {} is not found", service_id)))
}

/// Adds a catalog entry and offers it from the calling salon at `price`.
pub async fn create_service(
    pool: &PgPool,
    claims: &JwtClaims,
    name: &str,
    gender: &str,
    price: Price,
) -> Res<SalonServiceDetail> {
    claims.require_salon()?;
    let name = name.trim();
    let gender = gender.trim().to_lowercase();

    let mut tx = pool.begin().await?;
    db::account::get_account_by_id(&mut *tx, claims.account_id)
        .await?
        .ensure_active()?;
    if db::service::service_exists(&mut *tx, name, &gender).await? {
        return Err(AppError::Existed(format!(
            "The service {} for {} already exists",
            name, gender
        )));
    }

    let service = db::service::insert_service(
        &mut *tx,
        ServiceCreateRequest {
            name: name.to_string(),
            gender,
        },
    )
    .await?;
    let salon_service = db::service::insert_salon_service(
        &mut *tx,
        SalonServiceCreateRequest {
            salon_id: claims.account_id,
            service_id: service.id,
            price_amount: price.amount,
            currency: price.currency,
        },
    )
    .await?;
    let detail = db::service::get_salon_service_by_id(&mut *tx, salon_service.id).await?;
    tx.commit().await?;

    log::info!("Salon {} created service {}", claims.account_id, service.id);
    Ok(detail)
}

pub async fn delete_service(pool: &PgPool, claims: &JwtClaims, service_id: Uuid) -> Res<()> {
    claims.require_admin()?;
    let deleted = db::service::delete_service(pool, service_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "The service {} is not found",
            service_id
        )));
    }
    Ok(())
}
