use common::{
    error::{AppError, Res},
    jwt::JwtClaims,
    misc::AccountKind,
};
use db::{dtos::service::SalonServiceCreateRequest, models::service::SalonServiceDetail};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::{price::Price, service::AttachServiceRequest};

pub async fn list_for_salon(pool: &PgPool, salon_id: Uuid) -> Res<Vec<SalonServiceDetail>> {
    db::account::get_account_of_kind(pool, AccountKind::Salon, salon_id)
        .await
        .map_err(|e| e.not_found_as(format!("The salon {} is not found", salon_id)))?;
    db::service::list_salon_services(pool, salon_id).await
}

/// Attaches catalog services to the calling salon. Services the salon already
/// offers are skipped; any other failure rolls the whole batch back.
pub async fn attach(
    pool: &PgPool,
    claims: &JwtClaims,
    items: Vec<AttachServiceRequest>,
) -> Res<Vec<SalonServiceDetail>> {
    claims.require_salon()?;
    if items.is_empty() {
        return Err(AppError::Required("At least one service is required".to_string()));
    }

    let mut tx = pool.begin().await?;
    db::account::get_account_by_id(&mut *tx, claims.account_id)
        .await?
        .ensure_active()?;
    let mut attached = Vec::with_capacity(items.len());

    for item in items {
        let Some(service_id) = item.service else {
            return Err(AppError::Required("Service is required".to_string()));
        };
        db::service::get_service_by_id(&mut *tx, service_id)
            .await
            .map_err(|e| e.not_found_as(format!("The service {} is not found", service_id)))?;

        if db::service::salon_service_exists(&mut *tx, claims.account_id, service_id).await? {
            log::debug!(
                "Salon {} already offers service {}, skipping",
                claims.account_id,
                service_id
            );
            continue;
        }

        let price = item
            .price
            .ok_or_else(|| {
                AppError::Required(format!("The price of service {} is required", service_id))
            })?
            .to_price()?;

        let salon_service = db::service::insert_salon_service(
            &mut *tx,
            SalonServiceCreateRequest {
                salon_id: claims.account_id,
                service_id,
                price_amount: price.amount,
                currency: price.currency,
            },
        )
        .await?;
        attached.push(db::service::get_salon_service_by_id(&mut *tx, salon_service.id).await?);
    }

    tx.commit().await?;
    Ok(attached)
}

pub async fn update_price(
    pool: &PgPool,
    claims: &JwtClaims,
    salon_service_id: Uuid,
    price: Price,
) -> Res<SalonServiceDetail> {
    claims.require_salon()?;
    let detail = find_owned(pool, claims, salon_service_id).await?;
    db::service::update_salon_service_price(pool, detail.id, price.amount, &price.currency).await?;
    db::service::get_salon_service_by_id(pool, detail.id).await
}

pub async fn detach(pool: &PgPool, claims: &JwtClaims, salon_service_id: Uuid) -> Res<()> {
    claims.require_salon()?;
    let detail = find_owned(pool, claims, salon_service_id).await?;
    db::service::delete_salon_service(pool, detail.id).await?;
    Ok(())
}

async fn find_owned(
    pool: &PgPool,
    claims: &JwtClaims,
    salon_service_id: Uuid,
) -> Res<SalonServiceDetail> {
    let detail = db::service::get_salon_service_by_id(pool, salon_service_id)
        .await
        .map_err(|e| {
            e.not_found_as(format!("The salon service {} is not found", salon_service_id))
        })?;
    claims.require_self(detail.salon_id)?;
    db::account::get_account_by_id(pool, claims.account_id)
        .await?
        .ensure_active()?;
    Ok(detail)
}
