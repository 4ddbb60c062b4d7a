use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::address::AddressWriteRequest, models::address::Address};

pub async fn get_address_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    address_id: Uuid,
) -> Res<Address> {
    sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1")
        .bind(address_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_address<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: AddressWriteRequest,
) -> Res<Address> {
    sqlx::query_as::<_, Address>(
        r#"
        INSERT INTO addresses (address, street, hamlet, ward, district, province,
                               latitude, longitude, position_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(data.address)
    .bind(data.street)
    .bind(data.hamlet)
    .bind(data.ward)
    .bind(data.district)
    .bind(data.province)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(data.position_url)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Overwrites every component, clearing the ones the new value leaves unset.
pub async fn update_address<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    address_id: Uuid,
    data: AddressWriteRequest,
) -> Res<Address> {
    sqlx::query_as::<_, Address>(
        r#"
        UPDATE addresses SET
            address = $2, street = $3, hamlet = $4, ward = $5, district = $6,
            province = $7, latitude = $8, longitude = $9, position_url = $10,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(address_id)
    .bind(data.address)
    .bind(data.street)
    .bind(data.hamlet)
    .bind(data.ward)
    .bind(data.district)
    .bind(data.province)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(data.position_url)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
