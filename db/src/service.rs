use common::error::{AppError, Res};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::service::{SalonServiceCreateRequest, ServiceCreateRequest},
    models::service::{SalonService, SalonServiceDetail, Service},
};

const SALON_SERVICE_DETAIL_SELECT: &str = r#"
    SELECT ss.id, ss.salon_id, ss.service_id, s.name AS service_name,
           s.gender AS service_gender, ss.price_amount, ss.currency, ss.created_at
    FROM salon_services ss
    JOIN services s ON s.id = ss.service_id
"#;

pub async fn list_services<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<Vec<Service>> {
    sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY name, gender")
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_service_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    service_id: Uuid,
) -> Res<Service> {
    sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
        .bind(service_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Case-insensitive on the name.
pub async fn service_exists<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    name: &str,
    gender: &str,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM services WHERE LOWER(name) = LOWER($1) AND gender = $2)",
    )
    .bind(name)
    .bind(gender)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_service<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ServiceCreateRequest,
) -> Res<Service> {
    sqlx::query_as::<_, Service>(
        "INSERT INTO services (name, gender) VALUES ($1, $2) RETURNING *",
    )
    .bind(data.name)
    .bind(data.gender)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_service<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    service_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(service_id)
        .execute(executor)
        .await
        .map(|done| done.rows_affected())
        .map_err(AppError::from)
}

pub async fn list_salon_services<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    salon_id: Uuid,
) -> Res<Vec<SalonServiceDetail>> {
    let sql = format!(
        "{} WHERE ss.salon_id = $1 ORDER BY s.name",
        SALON_SERVICE_DETAIL_SELECT
    );
    sqlx::query_as::<_, SalonServiceDetail>(&sql)
        .bind(salon_id)
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Offerings of one salon restricted to the given catalog ids.
pub async fn get_salon_services_by_service_ids<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    salon_id: Uuid,
    service_ids: &[Uuid],
) -> Res<Vec<SalonServiceDetail>> {
    let sql = format!(
        "{} WHERE ss.salon_id = $1 AND ss.service_id = ANY($2)",
        SALON_SERVICE_DETAIL_SELECT
    );
    sqlx::query_as::<_, SalonServiceDetail>(&sql)
        .bind(salon_id)
        .bind(service_ids)
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_salon_service_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    salon_service_id: Uuid,
) -> Res<SalonServiceDetail> {
    let sql = format!("{} WHERE ss.id = $1", SALON_SERVICE_DETAIL_SELECT);
    sqlx::query_as::<_, SalonServiceDetail>(&sql)
        .bind(salon_service_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn salon_service_exists<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    salon_id: Uuid,
    service_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM salon_services WHERE salon_id = $1 AND service_id = $2)",
    )
    .bind(salon_id)
    .bind(service_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_salon_service<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: SalonServiceCreateRequest,
) -> Res<SalonService> {
    sqlx::query_as::<_, SalonService>(
        r#"
        INSERT INTO salon_services (salon_id, service_id, price_amount, currency)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.salon_id)
    .bind(data.service_id)
    .bind(data.price_amount)
    .bind(data.currency)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_salon_service_price<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    salon_service_id: Uuid,
    price_amount: Decimal,
    currency: &str,
) -> Res<SalonService> {
    sqlx::query_as::<_, SalonService>(
        r#"
        UPDATE salon_services SET price_amount = $2, currency = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(salon_service_id)
    .bind(price_amount)
    .bind(currency)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_salon_service<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    salon_service_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM salon_services WHERE id = $1")
        .bind(salon_service_id)
        .execute(executor)
        .await
        .map(|done| done.rows_affected())
        .map_err(AppError::from)
}
