use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dtos::booking::{BookingCreateRequest, BookingFilter, BookingLineCreateRequest},
    models::booking::{Booking, BookingLine},
};

pub async fn insert_booking<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: BookingCreateRequest,
) -> Res<Booking> {
    sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (customer_id, salon_id, status, total_net_amount, currency)
        VALUES ($1, $2, 'new', $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.customer_id)
    .bind(data.salon_id)
    .bind(data.total_net_amount)
    .bind(data.currency)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_booking_line<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: BookingLineCreateRequest,
) -> Res<BookingLine> {
    sqlx::query_as::<_, BookingLine>(
        r#"
        INSERT INTO booking_lines (booking_id, service_id, service_name, price_amount, currency)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(data.booking_id)
    .bind(data.service_id)
    .bind(data.service_name)
    .bind(data.price_amount)
    .bind(data.currency)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_booking_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    booking_id: Uuid,
) -> Res<Booking> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(booking_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Locks the booking row until the surrounding transaction ends.
pub async fn get_booking_for_update<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    booking_id: Uuid,
) -> Res<Booking> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
        .bind(booking_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_booking_lines<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    booking_id: Uuid,
) -> Res<Vec<BookingLine>> {
    sqlx::query_as::<_, BookingLine>(
        "SELECT * FROM booking_lines WHERE booking_id = $1 ORDER BY created_at, service_name",
    )
    .bind(booking_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_lines_for_bookings<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    booking_ids: &[Uuid],
) -> Res<Vec<BookingLine>> {
    sqlx::query_as::<_, BookingLine>(
        r#"
        SELECT * FROM booking_lines
        WHERE booking_id = ANY($1)
        ORDER BY created_at, service_name
        "#,
    )
    .bind(booking_ids)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

/// Bookings where the account is either party, newest first.
pub async fn list_bookings<'e, E>(executor: E, filter: BookingFilter) -> Res<Vec<Booking>>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM bookings WHERE (");
    qb.push("customer_id = ")
        .push_bind(filter.account_id)
        .push(" OR salon_id = ")
        .push_bind(filter.account_id)
        .push(")");

    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }

    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<Booking>()
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn update_booking_status<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    booking_id: Uuid,
    status: &str,
) -> Res<Booking> {
    sqlx::query_as::<_, Booking>(
        "UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(booking_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
