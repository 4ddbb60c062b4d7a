use std::collections::HashMap;

use api_notifications::notifier::{self, BookingEvent};
use common::{
    error::{AppError, Res},
    jwt::JwtClaims,
    misc::AccountKind,
};
use db::{
    dtos::booking::{BookingCreateRequest, BookingFilter, BookingLineCreateRequest},
    models::booking::{Booking, BookingLine},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::booking::BookingResponse,
    lifecycle::{self, BookingAction, BookingStatus, Party},
    pricing,
};

/// Places a booking for the calling customer. The booking, its lines and the
/// notifications to both parties are written in one transaction.
pub async fn create(
    pool: &PgPool,
    claims: &JwtClaims,
    salon_id: Uuid,
    service_ids: &[Uuid],
) -> Res<BookingResponse> {
    claims.require_customer()?;
    let salon_missing = || format!("The salon {} is not found", salon_id);

    let mut tx = pool.begin().await?;

    let salon = db::account::get_account_of_kind(&mut *tx, AccountKind::Salon, salon_id)
        .await
        .map_err(|e| e.not_found_as(salon_missing()))?;
    if !salon.is_active {
        return Err(AppError::NotFound(salon_missing()));
    }
    let customer = db::account::get_account_by_id(&mut *tx, claims.account_id).await?;
    customer.ensure_active()?;

    let offered =
        db::service::get_salon_services_by_service_ids(&mut *tx, salon_id, service_ids).await?;
    let selected = pricing::select_offerings(service_ids, &offered)?;
    let (total_net_amount, currency) = pricing::total(&selected)?;

    let booking = db::booking::insert_booking(
        &mut *tx,
        BookingCreateRequest {
            customer_id: customer.id,
            salon_id,
            total_net_amount,
            currency: currency.clone(),
        },
    )
    .await?;

    let mut lines = Vec::with_capacity(selected.len());
    for offering in selected {
        let line = db::booking::insert_booking_line(
            &mut *tx,
            BookingLineCreateRequest {
                booking_id: booking.id,
                service_id: offering.service_id,
                service_name: offering.service_name,
                price_amount: offering.price_amount,
                currency: offering.currency,
            },
        )
        .await?;
        lines.push(line);
    }

    notifier::notify(&mut *tx, BookingEvent::Placed, &booking, &customer, &salon).await?;
    tx.commit().await?;

    log::info!(
        "Booking {} placed by {} at {} for {} {}",
        booking.id,
        customer.id,
        salon_id,
        booking.total_net_amount,
        currency
    );
    Ok(BookingResponse { booking, lines })
}

/// Applies `action` to the booking on behalf of the caller. The row stays
/// locked until the status change and its notification are committed.
pub async fn apply_action(
    pool: &PgPool,
    claims: &JwtClaims,
    booking_id: Uuid,
    action: BookingAction,
) -> Res<BookingResponse> {
    let mut tx = pool.begin().await?;

    let booking = db::booking::get_booking_for_update(&mut *tx, booking_id)
        .await
        .map_err(|e| e.not_found_as(format!("The booking {} is not found", booking_id)))?;
    let status = BookingStatus::parse(&booking.status)?;
    let party = lifecycle::party_of(&booking, claims.account_id);
    let step = lifecycle::transition(action, party, status)?;
    db::account::get_account_by_id(&mut *tx, claims.account_id)
        .await?
        .ensure_active()?;

    let updated =
        db::booking::update_booking_status(&mut *tx, booking.id, step.to.as_str()).await?;
    if step.to == BookingStatus::Completed {
        db::account::increment_completed_bookings(
            &mut *tx,
            &[updated.customer_id, updated.salon_id],
        )
        .await?;
    }

    let customer = db::account::get_account_by_id(&mut *tx, updated.customer_id).await?;
    let salon = db::account::get_account_by_id(&mut *tx, updated.salon_id).await?;
    notifier::notify(&mut *tx, step.event, &updated, &customer, &salon).await?;

    let lines = db::booking::get_booking_lines(&mut *tx, updated.id).await?;
    tx.commit().await?;

    log::info!(
        "Booking {} moved from {} to {} by {}",
        updated.id,
        status.as_str(),
        step.to.as_str(),
        claims.account_id
    );
    Ok(BookingResponse {
        booking: updated,
        lines,
    })
}

pub async fn list(
    pool: &PgPool,
    claims: &JwtClaims,
    status: Option<&str>,
) -> Res<Vec<BookingResponse>> {
    let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Some(BookingStatus::parse(s)?.as_str().to_string()),
        None => None,
    };

    let bookings = db::booking::list_bookings(
        pool,
        BookingFilter {
            account_id: claims.account_id,
            status,
        },
    )
    .await?;
    if bookings.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = bookings.iter().map(|b| b.id).collect();
    let lines = db::booking::get_lines_for_bookings(pool, &ids).await?;
    Ok(attach_lines(bookings, lines))
}

pub async fn get(pool: &PgPool, claims: &JwtClaims, booking_id: Uuid) -> Res<BookingResponse> {
    let booking = db::booking::get_booking_by_id(pool, booking_id)
        .await
        .map_err(|e| e.not_found_as(format!("The booking {} is not found", booking_id)))?;
    ensure_party(&booking, claims.account_id)?;
    let lines = db::booking::get_booking_lines(pool, booking.id).await?;
    Ok(BookingResponse { booking, lines })
}

fn ensure_party(booking: &Booking, account_id: Uuid) -> Res<Party> {
    lifecycle::party_of(booking, account_id).ok_or_else(|| {
        AppError::PermissionDenied("You do not have permission to view this booking".to_string())
    })
}

fn attach_lines(bookings: Vec<Booking>, lines: Vec<BookingLine>) -> Vec<BookingResponse> {
    let mut by_booking: HashMap<Uuid, Vec<BookingLine>> = HashMap::new();
    for line in lines {
        by_booking.entry(line.booking_id).or_default().push(line);
    }
    bookings
        .into_iter()
        .map(|booking| {
            let lines = by_booking.remove(&booking.id).unwrap_or_default();
            BookingResponse { booking, lines }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn booking() -> Booking {
        let now = chrono::Utc::now().naive_utc();
        Booking {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            salon_id: Uuid::new_v4(),
            status: "new".to_string(),
            total_net_amount: Decimal::from(50_000),
            currency: "VND".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn line(booking_id: Uuid, name: &str) -> BookingLine {
        BookingLine {
            id: Uuid::new_v4(),
            booking_id,
            service_id: Some(Uuid::new_v4()),
            service_name: name.to_string(),
            price_amount: Decimal::from(25_000),
            currency: "VND".to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn lines_are_grouped_under_their_booking() {
        let first = booking();
        let second = booking();
        let lines = vec![
            line(first.id, "Hair cut"),
            line(second.id, "Shave"),
            line(first.id, "Shampoo"),
        ];

        let grouped = attach_lines(vec![first.clone(), second.clone()], lines);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].booking.id, first.id);
        assert_eq!(grouped[0].lines.len(), 2);
        assert_eq!(grouped[1].lines[0].service_name, "Shave");
    }

    #[test]
    fn outsiders_cannot_view_a_booking() {
        let b = booking();
        assert_eq!(ensure_party(&b, b.salon_id).unwrap(), Party::Salon);
        assert!(matches!(
            ensure_party(&b, Uuid::new_v4()),
            Err(AppError::PermissionDenied(_))
        ));
    }
}
