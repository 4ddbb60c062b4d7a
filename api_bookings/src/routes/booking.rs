use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
    validate::Validate,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::booking::{BookingQuery, CreateBookingRequest};
use crate::lifecycle::BookingAction;
use crate::services;

/// Places a booking at a salon.
///
/// # Input
/// - `req`: `{ salon_id, service_ids: [<catalog service id>, ...] }`
///
/// # Output
/// - Success: 201 with the booking, its `lines` and `total_net_amount`
/// - Error: `not_found` when the salon does not offer one of the services,
///   `required` when `salon_id` or `service_ids` is missing
///
/// # Frontend Example
/// ```javascript
/// const res = await fetch('/api/booking', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   },
///   body: JSON.stringify({ salon_id: salonId, service_ids: [haircutId] })
/// });
/// const { data } = await res.json();
/// console.log(data.total_net_amount, data.lines);
/// ```
#[post("")]
pub async fn post_booking(
    req: web::Json<CreateBookingRequest>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    req.validated("Create booking failed")?;
    let CreateBookingRequest {
        salon_id,
        service_ids,
    } = req.into_inner();
    let Some(salon_id) = salon_id else {
        return Err(AppError::Required("Salon is required".to_string()));
    };

    let booking = services::booking::create(&pool, &claims, salon_id, &service_ids).await?;
    Success::created("Book successfully", booking)
}

/// Moves a booking through its lifecycle.
///
/// `action` is one of `confirm`, `request-complete` (salon), `complete`
/// (customer) or `cancel` (either party).
#[post("/{id}/{action}")]
pub async fn post_booking_action(
    path: web::Path<(Uuid, String)>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let (booking_id, action) = path.into_inner();
    let action = BookingAction::parse(&action)?;

    let booking = services::booking::apply_action(&pool, &claims, booking_id, action).await?;
    Success::ok_with("Update booking successfully", booking)
}

#[get("")]
pub async fn get_bookings(
    query: web::Query<BookingQuery>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let bookings = services::booking::list(&pool, &claims, query.status.as_deref()).await?;
    Success::ok(bookings)
}

#[get("/{id}")]
pub async fn get_booking(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let booking = services::booking::get(&pool, &claims, path.into_inner()).await?;
    Success::ok(booking)
}
