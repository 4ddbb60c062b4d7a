use std::sync::Arc;

use actix_web::{Responder, delete, get, post, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::notification::{AffectedResponse, NotificationQuery};
use crate::services;

/// Lists the caller's notifications, newest first.
///
/// # Input
/// - `read` (query, optional): `true` for read notifications, `false` for unread
///
/// # Output
/// - Success: 200 with `[{ id, recipient_id, verb, unread, data, created_at }]`
///
/// # Frontend Example
/// ```javascript
/// const res = await fetch('/api/notification?read=false', {
///   headers: { 'Authorization': `Bearer ${localStorage.getItem('authToken')}` }
/// });
/// const { data } = await res.json();
/// ```
#[get("")]
pub async fn get_notifications(
    query: web::Query<NotificationQuery>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let notifications = services::notification::list(&pool, claims.account_id, query.read).await?;
    Success::ok(notifications)
}

#[get("/{id}")]
pub async fn get_notification(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let notification =
        services::notification::get(&pool, claims.account_id, path.into_inner()).await?;
    Success::ok(notification)
}

#[delete("/deleteAll")]
pub async fn delete_all_notifications(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let affected = services::notification::delete_all(&pool, claims.account_id).await?;
    Success::ok_with("Delete all notifications successfully", AffectedResponse { affected })
}

#[delete("/{id}")]
pub async fn delete_notification(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    services::notification::delete(&pool, claims.account_id, path.into_inner()).await?;
    Success::message("Delete notification successfully")
}

#[post("/{id}/markAsRead")]
pub async fn post_mark_as_read(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let notification =
        services::notification::mark(&pool, claims.account_id, path.into_inner(), true).await?;
    Success::ok_with("Mark as read successfully", notification)
}

#[post("/{id}/markAsUnread")]
pub async fn post_mark_as_unread(
    path: web::Path<Uuid>,
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let notification =
        services::notification::mark(&pool, claims.account_id, path.into_inner(), false).await?;
    Success::ok_with("Mark as unread successfully", notification)
}

#[post("/markAllAsRead")]
pub async fn post_mark_all_as_read(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let affected = services::notification::mark_all(&pool, claims.account_id, true).await?;
    Success::ok_with("Mark all as read successfully", AffectedResponse { affected })
}

#[post("/markAllAsUnread")]
pub async fn post_mark_all_as_unread(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let affected = services::notification::mark_all(&pool, claims.account_id, false).await?;
    Success::ok_with("Mark all as unread successfully", AffectedResponse { affected })
}
