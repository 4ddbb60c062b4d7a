use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dtos::notification::{NotificationCreateRequest, NotificationFilter},
    models::notification::Notification,
};

pub async fn insert_notification<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: NotificationCreateRequest,
) -> Res<Notification> {
    sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (recipient_id, verb, data)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(data.recipient_id)
    .bind(data.verb.as_str())
    .bind(data.data)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_notifications<'e, E>(
    executor: E,
    filter: NotificationFilter,
) -> Res<Vec<Notification>>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM notifications WHERE deleted = FALSE AND recipient_id = ");
    qb.push_bind(filter.recipient_id);

    if let Some(unread) = filter.unread {
        qb.push(" AND unread = ").push_bind(unread);
    }

    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<Notification>()
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

/// Deleted notifications are treated as missing.
pub async fn get_notification_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    notification_id: Uuid,
) -> Res<Notification> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE id = $1 AND deleted = FALSE",
    )
    .bind(notification_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_unread<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    notification_id: Uuid,
    unread: bool,
) -> Res<Notification> {
    sqlx::query_as::<_, Notification>(
        "UPDATE notifications SET unread = $1 WHERE id = $2 RETURNING *",
    )
    .bind(unread)
    .bind(notification_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_all_unread<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    recipient_id: Uuid,
    unread: bool,
) -> Res<u64> {
    sqlx::query(
        "UPDATE notifications SET unread = $1 WHERE recipient_id = $2 AND deleted = FALSE",
    )
    .bind(unread)
    .bind(recipient_id)
    .execute(executor)
    .await
    .map(|done| done.rows_affected())
    .map_err(AppError::from)
}

pub async fn soft_delete<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    notification_id: Uuid,
) -> Res<u64> {
    sqlx::query("UPDATE notifications SET deleted = TRUE WHERE id = $1")
        .bind(notification_id)
        .execute(executor)
        .await
        .map(|done| done.rows_affected())
        .map_err(AppError::from)
}

pub async fn soft_delete_all<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    recipient_id: Uuid,
) -> Res<u64> {
    sqlx::query(
        "UPDATE notifications SET deleted = TRUE WHERE recipient_id = $1 AND deleted = FALSE",
    )
    .bind(recipient_id)
    .execute(executor)
    .await
    .map(|done| done.rows_affected())
    .map_err(AppError::from)
}
