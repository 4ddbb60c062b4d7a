use common::error::{AppError, Res};
use db::{dtos::notification::NotificationFilter, models::notification::Notification};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list(pool: &PgPool, account_id: Uuid, read: Option<bool>) -> Res<Vec<Notification>> {
    db::notification::list_notifications(
        pool,
        NotificationFilter {
            recipient_id: account_id,
            unread: read.map(|read| !read),
        },
    )
    .await
}

pub async fn get(pool: &PgPool, account_id: Uuid, notification_id: Uuid) -> Res<Notification> {
    let notification = db::notification::get_notification_by_id(pool, notification_id)
        .await
        .map_err(|e| {
            e.not_found_as(format!("The notification {} is not found", notification_id))
        })?;
    ensure_recipient(&notification, account_id)?;
    Ok(notification)
}

pub async fn mark(
    pool: &PgPool,
    account_id: Uuid,
    notification_id: Uuid,
    read: bool,
) -> Res<Notification> {
    let notification = get(pool, account_id, notification_id).await?;
    if notification.unread != read {
        return Ok(notification);
    }
    db::notification::set_unread(pool, notification.id, !read).await
}

pub async fn mark_all(pool: &PgPool, account_id: Uuid, read: bool) -> Res<u64> {
    let affected = db::notification::set_all_unread(pool, account_id, !read).await?;
    log::debug!(
        "Marked {} notifications of {} as {}",
        affected,
        account_id,
        if read { "read" } else { "unread" }
    );
    Ok(affected)
}

pub async fn delete(pool: &PgPool, account_id: Uuid, notification_id: Uuid) -> Res<()> {
    let notification = get(pool, account_id, notification_id).await?;
    db::notification::soft_delete(pool, notification.id).await?;
    Ok(())
}

pub async fn delete_all(pool: &PgPool, account_id: Uuid) -> Res<u64> {
    db::notification::soft_delete_all(pool, account_id).await
}

pub fn ensure_recipient(notification: &Notification, account_id: Uuid) -> Res<()> {
    if notification.recipient_id != account_id {
        return Err(AppError::PermissionDenied(
            "You do not have permission to access this notification".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::ErrorCode;

    fn notification(recipient_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            verb: "booking_placed".to_string(),
            unread: true,
            deleted: false,
            data: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn recipient_may_access_own_notification() {
        let owner = Uuid::new_v4();
        assert!(ensure_recipient(&notification(owner), owner).is_ok());
    }

    #[test]
    fn foreign_notification_is_denied() {
        let err = ensure_recipient(&notification(Uuid::new_v4()), Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
    }
}
