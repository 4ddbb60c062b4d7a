use common::misc::NotificationVerb;
use sqlx::types::JsonValue;
use uuid::Uuid;

pub struct NotificationCreateRequest {
    pub recipient_id: Uuid,
    pub verb: NotificationVerb,
    pub data: JsonValue,
}

/// `None` lists both read and unread notifications.
pub struct NotificationFilter {
    pub recipient_id: Uuid,
    pub unread: Option<bool>,
}
