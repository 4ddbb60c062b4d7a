use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub verb: String,
    pub unread: bool,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub data: Option<JsonValue>,
    pub created_at: NaiveDateTime,
}
