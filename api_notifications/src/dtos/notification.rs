use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// `true` lists read notifications, `false` unread ones, absent lists both.
    pub read: Option<bool>,
}

/// Payload stored in `notifications.data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    pub message_title: String,
    pub message_body: String,
    pub booking_id: uuid::Uuid,
    pub sent_at: String,
}

#[derive(Debug, Serialize)]
pub struct AffectedResponse {
    pub affected: u64,
}
