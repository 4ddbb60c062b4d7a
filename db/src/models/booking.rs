use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub status: String,
    pub total_net_amount: Decimal,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct BookingLine {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub service_id: Option<Uuid>,
    pub service_name: String,
    pub price_amount: Decimal,
    pub currency: String,
    pub created_at: NaiveDateTime,
}
