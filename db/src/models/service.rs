use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub gender: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SalonService {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub price_amount: Decimal,
    pub currency: String,
    pub created_at: NaiveDateTime,
}

/// Salon offering joined with its catalog entry.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SalonServiceDetail {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub service_gender: String,
    pub price_amount: Decimal,
    pub currency: String,
    pub created_at: NaiveDateTime,
}
