use rust_decimal::Decimal;
use uuid::Uuid;

pub struct ServiceCreateRequest {
    pub name: String,
    pub gender: String,
}

pub struct SalonServiceCreateRequest {
    pub salon_id: Uuid,
    pub service_id: Uuid,
    pub price_amount: Decimal,
    pub currency: String,
}
