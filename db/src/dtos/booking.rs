use rust_decimal::Decimal;
use uuid::Uuid;

pub struct BookingCreateRequest {
    pub customer_id: Uuid,
    pub salon_id: Uuid,
    pub total_net_amount: Decimal,
    pub currency: String,
}

pub struct BookingLineCreateRequest {
    pub booking_id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub price_amount: Decimal,
    pub currency: String,
}

pub struct BookingFilter {
    pub account_id: Uuid,
    pub status: Option<String>,
}
