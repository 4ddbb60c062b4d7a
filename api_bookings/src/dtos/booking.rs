use common::validate::{Checker, Validate};
use db::models::booking::{Booking, BookingLine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateBookingRequest {
    pub salon_id: Option<Uuid>,
    pub service_ids: Vec<Uuid>,
}

impl Validate for CreateBookingRequest {
    fn validate(&self, c: &mut Checker) {
        if self.salon_id.is_none() {
            c.add("salon_id", "Salon is required");
        }
        if self.service_ids.is_empty() {
            c.add("service_ids", "Service is required");
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub status: Option<String>,
}

/// Booking together with its line items.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub lines: Vec<BookingLine>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::{AppError, ErrorCode};

    #[test]
    fn empty_body_is_required() {
        let req: CreateBookingRequest = serde_json::from_str("{}").unwrap();
        let err = req.validated("Create booking failed").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Required);
        let AppError::Validation { errors, .. } = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("salon_id"));
        assert!(errors.contains_key("service_ids"));
    }

    #[test]
    fn complete_body_passes() {
        let body = serde_json::json!({
            "salon_id": Uuid::new_v4(),
            "service_ids": [Uuid::new_v4(), Uuid::new_v4()],
        });
        let req: CreateBookingRequest = serde_json::from_value(body).unwrap();
        assert!(req.validated("Create booking failed").is_ok());
        assert_eq!(req.service_ids.len(), 2);
    }
}
