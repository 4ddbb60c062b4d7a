use common::{
    misc::Gender,
    validate::{Checker, Validate},
};
use serde::Deserialize;
use uuid::Uuid;

use super::price::PriceInput;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateServiceRequest {
    pub name: String,
    pub gender: String,
    pub price: Option<PriceInput>,
}

impl Validate for CreateServiceRequest {
    fn validate(&self, c: &mut Checker) {
        if c.required("name", &self.name) {
            c.max_len("name", &self.name, 255);
        }
        c.one_of("gender", &self.gender, &Gender::CHOICES);
        match self.price.as_ref().map(PriceInput::to_price) {
            None => c.add("price", "Price is required"),
            Some(Err(e)) => c.add("price", e.to_string()),
            Some(Ok(_)) => {}
        }
    }
}

/// One entry of the attach request body.
#[derive(Debug, Deserialize, Default)]
pub struct AttachServiceRequest {
    pub service: Option<Uuid>,
    pub price: Option<PriceInput>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdatePriceRequest {
    pub price: Option<PriceInput>,
}

impl Validate for UpdatePriceRequest {
    fn validate(&self, c: &mut Checker) {
        match self.price.as_ref().map(PriceInput::to_price) {
            None => c.add("price", "Price is required"),
            Some(Err(e)) => c.add("price", e.to_string()),
            Some(Ok(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::ErrorCode;

    #[test]
    fn service_without_price_is_required() {
        let req: CreateServiceRequest = serde_json::from_value(serde_json::json!({
            "name": "Hair cut",
            "gender": "male",
        }))
        .unwrap();
        let err = req.validated("Create service failed").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Required);
    }

    #[test]
    fn complete_service_passes() {
        let req: CreateServiceRequest = serde_json::from_value(serde_json::json!({
            "name": "Hair cut",
            "gender": "male",
            "price": { "amount": 80000 },
        }))
        .unwrap();
        assert!(req.validated("Create service failed").is_ok());
    }

    #[test]
    fn attach_body_is_a_list() {
        let items: Vec<AttachServiceRequest> = serde_json::from_value(serde_json::json!([
            { "service": "7f1c1b7e-3a43-4b59-9a8e-0a4b8b8f6d11", "price": { "amount": 50000 } },
            { "service": "0a4b8b8f-3a43-4b59-9a8e-7f1c1b7e6d11" },
        ]))
        .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].price.is_none());
    }
}
