use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;

use super::error::{AppError, Res};

/// Success envelope: `{"message"?: ..., "data": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub struct Success;
impl Success {
    pub fn created<T: Serialize>(message: &str, body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Created().json(Envelope {
            message: Some(message.to_string()),
            data: Some(body),
        }))
    }
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(Envelope {
            message: None,
            data: Some(body),
        }))
    }
    pub fn ok_with<T: Serialize>(message: &str, body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(Envelope {
            message: Some(message.to_string()),
            data: Some(body),
        }))
    }
    pub fn message(message: &str) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(Envelope::<()> {
            message: Some(message.to_string()),
            data: None,
        }))
    }
}

/// Malformed JSON bodies answer with the `invalid` envelope instead of plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Invalid(format!("Invalid request body: {}", err)).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::Invalid(format!("Invalid path: {}", err)).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Invalid(format!("Invalid query: {}", err)).into())
}
