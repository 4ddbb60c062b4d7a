use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::validate::FieldErrors;

pub type Res<T> = std::result::Result<T, AppError>;

/// String codes carried by every error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Required,
    ProcessingError,
    PermissionDenied,
    Invalid,
    VerifyFail,
    Existed,
    Inactive,
}

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JWT(#[from] jsonwebtoken::errors::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Mail error: {0}")]
    Mail(String),

    // === APPLICATION ERRORS ===
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Required(String),

    #[error("{0}")]
    Invalid(String),

    #[error("{message}")]
    Validation {
        code: ErrorCode,
        message: String,
        errors: FieldErrors,
    },

    #[error("{0}")]
    VerifyFail(String),

    #[error("{0}")]
    Existed(String),

    #[error("{0}")]
    Inactive(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: ErrorCode,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Value>,
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Database(sqlx::Error::RowNotFound) => ErrorCode::NotFound,
            AppError::Database(e) if is_unique_violation(e) => ErrorCode::Existed,
            AppError::Database(_)
            | AppError::JWT(_)
            | AppError::Reqwest(_)
            | AppError::Mail(_)
            | AppError::TooManyRequests(_)
            | AppError::Internal(_) => ErrorCode::ProcessingError,
            AppError::Unauthorized(_) | AppError::PermissionDenied(_) => {
                ErrorCode::PermissionDenied
            }
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Required(_) => ErrorCode::Required,
            AppError::Invalid(_) => ErrorCode::Invalid,
            AppError::Validation { code, .. } => *code,
            AppError::VerifyFail(_) => ErrorCode::VerifyFail,
            AppError::Existed(_) => ErrorCode::Existed,
            AppError::Inactive(_) => ErrorCode::Inactive,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(e) if is_unique_violation(e) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::JWT(_)
            | AppError::Reqwest(_)
            | AppError::Mail(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Required(_)
            | AppError::Invalid(_)
            | AppError::Validation { .. }
            | AppError::VerifyFail(_)
            | AppError::Existed(_)
            | AppError::Inactive(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Maps `RowNotFound` to a `NotFound` carrying a readable message.
    pub fn not_found_as(self, message: impl Into<String>) -> Self {
        match self {
            AppError::Database(sqlx::Error::RowNotFound) => AppError::NotFound(message.into()),
            other => other,
        }
    }

    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);
        let code = self.code();
        let status = self.status();

        let internal = |err_msg: String| {
            let body = if is_dev {
                ErrorBody {
                    code,
                    message: "Internal server error",
                    errors: Some(Value::String(err_msg)),
                }
            } else {
                ErrorBody {
                    code,
                    message: "Internal server error",
                    errors: None,
                }
            };
            HttpResponse::build(status).json(body)
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(sqlx::Error::RowNotFound) => HttpResponse::build(status).json(
                ErrorBody {
                    code,
                    message: "Resource not found",
                    errors: None,
                },
            ),
            AppError::Database(error) if is_unique_violation(error) => {
                log::warn!("Unique constraint rejected a write: {}", error);
                HttpResponse::build(status).json(ErrorBody {
                    code,
                    message: "The record already exists",
                    errors: None,
                })
            }
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                internal(error.to_string())
            }
            AppError::JWT(error) => {
                log::error!("JWT error: {}", error);
                internal(error.to_string())
            }
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                internal(error.to_string())
            }
            AppError::Mail(error) => {
                log::error!("Mail error: {}", error);
                internal(error.clone())
            }
            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                internal(error.clone())
            }

            // === APPLICATION ERRORS ===
            AppError::Validation {
                message, errors, ..
            } => HttpResponse::build(status).json(ErrorBody {
                code,
                message,
                errors: serde_json::to_value(errors).ok(),
            }),
            _ => {
                let message = self.to_string();
                HttpResponse::build(status).json(ErrorBody {
                    code,
                    message: &message,
                    errors: None,
                })
            }
        }
    }
}

/// A concurrent insert won the race past an existence check.
fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.to_http_response();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn application_errors_carry_their_code() {
        let (status, json) = body_json(AppError::Existed("Service existed".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "existed");
        assert_eq!(json["message"], "Service existed");
        assert!(json.get("errors").is_none());
    }

    #[actix_web::test]
    async fn row_not_found_becomes_not_found() {
        let (status, json) = body_json(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "not_found");
    }

    #[actix_web::test]
    async fn validation_errors_echo_field_details() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "address_url".to_string(),
            vec!["Address url is required".to_string()],
        );
        let err = AppError::Validation {
            code: ErrorCode::Required,
            message: "Address url is required".to_string(),
            errors,
        };
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "required");
        assert_eq!(json["errors"]["address_url"][0], "Address url is required");
    }

    #[actix_web::test]
    async fn internal_errors_are_processing_errors() {
        let (status, json) = body_json(AppError::Internal("boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "processing_error");
        assert_eq!(json["message"], "Internal server error");
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint \"accounts_email_key\"")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"accounts_email_key\""
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some("23505".into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    #[actix_web::test]
    async fn unique_violations_are_reported_as_existed() {
        let err = AppError::Database(sqlx::Error::Database(Box::new(UniqueViolation)));
        assert_eq!(err.code(), ErrorCode::Existed);

        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "existed");
        assert_eq!(json["message"], "The record already exists");

        let (status, json) = body_json(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "processing_error");
    }

    #[test]
    fn permission_errors_share_a_code_but_not_a_status() {
        let unauthorized = AppError::Unauthorized("No authorization token provided".to_string());
        let denied = AppError::PermissionDenied("Permission denied".to_string());
        assert_eq!(unauthorized.code(), ErrorCode::PermissionDenied);
        assert_eq!(denied.code(), ErrorCode::PermissionDenied);
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_as_only_rewrites_missing_rows() {
        let err = AppError::Database(sqlx::Error::RowNotFound).not_found_as("The salon x is not found");
        assert!(matches!(err, AppError::NotFound(ref m) if m == "The salon x is not found"));

        let err = AppError::Invalid("bad".to_string()).not_found_as("ignored");
        assert!(matches!(err, AppError::Invalid(_)));
    }
}
