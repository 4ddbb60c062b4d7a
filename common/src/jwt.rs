use actix_web::{HttpMessage, HttpResponse, dev::ServiceRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
    misc::AccountKind,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub account_id: Uuid,
    pub kind: AccountKind,
    pub is_admin: bool,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub account_id: Uuid,
    pub kind: AccountKind,
    pub is_admin: bool,
}

impl JwtClaims {
    pub fn require_customer(&self) -> Res<()> {
        if self.kind == AccountKind::Customer {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Only customers can perform this action".to_string(),
            ))
        }
    }

    pub fn require_salon(&self) -> Res<()> {
        if self.kind == AccountKind::Salon {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Only salons can perform this action".to_string(),
            ))
        }
    }

    pub fn require_admin(&self) -> Res<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied("Permission denied".to_string()))
        }
    }

    /// Passes when the caller is the given account.
    pub fn require_self(&self, account_id: Uuid) -> Res<()> {
        if self.account_id == account_id {
            Ok(())
        } else {
            Err(AppError::PermissionDenied("Permission denied".to_string()))
        }
    }
}

/// Generates JWT token based on account identity and JWT configuration options
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.expiration_hours))
        .ok_or_else(|| AppError::Internal("Token expiration overflow".to_string()))?
        .timestamp();

    let claims = JwtClaims {
        account_id: spec.account_id,
        kind: spec.kind,
        is_admin: spec.is_admin,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;
    Ok(token_data.claims)
}

pub fn get_jwt_claims_or_error(req: &ServiceRequest) -> Result<JwtClaims, HttpResponse> {
    if let Some(jwt_claims_res) = req.extensions().get::<Res<JwtClaims>>() {
        match jwt_claims_res {
            Ok(claims) => Ok(claims.clone()),
            Err(app_error) => Err(app_error.to_http_response()),
        }
    } else {
        Err(
            AppError::Unauthorized("No authorization token provided".to_string())
                .to_http_response(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hours: i64) -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: hours,
        }
    }

    #[test]
    fn issued_token_carries_account_identity() {
        let account_id = Uuid::new_v4();
        let token = generate_jwt(
            ClaimsSpec {
                account_id,
                kind: AccountKind::Salon,
                is_admin: false,
            },
            &config(1),
        )
        .unwrap();

        let claims = validate_jwt(&token, "test-secret").unwrap();
        assert_eq!(claims.account_id, account_id);
        assert_eq!(claims.kind, AccountKind::Salon);
        assert!(claims.require_salon().is_ok());
        assert!(claims.require_customer().is_err());
    }

    #[test]
    fn token_signed_with_another_secret_is_unauthorized() {
        let token = generate_jwt(
            ClaimsSpec {
                account_id: Uuid::new_v4(),
                kind: AccountKind::Customer,
                is_admin: false,
            },
            &config(1),
        )
        .unwrap();

        let err = validate_jwt(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = generate_jwt(
            ClaimsSpec {
                account_id: Uuid::new_v4(),
                kind: AccountKind::Customer,
                is_admin: false,
            },
            &config(-2),
        )
        .unwrap();

        assert!(validate_jwt(&token, "test-secret").is_err());
    }

    #[test]
    fn require_self_compares_account_ids() {
        let account_id = Uuid::new_v4();
        let claims = JwtClaims {
            account_id,
            kind: AccountKind::Customer,
            is_admin: false,
            exp: 0,
        };
        assert!(claims.require_self(account_id).is_ok());
        assert!(matches!(
            claims.require_self(Uuid::new_v4()),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(claims.require_admin().is_err());
    }
}
