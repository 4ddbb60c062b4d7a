use chrono::NaiveDateTime;
use common::error::{AppError, Res};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::Address;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub kind: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub salon_name: Option<String>,
    pub avatar: Option<String>,
    pub background_image: Option<String>,
    pub vote_rate: Option<f64>,
    pub is_closed: bool,
    pub is_verified: bool,
    #[serde(skip_serializing, default)]
    pub otp: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub total_completed_booking: i32,
    pub address_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Deactivated accounts keep their data but may not act.
    pub fn ensure_active(&self) -> Res<()> {
        if self.is_active {
            Ok(())
        } else {
            Err(AppError::Inactive("The account is inactive".to_string()))
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AuthCredentials {
    pub account_id: Uuid,
    pub password_hash: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountWithCredentials {
    #[sqlx(flatten)]
    pub account: Account,
    pub password_hash: String,
}

/// Which identity fields of a prospective account are already taken.
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct IdentityClash {
    pub username: bool,
    pub email: bool,
    pub phone_number: bool,
    pub salon_name: bool,
}

/// Account together with its resolved address.
#[derive(Debug, Clone, Serialize)]
pub struct AccountDetails {
    #[serde(flatten)]
    pub account: Account,
    pub address: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::error::ErrorCode;

    fn account(is_active: bool) -> Account {
        let now = Utc::now().naive_utc();
        Account {
            id: Uuid::new_v4(),
            kind: "salon".to_string(),
            username: "lotus".to_string(),
            email: "lotus@example.com".to_string(),
            phone_number: "0922222222".to_string(),
            first_name: "Lan".to_string(),
            last_name: "Pham".to_string(),
            gender: None,
            salon_name: Some("Lotus".to_string()),
            avatar: None,
            background_image: None,
            vote_rate: None,
            is_closed: false,
            is_verified: true,
            otp: None,
            is_active,
            is_admin: false,
            total_completed_booking: 0,
            address_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_active_accounts_may_act() {
        assert!(account(true).ensure_active().is_ok());
        assert_eq!(
            account(false).ensure_active().unwrap_err().code(),
            ErrorCode::Inactive
        );
    }
}
