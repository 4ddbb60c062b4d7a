use common::{
    env_config::JwtConfig,
    error::{AppError, ErrorCode, Res},
    jwt::{self, ClaimsSpec},
    mailer::{self, Mailer},
    misc::AccountKind,
    password,
    validate::FieldErrors,
};
use db::{
    dtos::account::{AccountCreateRequest, IdentityCheck},
    models::account::{Account, AccountDetails, AuthCredentials, IdentityClash},
};
use locator::AddressResolver;
use sqlx::PgPool;

use crate::dtos::auth::{
    LoginRequest, RegisterSalonRequest, RegisterUserRequest, ResendOtpRequest, VerifyRequest,
};

/// Inserts a customer with credentials and a fresh OTP, then mails the OTP.
pub async fn register_customer(
    pool: &PgPool,
    mailer: &Mailer,
    req: RegisterUserRequest,
) -> Res<AccountDetails> {
    ensure_identity_free(
        pool,
        IdentityCheck {
            username: req.username.trim(),
            email: req.email.trim(),
            phone_number: req.phone_number.trim(),
            salon_name: None,
        },
    )
    .await?;

    let password_hash = password::hash_password(&req.password)?;
    let otp = mailer::generate_otp();

    let mut tx = pool.begin().await?;
    let account = db::account::insert_account(
        &mut *tx,
        AccountCreateRequest {
            kind: AccountKind::Customer,
            username: req.username.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            phone_number: req.phone_number.trim().to_string(),
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            gender: Some(req.gender.trim().to_lowercase()),
            salon_name: None,
            avatar: req.avatar,
            otp: otp.clone(),
            address_id: None,
        },
    )
    .await?;
    db::account::insert_account_credentials(
        &mut *tx,
        AuthCredentials {
            account_id: account.id,
            password_hash,
        },
    )
    .await?;
    tx.commit().await?;

    log::info!("Customer {} registered", account.id);
    deliver_otp(mailer, &account.email, &otp).await;
    Ok(AccountDetails {
        account,
        address: None,
    })
}

/// Resolves the salon address first, then inserts address, account and
/// credentials in one transaction.
pub async fn register_salon(
    pool: &PgPool,
    mailer: &Mailer,
    resolver: &AddressResolver,
    req: RegisterSalonRequest,
) -> Res<AccountDetails> {
    ensure_identity_free(
        pool,
        IdentityCheck {
            username: req.username.trim(),
            email: req.email.trim(),
            phone_number: req.phone_number.trim(),
            salon_name: Some(req.salon_name.trim()),
        },
    )
    .await?;

    let resolved = resolver.resolve(&req.address_url).await?;
    let password_hash = password::hash_password(&req.password)?;
    let otp = mailer::generate_otp();

    let mut tx = pool.begin().await?;
    let address = db::address::insert_address(&mut *tx, resolved.into()).await?;
    let account = db::account::insert_account(
        &mut *tx,
        AccountCreateRequest {
            kind: AccountKind::Salon,
            username: req.username.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            phone_number: req.phone_number.trim().to_string(),
            first_name: req.first_name.unwrap_or_default().trim().to_string(),
            last_name: req.last_name.unwrap_or_default().trim().to_string(),
            gender: None,
            salon_name: Some(req.salon_name.trim().to_string()),
            avatar: req.avatar,
            otp: otp.clone(),
            address_id: Some(address.id),
        },
    )
    .await?;
    db::account::insert_account_credentials(
        &mut *tx,
        AuthCredentials {
            account_id: account.id,
            password_hash,
        },
    )
    .await?;
    tx.commit().await?;

    log::info!("Salon {} registered", account.id);
    deliver_otp(mailer, &account.email, &otp).await;
    Ok(AccountDetails {
        account,
        address: Some(address),
    })
}

/// Checks the password of an account of the given kind.
pub async fn authenticate(pool: &PgPool, kind: AccountKind, req: &LoginRequest) -> Res<Account> {
    let found =
        match db::account::get_account_with_password_hash(pool, kind, req.email_or_username.trim())
            .await
        {
            Ok(found) => found,
            Err(AppError::Database(sqlx::Error::RowNotFound)) => return Err(invalid_credentials()),
            Err(e) => return Err(e),
        };

    // unknown accounts and wrong passwords are indistinguishable to the caller
    if !password::verify_password(&req.password, &found.password_hash)? {
        return Err(invalid_credentials());
    }
    found.account.ensure_active()?;
    Ok(found.account)
}

pub async fn verify(pool: &PgPool, kind: AccountKind, req: &VerifyRequest) -> Res<Account> {
    let account = db::account::get_account_by_email(pool, kind, req.email.trim())
        .await
        .map_err(|e| e.not_found_as(format!("Account with email {} is not found", req.email.trim())))?;

    check_otp(&account, &req.otp)?;
    let account =
        otp_consumed(db::account::mark_verified(pool, account.id, req.otp.trim()).await)?;
    log::info!("Account {} verified", account.id);
    Ok(account)
}

pub async fn resend_otp(pool: &PgPool, mailer: &Mailer, req: &ResendOtpRequest) -> Res<()> {
    let account = db::account::find_account_by_email(pool, req.email.trim())
        .await
        .map_err(|e| e.not_found_as(format!("Account with email {} is not found", req.email.trim())))?;

    if account.is_verified {
        return Err(AppError::Invalid("The account is already verified".to_string()));
    }

    let otp = mailer::generate_otp();
    let account = db::account::update_otp(pool, account.id, &otp).await?;
    mailer.send_otp(&account.email, &otp).await
}

pub fn issue_token(account: &Account, config: &JwtConfig) -> Res<String> {
    jwt::generate_jwt(
        ClaimsSpec {
            account_id: account.id,
            kind: AccountKind::from_str(&account.kind)?,
            is_admin: account.is_admin,
        },
        config,
    )
}

/// Verification happens once; the stored code must match exactly.
pub fn check_otp(account: &Account, otp: &str) -> Res<()> {
    if account.is_verified {
        return Err(AppError::Invalid("The account is already verified".to_string()));
    }
    match account.otp.as_deref() {
        Some(stored) if stored == otp.trim() => Ok(()),
        _ => Err(AppError::VerifyFail("The OTP is incorrect".to_string())),
    }
}

/// A failed conditional update means another request consumed or replaced the OTP first.
pub fn otp_consumed(updated: Res<Account>) -> Res<Account> {
    updated.map_err(|e| match e {
        AppError::Database(sqlx::Error::RowNotFound) => {
            AppError::VerifyFail("The OTP is incorrect".to_string())
        }
        other => other,
    })
}

/// Turns taken identity fields into an `existed` error naming each field.
pub fn clash_error(clash: IdentityClash) -> Res<()> {
    let mut errors = FieldErrors::new();
    let mut taken = |is_taken: bool, field: &str, label: &str| {
        if is_taken {
            errors.insert(field.to_string(), vec![format!("{} already exists", label)]);
        }
    };
    taken(clash.username, "username", "Username");
    taken(clash.email, "email", "Email");
    taken(clash.phone_number, "phone_number", "Phone number");
    taken(clash.salon_name, "salon_name", "Salon name");

    if errors.is_empty() {
        return Ok(());
    }
    Err(AppError::Validation {
        code: ErrorCode::Existed,
        message: "Account existed".to_string(),
        errors,
    })
}

async fn ensure_identity_free(pool: &PgPool, check: IdentityCheck<'_>) -> Res<()> {
    let clash = db::account::find_identity_clash(pool, check).await?;
    clash_error(clash)
}

async fn deliver_otp(mailer: &Mailer, email: &str, otp: &str) {
    // the account is committed already, a resend is the recovery path
    if let Err(e) = mailer.send_otp(email, otp).await {
        log::error!("Failed to send OTP to {}: {}", email, e);
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn account(is_verified: bool, otp: Option<&str>) -> Account {
        let now = Utc::now().naive_utc();
        Account {
            id: Uuid::new_v4(),
            kind: "customer".to_string(),
            username: "minh".to_string(),
            email: "minh@example.com".to_string(),
            phone_number: "0911111111".to_string(),
            first_name: "Minh".to_string(),
            last_name: "Tran".to_string(),
            gender: Some("male".to_string()),
            salon_name: None,
            avatar: None,
            background_image: None,
            vote_rate: None,
            is_closed: false,
            is_verified,
            otp: otp.map(str::to_string),
            is_active: true,
            is_admin: false,
            total_completed_booking: 0,
            address_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn matching_otp_verifies() {
        assert!(check_otp(&account(false, Some("123456")), " 123456 ").is_ok());
    }

    #[test]
    fn wrong_otp_fails_verification() {
        let err = check_otp(&account(false, Some("123456")), "654321").unwrap_err();
        assert_eq!(err.code(), ErrorCode::VerifyFail);

        let err = check_otp(&account(false, None), "123456").unwrap_err();
        assert_eq!(err.code(), ErrorCode::VerifyFail);
    }

    #[test]
    fn verification_happens_once() {
        let err = check_otp(&account(true, None), "123456").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Invalid);
    }

    #[test]
    fn inactive_accounts_are_rejected() {
        let mut acc = account(true, None);
        acc.is_active = false;
        assert_eq!(acc.ensure_active().unwrap_err().code(), ErrorCode::Inactive);
    }

    #[test]
    fn losing_the_verify_race_fails_verification() {
        // the second of two concurrent verifies finds no unverified row to update
        let err = otp_consumed(Err(AppError::Database(sqlx::Error::RowNotFound))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VerifyFail);

        let acc = account(true, None);
        assert_eq!(otp_consumed(Ok(acc.clone())).unwrap().id, acc.id);

        let err = otp_consumed(Err(AppError::Database(sqlx::Error::PoolTimedOut))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProcessingError);
    }

    #[test]
    fn clashes_name_every_taken_field() {
        assert!(clash_error(IdentityClash::default()).is_ok());

        let err = clash_error(IdentityClash {
            email: true,
            salon_name: true,
            ..Default::default()
        })
        .unwrap_err();
        match err {
            AppError::Validation { code, errors, .. } => {
                assert_eq!(code, ErrorCode::Existed);
                assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["email", "salon_name"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn issued_tokens_carry_the_account_kind() {
        let config = JwtConfig {
            secret: "auth-service-test".to_string(),
            expiration_hours: 1,
        };
        let mut acc = account(true, None);
        acc.kind = "salon".to_string();
        let token = issue_token(&acc, &config).unwrap();
        let claims = jwt::validate_jwt(&token, &config.secret).unwrap();
        assert_eq!(claims.account_id, acc.id);
        assert_eq!(claims.kind, AccountKind::Salon);
    }
}
