use common::{
    error::{AppError, Res},
    misc::AccountKind,
};
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dtos::account::{AccountCreateRequest, IdentityCheck, ProfileUpdateRequest, SalonFilter},
    models::account::{
        Account, AccountDetails, AccountWithCredentials, AuthCredentials, IdentityClash,
    },
};

pub async fn find_identity_clash<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    check: IdentityCheck<'_>,
) -> Res<IdentityClash> {
    sqlx::query_as::<_, IdentityClash>(
        r#"
        SELECT
            EXISTS(SELECT 1 FROM accounts WHERE LOWER(username) = LOWER($1)) AS username,
            EXISTS(SELECT 1 FROM accounts WHERE LOWER(email) = LOWER($2)) AS email,
            EXISTS(SELECT 1 FROM accounts WHERE phone_number = $3) AS phone_number,
            EXISTS(
                SELECT 1 FROM accounts
                WHERE salon_name IS NOT NULL AND LOWER(salon_name) = LOWER($4)
            ) AS salon_name
        "#,
    )
    .bind(check.username)
    .bind(check.email)
    .bind(check.phone_number)
    .bind(check.salon_name)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_account_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_id: Uuid,
) -> Res<Account> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_account_of_kind<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    kind: AccountKind,
    account_id: Uuid,
) -> Res<Account> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 AND kind = $2")
        .bind(account_id)
        .bind(kind.as_str())
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_account_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    kind: AccountKind,
    email: &str,
) -> Res<Account> {
    sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE LOWER(email) = LOWER($1) AND kind = $2",
    )
    .bind(email)
    .bind(kind.as_str())
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn find_account_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Account> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Login identifiers match case-insensitively, like the registration clash check.
const CREDENTIALS_BY_LOGIN: &str = r#"
    SELECT a.*, ac.password_hash
    FROM accounts a
    JOIN auth_credentials ac ON a.id = ac.account_id
    WHERE a.kind = $1 AND (LOWER(a.email) = LOWER($2) OR LOWER(a.username) = LOWER($2))
"#;

/// Looks an account up by email or username, together with its password hash.
pub async fn get_account_with_password_hash<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    kind: AccountKind,
    email_or_username: &str,
) -> Res<AccountWithCredentials> {
    sqlx::query_as::<_, AccountWithCredentials>(CREDENTIALS_BY_LOGIN)
        .bind(kind.as_str())
        .bind(email_or_username)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Attaches the linked address, if any.
pub async fn get_account_details(pool: &PgPool, account: Account) -> Res<AccountDetails> {
    let address = match account.address_id {
        Some(address_id) => Some(crate::address::get_address_by_id(pool, address_id).await?),
        None => None,
    };
    Ok(AccountDetails { account, address })
}

/// Whether another account already uses the phone number.
pub async fn phone_number_taken<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    phone_number: &str,
    exclude_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE phone_number = $1 AND id <> $2)",
    )
    .bind(phone_number)
    .bind(exclude_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Whether another salon already uses the name, ignoring case.
pub async fn salon_name_taken<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    salon_name: &str,
    exclude_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE LOWER(salon_name) = LOWER($1) AND id <> $2)",
    )
    .bind(salon_name)
    .bind(exclude_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_accounts<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    kind: AccountKind,
) -> Res<Vec<Account>> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE kind = $1 ORDER BY created_at")
        .bind(kind.as_str())
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn search_salons<'e, E>(executor: E, filter: SalonFilter) -> Res<Vec<Account>>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM accounts WHERE kind = 'salon' AND is_active = TRUE");

    if let Some(query) = filter.query.filter(|q| !q.trim().is_empty()) {
        qb.push(" AND salon_name ILIKE ")
            .push_bind(format!("%{}%", query.trim()));
    }

    // the column comes from a closed whitelist, never from the request
    match filter.sort {
        Some(sort) => {
            qb.push(" ORDER BY ").push(sort.field.column());
            qb.push(if sort.descending { " DESC NULLS LAST" } else { " ASC NULLS LAST" });
        }
        None => {
            qb.push(" ORDER BY created_at");
        }
    }

    qb.build_query_as::<Account>()
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_account<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: AccountCreateRequest,
) -> Res<Account> {
    sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (kind, username, email, phone_number, first_name, last_name,
                              gender, salon_name, avatar, otp, address_id, is_active, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, FALSE)
        RETURNING *
        "#,
    )
    .bind(data.kind.as_str())
    .bind(data.username)
    .bind(data.email)
    .bind(data.phone_number)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.gender)
    .bind(data.salon_name)
    .bind(data.avatar)
    .bind(data.otp)
    .bind(data.address_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_account_credentials<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: AuthCredentials,
) -> Res<()> {
    sqlx::query("INSERT INTO auth_credentials (account_id, password_hash) VALUES ($1, $2)")
        .bind(data.account_id)
        .bind(data.password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn update_otp<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_id: Uuid,
    otp: &str,
) -> Res<Account> {
    sqlx::query_as::<_, Account>(
        "UPDATE accounts SET otp = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(otp)
    .bind(account_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Marks the account verified and consumes its OTP.
///
/// Only an unverified account still holding `otp` is updated, so of two
/// concurrent calls one gets `RowNotFound`.
pub async fn mark_verified<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_id: Uuid,
    otp: &str,
) -> Res<Account> {
    sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts SET is_verified = TRUE, otp = NULL, updated_at = NOW()
        WHERE id = $1 AND is_verified = FALSE AND otp = $2
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(otp)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_id: Uuid,
    data: ProfileUpdateRequest,
) -> Res<Account> {
    sqlx::query_as::<_, Account>(
        r#"
        UPDATE accounts SET
            first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            gender = COALESCE($4, gender),
            avatar = COALESCE($5, avatar),
            phone_number = COALESCE($6, phone_number),
            salon_name = COALESCE($7, salon_name),
            background_image = COALESCE($8, background_image),
            is_closed = COALESCE($9, is_closed),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.gender)
    .bind(data.avatar)
    .bind(data.phone_number)
    .bind(data.salon_name)
    .bind(data.background_image)
    .bind(data.is_closed)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_active<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_id: Uuid,
    is_active: bool,
) -> Res<Account> {
    sqlx::query_as::<_, Account>(
        "UPDATE accounts SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(is_active)
    .bind(account_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_address<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_id: Uuid,
    address_id: Uuid,
) -> Res<Account> {
    sqlx::query_as::<_, Account>(
        "UPDATE accounts SET address_id = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(address_id)
    .bind(account_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn increment_completed_bookings<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    account_ids: &[Uuid],
) -> Res<u64> {
    sqlx::query(
        r#"
        UPDATE accounts
        SET total_completed_booking = total_completed_booking + 1, updated_at = NOW()
        WHERE id = ANY($1)
        "#,
    )
    .bind(account_ids)
    .execute(executor)
    .await
    .map(|done| done.rows_affected())
    .map_err(AppError::from)
}
