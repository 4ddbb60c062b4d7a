use common::{
    error::{AppError, Res},
    jwt::JwtClaims,
    misc::AccountKind,
};
use db::{
    dtos::account::{ProfileUpdateRequest, SalonFilter},
    models::{
        account::{Account, AccountDetails},
        address::Address,
    },
};
use locator::AddressResolver;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn get_me(pool: &PgPool, claims: &JwtClaims) -> Res<AccountDetails> {
    let account = db::account::get_account_by_id(pool, claims.account_id)
        .await
        .map_err(|e| e.not_found_as("The account is not found"))?;
    db::account::get_account_details(pool, account).await
}

pub async fn list_customers(pool: &PgPool) -> Res<Vec<Account>> {
    db::account::list_accounts(pool, AccountKind::Customer).await
}

pub async fn search_salons(pool: &PgPool, filter: SalonFilter) -> Res<Vec<Account>> {
    db::account::search_salons(pool, filter).await
}

pub async fn get_account(pool: &PgPool, kind: AccountKind, account_id: Uuid) -> Res<AccountDetails> {
    let account = find_account(pool, kind, account_id).await?;
    db::account::get_account_details(pool, account).await
}

/// Applies a profile update to the caller's own account.
pub async fn update_profile(
    pool: &PgPool,
    claims: &JwtClaims,
    kind: AccountKind,
    account_id: Uuid,
    update: ProfileUpdateRequest,
) -> Res<AccountDetails> {
    claims.require_self(account_id)?;
    find_account(pool, kind, account_id).await?.ensure_active()?;

    if let Some(phone_number) = &update.phone_number {
        if db::account::phone_number_taken(pool, phone_number, account_id).await? {
            return Err(AppError::Existed(format!(
                "The phone number {} already exists",
                phone_number
            )));
        }
    }
    if let Some(salon_name) = &update.salon_name {
        if db::account::salon_name_taken(pool, salon_name, account_id).await? {
            return Err(AppError::Existed(format!(
                "The salon name {} already exists",
                salon_name
            )));
        }
    }

    let account = db::account::update_profile(pool, account_id, update).await?;
    db::account::get_account_details(pool, account).await
}

/// Admin deactivation. Accounts are never removed.
pub async fn deactivate(
    pool: &PgPool,
    claims: &JwtClaims,
    kind: AccountKind,
    account_id: Uuid,
) -> Res<Account> {
    claims.require_admin()?;
    let account = find_account(pool, kind, account_id).await?;
    if !account.is_active {
        return Err(AppError::Inactive(format!(
            "The {} {} is already inactive",
            kind, account_id
        )));
    }
    let account = db::account::set_active(pool, account_id, false).await?;
    log::info!("Account {} deactivated by {}", account_id, claims.account_id);
    Ok(account)
}

/// Resolves the map link, then overwrites the caller's address or creates
/// and links one.
pub async fn update_address(
    pool: &PgPool,
    resolver: &AddressResolver,
    claims: &JwtClaims,
    address_url: &str,
) -> Res<Address> {
    let resolved = resolver.resolve(address_url).await?;

    let mut tx = pool.begin().await?;
    let account = db::account::get_account_by_id(&mut *tx, claims.account_id)
        .await
        .map_err(|e| e.not_found_as("The account is not found"))?;
    account.ensure_active()?;
    let address = match account.address_id {
        Some(address_id) => {
            db::address::update_address(&mut *tx, address_id, resolved.into()).await?
        }
        None => {
            let address = db::address::insert_address(&mut *tx, resolved.into()).await?;
            db::account::set_address(&mut *tx, account.id, address.id).await?;
            address
        }
    };
    tx.commit().await?;

    Ok(address)
}

async fn find_account(pool: &PgPool, kind: AccountKind, account_id: Uuid) -> Res<Account> {
    db::account::get_account_of_kind(pool, kind, account_id)
        .await
        .map_err(|e| e.not_found_as(format!("The {} {} is not found", kind, account_id)))
}
