use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgSslMode},
};
use std::{str::FromStr, sync::Arc};

pub mod account;
pub mod address;
pub mod booking;
pub mod notification;
pub mod service;

pub mod models {
    pub mod account;
    pub mod address;
    pub mod booking;
    pub mod notification;
    pub mod service;
}

pub mod dtos {
    pub mod account;
    pub mod address;
    pub mod booking;
    pub mod notification;
    pub mod service;
}

/// Connects to Postgres, creating the target database on first start, and
/// applies pending migrations.
pub async fn setup(
    database_url: &str,
    require_ssl: bool,
) -> Result<Arc<PgPool>, Box<dyn std::error::Error>> {
    let ssl_mode = if require_ssl {
        PgSslMode::Require
    } else {
        PgSslMode::Prefer
    };
    let options = PgConnectOptions::from_str(database_url)?.ssl_mode(ssl_mode);

    let db_name = url::Url::parse(database_url)?
        .path()
        .trim_start_matches('/')
        .to_string();
    if !db_name.is_empty() {
        ensure_database(options.clone().database("postgres"), &db_name).await?;
    }

    let pool = PgPool::connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database {} is ready", db_name);

    Ok(Arc::new(pool))
}

async fn ensure_database(
    maintenance: PgConnectOptions,
    db_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let admin_pool = PgPool::connect_with(maintenance).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db_name)
            .fetch_one(&admin_pool)
            .await?;

    if !exists {
        log::info!("Creating database {}", db_name);
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name.replace('"', "\"\"")))
            .execute(&admin_pool)
            .await?;
    }

    admin_pool.close().await;
    Ok(())
}
