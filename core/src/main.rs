mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::{env_config::Config, http, mailer::Mailer};
use locator::AddressResolver;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env().expect("Failed to load configuration");
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup(&config.log_file).expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, config.is_production())
        .await
        .expect("Failed to set up database");

    // outbound clients
    let mailer =
        web::Data::new(Mailer::new(config.email.as_ref()).expect("Failed to set up mailer"));
    let resolver = web::Data::new(
        AddressResolver::new(config.map_resolver_timeout_secs)
            .expect("Failed to set up address resolver"),
    );

    // shared across workers so a client cannot multiply its quota
    let auth_limiter = limiter::client_middleware(
        config.auth_rate_limit_per_minute,
        config.trusted_proxies.clone(),
    );

    log::info!(
        "Starting server on {}:{} ({})",
        config.server_host,
        config.server_port,
        config.environment
    );

    let config_data = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(mailer.clone())
            .app_data(resolver.clone())
            .app_data(http::json_config())
            .app_data(http::path_config())
            .app_data(http::query_config())
            .wrap(limiter::global_middleware(config_data.rate_limit_per_second)) // 4th
            .wrap(logger::middleware(config_data.console_logging_enabled)) // 3rd
            .wrap(extractor::middleware(config_data.jwt_config.clone())) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(
                web::scope("/api")
                    .service(api_accounts::mount_accounts().wrap(api_auth::auth_middleware()))
                    .service(api_services::mount_services().wrap(api_auth::auth_middleware()))
                    .service(
                        api_services::mount_salon_services().wrap(api_auth::auth_middleware()),
                    )
                    .service(api_bookings::mount_bookings().wrap(api_auth::auth_middleware()))
                    .service(
                        api_notifications::mount_notifications()
                            .wrap(api_auth::auth_middleware()),
                    )
                    // empty prefix, must stay last
                    .service(api_auth::mount_auth().wrap(auth_limiter.clone())),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
