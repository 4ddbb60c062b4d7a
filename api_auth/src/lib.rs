use actix_web::web;
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}
pub mod routes {
    pub mod auth;
}
pub mod services {
    pub mod auth;
}
pub mod dtos {
    pub mod auth;
}

/// Public registration, login and verification routes.
///
/// The scope has an empty prefix, so it must be registered after every other
/// scope under `/api`.
pub fn mount_auth() -> actix_web::Scope {
    web::scope("")
        .service(routes::auth::post_register_user)
        .service(routes::auth::post_register_salon)
        .service(routes::auth::post_login_user)
        .service(routes::auth::post_login_salon)
        .service(routes::auth::post_verify_user)
        .service(routes::auth::post_verify_salon)
        .service(routes::auth::post_resend_otp)
}

/// Rejects requests without valid access token claims.
pub fn auth_middleware() -> AuthMiddleware {
    AuthMiddleware::new()
}
