use common::env_config::JwtConfig;
use middleware::extractor::ExtractionMiddleware;

pub mod middleware {
    pub mod extractor;
}

/// Decodes bearer tokens once per request so secured scopes can read the claims.
pub fn middleware(jwt_config: JwtConfig) -> ExtractionMiddleware {
    ExtractionMiddleware::new(jwt_config)
}
