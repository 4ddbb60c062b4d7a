use std::{env, net::IpAddr, sync::Arc};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, JWT configuration,
/// server host and port, number of worker threads, CORS settings,
/// logging preferences, rate limiting, the map URL resolver and
/// the optional SMTP settings used to deliver one-time passwords.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Path of the file the logger appends to.
    pub log_file: String,
    /// Requests per second accepted by the global limiter.
    pub rate_limit_per_second: u32,
    /// Requests per minute a single client may send to the auth routes.
    pub auth_rate_limit_per_minute: u32,
    /// Reverse proxies whose `X-Forwarded-For` is trusted by the client limiter.
    pub trusted_proxies: Vec<IpAddr>,
    /// Timeout in seconds for resolving map share URLs.
    pub map_resolver_timeout_secs: u64,
    /// SMTP settings. `None` disables mail delivery.
    pub email: Option<EmailConfig>,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign JWTs and
/// the expiration time in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in hours.
    pub expiration_hours: i64,
}

#[derive(Clone)]
/// SMTP relay used for one-time password mails.
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Sender address (From header).
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// Reads the JWT configuration from environment variables:
    /// - `JWT_SECRET`: Required. The secret key for JWT signing.
    /// - `JWT_EXPIRATION_HOURS`: Optional. Defaults to 24 hours if not provided.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(JwtConfig {
            secret: get_required_env("JWT_SECRET")?,
            expiration_hours: get_parsed_env("JWT_EXPIRATION_HOURS", 24)?,
        })
    }
}

impl EmailConfig {
    /// Returns `None` when `SMTP_HOST` is not set.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(EmailConfig {
            smtp_host,
            smtp_port: get_parsed_env("SMTP_PORT", 587)?,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_required_env("SMTP_PASSWORD")?,
            from_address: get_required_env("SMTP_FROM")?,
        }))
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT signing (via `JwtConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `ENVIRONMENT`: "development" or "production" (default: "development")
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `LOG_FILE`: Log file path (default: "salon.log")
    /// - `RATE_LIMIT_PER_SECOND`: Global request quota (default: 50)
    /// - `AUTH_RATE_LIMIT_PER_MINUTE`: Per-client quota on auth routes (default: 20)
    /// - `TRUSTED_PROXIES`: Comma separated proxy IPs allowed to forward client addresses (default: none)
    /// - `MAP_RESOLVER_TIMEOUT_SECS`: Address resolver timeout (default: 10)
    /// - `SMTP_*`: Mail delivery, disabled when `SMTP_HOST` is missing
    pub fn from_env() -> Result<Arc<Self>, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Arc::new(Config {
            environment: get_env_or_default("ENVIRONMENT", "development"),
            database_url: get_required_env("DATABASE_URL")?,
            jwt_config: JwtConfig::from_env()?,
            server_host: get_env_or_default("IP", "127.0.0.1"),
            server_port: get_parsed_env("PORT", 8080)?,
            num_workers: get_parsed_env("WORKERS", 4)?,
            cors_allowed_origin: get_env_or_default("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            console_logging_enabled: get_env_or_default("ENABLE_CONSOLE_LOGGING", "true")
                .to_lowercase()
                == "true",
            log_file: get_env_or_default("LOG_FILE", "salon.log"),
            rate_limit_per_second: get_parsed_env("RATE_LIMIT_PER_SECOND", 50)?,
            auth_rate_limit_per_minute: get_parsed_env("AUTH_RATE_LIMIT_PER_MINUTE", 20)?,
            trusted_proxies: parse_ip_list(
                "TRUSTED_PROXIES",
                &get_optional_env("TRUSTED_PROXIES").unwrap_or_default(),
            )?,
            map_resolver_timeout_secs: get_parsed_env("MAP_RESOLVER_TIMEOUT_SECS", 10)?,
            email: EmailConfig::from_env()?,
        }))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

fn parse_ip_list(key: &str, raw: &str) -> Result<Vec<IpAddr>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse()
                .map_err(|e: std::net::AddrParseError| {
                    ConfigError::InvalidEnvVar(key.to_string(), format!("{}: {}", part, e))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_env_falls_back_to_default_when_unset() {
        let port: u16 = get_parsed_env("SALON_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn missing_required_env_names_the_variable() {
        let err = get_required_env("SALON_TEST_MISSING_VAR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SALON_TEST_MISSING_VAR"
        );
    }

    #[test]
    fn email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: "hunter2".to_string(),
            from_address: "no-reply@example.com".to_string(),
        };
        let printed = format!("{:?}", config);
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn trusted_proxies_are_parsed_from_a_comma_list() {
        let proxies = parse_ip_list("TRUSTED_PROXIES", " 10.0.0.1, ,::1 ").unwrap();
        assert_eq!(
            proxies,
            vec!["10.0.0.1".parse::<IpAddr>().unwrap(), "::1".parse().unwrap()]
        );
        assert!(parse_ip_list("TRUSTED_PROXIES", "").unwrap().is_empty());
        assert!(matches!(
            parse_ip_list("TRUSTED_PROXIES", "10.0.0.1,proxy.local"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }
}
