/*
 * Responsibility
 * - Load settings from the environment (.env is honoured via dotenvy)
 * - Validate required values (missing -> startup fails)
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_SQIDS_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub service_name: String,

    pub database_url: String,
    pub database_max_connections: u32,

    pub jwt_secret: String,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub cors_allowed_origins: Vec<String>,
    pub body_limit_bytes: usize,
    pub request_timeout: Duration,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_or("PORT", 5000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = required("DATABASE_URL")?;

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string()),
        );

        Ok(Self {
            addr,
            app_env: AppEnv::from_env(),
            service_name: std::env::var("SERVICE_NAME").unwrap_or_else(|_| "api".to_string()),
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            auth_issuer: optional("AUTH_ISSUER"),
            auth_audience: optional("AUTH_AUDIENCE"),
            access_token_leeway_seconds: parse_or("ACCESS_TOKEN_LEEWAY_SECONDS", 60)?,
            cors_allowed_origins,
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", 1024 * 1024)?,
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECONDS", 30)?),
            sqids_min_length: parse_or("SQIDS_MIN_LENGTH", 10)?,
            sqids_alphabet: std::env::var("SQIDS_ALPHABET")
                .unwrap_or_else(|_| DEFAULT_SQIDS_ALPHABET.to_string()),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn optional(key: &'static str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Unset -> default. Set but unparsable -> error (a typo should not silently fall back).
fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

/// Comma separated list, blanks dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            app_env: AppEnv::Development,
            service_name: "api".to_string(),
            database_url: String::new(),
            database_max_connections: 1,
            jwt_secret: crate::test_support::TEST_SECRET.to_string(),
            auth_issuer: None,
            auth_audience: None,
            access_token_leeway_seconds: 0,
            cors_allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            body_limit_bytes: 1024 * 1024,
            request_timeout: Duration::from_secs(5),
            sqids_min_length: 10,
            sqids_alphabet: DEFAULT_SQIDS_ALPHABET.to_string(),
        }
    }
}
