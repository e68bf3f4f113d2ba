//! Service configuration.

use crate::auth::MAX_TOKEN_LIFETIME_DAYS;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/coursebook").
    pub data_dir: String,

    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,

    /// Token lifetime in days (default: 30).
    pub jwt_expires_days: i64,

    /// bcrypt cost factor (default: 10).
    pub salt_rounds: u32,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Maximum number of requests served at once.
    pub max_concurrent_requests: usize,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set - using an insecure development secret");
            defaults.jwt_secret.clone()
        });

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            data_dir: std::env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            jwt_secret,
            jwt_expires_days: token_lifetime_days(
                env_parse("JWT_EXPIRES_DAYS"),
                defaults.jwt_expires_days,
            ),
            salt_rounds: env_parse("SALT_ROUNDS").unwrap_or(defaults.salt_rounds),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
            max_concurrent_requests: env_parse("MAX_CONCURRENT_REQUESTS")
                .unwrap_or(defaults.max_concurrent_requests),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/coursebook".into(),
            jwt_secret: "coursebook-dev-secret".into(),
            jwt_expires_days: 30,
            salt_rounds: 10,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024, // 1MB
            request_timeout_seconds: 30,
            max_concurrent_requests: 512,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Accept a configured token lifetime only within `1..=MAX_TOKEN_LIFETIME_DAYS`.
fn token_lifetime_days(configured: Option<i64>, default: i64) -> i64 {
    match configured {
        Some(days) if (1..=MAX_TOKEN_LIFETIME_DAYS).contains(&days) => days,
        Some(days) => {
            tracing::warn!(
                days,
                max = MAX_TOKEN_LIFETIME_DAYS,
                default,
                "JWT_EXPIRES_DAYS out of range - using default"
            );
            default
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = ServiceConfig::default();
        assert_eq!(config.jwt_expires_days, 30);
        assert_eq!(config.salt_rounds, 10);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn token_lifetime_is_bounded() {
        assert_eq!(token_lifetime_days(Some(7), 30), 7);
        assert_eq!(token_lifetime_days(None, 30), 30);
        assert_eq!(token_lifetime_days(Some(0), 30), 30);
        assert_eq!(token_lifetime_days(Some(-5), 30), 30);
        assert_eq!(token_lifetime_days(Some(i64::MAX), 30), 30);
        assert_eq!(
            token_lifetime_days(Some(MAX_TOKEN_LIFETIME_DAYS), 30),
            MAX_TOKEN_LIFETIME_DAYS
        );
    }
}
