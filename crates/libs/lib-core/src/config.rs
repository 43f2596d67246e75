//! # Application Configuration
//!
//! Configuration loaded from environment variables and validated on startup
//! to fail fast if misconfigured.
//!
//! Each service instance builds its own [`Config`] and hands it to the auth
//! engine, so every deployment carries its own signing keys. The three keys
//! are independent secrets: one per token class (access, refresh,
//! secret-key), rotated independently of each other.
//!
//! The `Debug` implementation redacts all signing keys; configuration values
//! are safe to log.

use crate::error::{CoreError, Result};
use lib_utils::envs::{get_env, get_env_or};
use std::fmt;

/// Minimum length for a signing key, in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// SQLite database connection URL (reference stores only).
    pub database_url: String,

    /// Signing key for access tokens.
    pub access_token_secret: String,

    /// Signing key for refresh tokens.
    pub refresh_token_secret: String,

    /// Signing key for secret-key elevation tokens.
    pub secret_key_secret: String,

    /// Access token validity period in minutes.
    pub access_token_ttl_minutes: i64,

    /// Refresh token validity period in days.
    pub refresh_token_ttl_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/vitalis.db");

        let access_token_secret = get_env("ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = get_env("REFRESH_TOKEN_SECRET")?;
        let secret_key_secret = get_env("SECRET_KEY_SECRET")?;

        let access_token_ttl_minutes = get_env_or("ACCESS_TOKEN_TTL_MINUTES", "15")
            .parse()
            .map_err(|e| CoreError::Config(format!("ACCESS_TOKEN_TTL_MINUTES must be a valid number: {}", e)))?;

        let refresh_token_ttl_days = get_env_or("REFRESH_TOKEN_TTL_DAYS", "30")
            .parse()
            .map_err(|e| CoreError::Config(format!("REFRESH_TOKEN_TTL_DAYS must be a valid number: {}", e)))?;

        Ok(Self {
            database_url,
            access_token_secret,
            refresh_token_secret,
            secret_key_secret,
            access_token_ttl_minutes,
            refresh_token_ttl_days,
        })
    }

    /// Validate configuration values against security and business rules.
    pub fn validate(&self) -> Result<()> {
        let secrets = [
            ("ACCESS_TOKEN_SECRET", &self.access_token_secret),
            ("REFRESH_TOKEN_SECRET", &self.refresh_token_secret),
            ("SECRET_KEY_SECRET", &self.secret_key_secret),
        ];

        for (name, secret) in &secrets {
            if secret.len() < MIN_SECRET_LEN {
                return Err(CoreError::Config(format!(
                    "{} must be at least {} characters long",
                    name, MIN_SECRET_LEN
                )));
            }
        }

        // One key per token class: a leaked key must not forge another class.
        for i in 0..secrets.len() {
            for j in (i + 1)..secrets.len() {
                if secrets[i].1 == secrets[j].1 {
                    return Err(CoreError::Config(format!(
                        "{} and {} must not share the same value",
                        secrets[i].0, secrets[j].0
                    )));
                }
            }
        }

        if !(1..=1440).contains(&self.access_token_ttl_minutes) {
            return Err(CoreError::Config(
                "ACCESS_TOKEN_TTL_MINUTES must be between 1 and 1440 (24 hours)".to_string(),
            ));
        }

        if !(1..=365).contains(&self.refresh_token_ttl_days) {
            return Err(CoreError::Config(
                "REFRESH_TOKEN_TTL_DAYS must be between 1 and 365".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("access_token_secret", &"***")
            .field("refresh_token_secret", &"***")
            .field("secret_key_secret", &"***")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            access_token_secret: "access-secret-0123456789-0123456789".to_string(),
            refresh_token_secret: "refresh-secret-0123456789-0123456789".to_string(),
            secret_key_secret: "elevation-secret-0123456789-0123456789".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 30,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = test_config();
        config.access_token_secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shared_secrets_rejected() {
        let mut config = test_config();
        config.refresh_token_secret = config.access_token_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_out_of_range_rejected() {
        let mut config = test_config();
        config.access_token_ttl_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.refresh_token_ttl_days = 366;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", test_config());
        assert!(!rendered.contains("access-secret"));
        assert!(!rendered.contains("refresh-secret"));
        assert!(!rendered.contains("elevation-secret"));
        assert!(rendered.contains("***"));
    }
}
