//! Token signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret (required)
//! - `JWT_EXPIRY`: token lifetime in seconds (default: 2592000, 30 days,
//!   at most ten years)

use crate::{ConfigError, optional_var, parsed_var};

pub const DEFAULT_TOKEN_EXPIRY: i64 = 60 * 60 * 24 * 30;
pub const MAX_TOKEN_EXPIRY: i64 = 60 * 60 * 24 * 365 * 10;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expiry: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_expiry: DEFAULT_TOKEN_EXPIRY,
        }
    }

    /// Loads the signing configuration. A missing secret is fatal: the
    /// server must not start with a guessable default key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = optional_var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let token_expiry = parsed_var("JWT_EXPIRY", DEFAULT_TOKEN_EXPIRY)?;

        if token_expiry <= 0 || token_expiry > MAX_TOKEN_EXPIRY {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY",
                value: token_expiry.to_string(),
            });
        }

        Ok(Self {
            secret,
            token_expiry,
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Runs `from_env` with the two JWT variables set (or removed for `None`).
    fn from_env_with(secret: Option<&str>, expiry: Option<&str>) -> Result<JwtConfig, ConfigError> {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in [("JWT_SECRET", secret), ("JWT_EXPIRY", expiry)] {
            // SAFETY: every test touching these variables holds ENV_LOCK.
            unsafe {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
        JwtConfig::from_env()
    }

    #[test]
    fn test_from_env_reads_secret_and_expiry() {
        let config = from_env_with(Some("from-env-secret"), Some("3600")).unwrap();
        assert_eq!(config.secret, "from-env-secret");
        assert_eq!(config.token_expiry, 3600);

        let config = from_env_with(Some("from-env-secret"), None).unwrap();
        assert_eq!(config.token_expiry, DEFAULT_TOKEN_EXPIRY);
    }

    #[test]
    fn test_missing_or_empty_secret_is_fatal() {
        assert_eq!(
            from_env_with(None, None).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            from_env_with(Some("   "), None).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn test_non_numeric_expiry_is_invalid() {
        assert_eq!(
            from_env_with(Some("secret"), Some("thirty days")).unwrap_err(),
            ConfigError::Invalid {
                key: "JWT_EXPIRY",
                value: "thirty days".to_string(),
            }
        );
    }

    #[test]
    fn test_non_positive_expiry_is_invalid() {
        for raw in ["0", "-60"] {
            assert!(matches!(
                from_env_with(Some("secret"), Some(raw)),
                Err(ConfigError::Invalid { key: "JWT_EXPIRY", .. })
            ));
        }
    }

    #[test]
    fn test_expiry_beyond_ten_years_is_invalid() {
        let result = from_env_with(Some("secret"), Some("9223372036854775807"));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                key: "JWT_EXPIRY",
                value: "9223372036854775807".to_string(),
            }
        );

        let config = from_env_with(Some("secret"), Some(&MAX_TOKEN_EXPIRY.to_string())).unwrap();
        assert_eq!(config.token_expiry, MAX_TOKEN_EXPIRY);
    }

    #[test]
    fn test_new_uses_thirty_day_expiry() {
        let config = JwtConfig::new("secret");
        assert_eq!(config.token_expiry, 2_592_000);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("super-secret-value");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
    }
}
