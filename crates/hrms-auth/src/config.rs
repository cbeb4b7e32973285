//! Authentication configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Token signing configuration.
///
/// Access and refresh tokens are signed with independent secrets so that
/// compromising one class never allows forging the other. `validate` rejects
/// configurations where the two secrets are equal.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for access tokens. Required, at least 32 bytes.
    pub access_token_secret: String,

    /// HMAC secret for refresh tokens. Required, at least 32 bytes,
    /// different from the access secret.
    pub refresh_token_secret: String,

    /// Access token lifetime.
    /// Shorter lifetimes are more secure but require more frequent refresh.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime. Also drives the session row expiry and the
    /// TTL of the cached refresh-token mirror.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,

    /// Issuer claim value embedded in every token.
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: String::new(),
            refresh_token_secret: String::new(),
            access_token_lifetime: Duration::from_secs(60 * 60), // 60 minutes
            refresh_token_lifetime: Duration::from_secs(7 * 24 * 3600), // 7 days
            issuer: "hrms-server".to_string(),
        }
    }
}

const MIN_SECRET_LEN: usize = 32;

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if a secret is missing, too short,
    /// or the two secrets are identical, or if a lifetime is zero.
    pub fn validate(&self) -> AuthResult<()> {
        if self.access_token_secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::configuration(format!(
                "access_token_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.refresh_token_secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::configuration(format!(
                "refresh_token_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(AuthError::configuration(
                "access and refresh token secrets must differ",
            ));
        }
        if self.access_token_lifetime.is_zero() || self.refresh_token_lifetime.is_zero() {
            return Err(AuthError::configuration("token lifetimes must be non-zero"));
        }
        if self.issuer.is_empty() {
            return Err(AuthError::configuration("issuer must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AuthConfig {
        AuthConfig {
            access_token_secret: "a".repeat(32),
            refresh_token_secret: "r".repeat(32),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_default_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_lifetime, Duration::from_secs(3600));
        assert_eq!(
            config.refresh_token_lifetime,
            Duration::from_secs(7 * 24 * 3600)
        );
    }

    #[test]
    fn test_validate_accepts_distinct_secrets() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let config = AuthConfig {
            access_token_secret: "short".into(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_equal_secrets() {
        let config = AuthConfig {
            refresh_token_secret: "a".repeat(32),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_humantime_deserialization() {
        let config: AuthConfig = serde_json::from_str(
            r#"{
                "access_token_secret": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "refresh_token_secret": "rrrrrrrrrrrrrrrrrrrrrrrrrrrrrrrr",
                "access_token_lifetime": "15m",
                "refresh_token_lifetime": "14d"
            }"#,
        )
        .unwrap();
        assert_eq!(config.access_token_lifetime, Duration::from_secs(900));
        assert_eq!(
            config.refresh_token_lifetime,
            Duration::from_secs(14 * 24 * 3600)
        );
    }
}
