//! JWT minting and verification.
//!
//! Two token classes share one claims shape but are signed with independent
//! HMAC secrets, so a refresh token can never verify as an access token and
//! vice versa. Verification failures are split into [`AuthError::TokenExpired`]
//! and [`AuthError::InvalidToken`] because the HTTP layer maps them to
//! different statuses.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

use hrms_core::{Role, User};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Claims carried by both token classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    #[serde(rename = "companyId")]
    pub company_id: Uuid,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// The identity a token is minted for.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for TokenSubject {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            company_id: user.company_id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

impl From<&Claims> for TokenSubject {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            company_id: claims.company_id,
            email: claims.email.clone(),
            role: claims.role,
        }
    }
}

/// A freshly minted access+refresh pair with their expiry instants.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: OffsetDateTime,
    pub refresh_expires_at: OffsetDateTime,
}

/// Service for minting and verifying both token classes.
///
/// Thread-safe (`Send + Sync`) and cheap to share behind an `Arc`.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    issuer: String,
}

impl TokenService {
    /// Creates a token service from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the configuration is invalid.
    pub fn from_config(config: &AuthConfig) -> AuthResult<Self> {
        config.validate()?;
        Ok(Self {
            access_encoding: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            access_lifetime: config.access_token_lifetime,
            refresh_lifetime: config.refresh_token_lifetime,
            issuer: config.issuer.clone(),
        })
    }

    /// Signs a short-lived access token for `subject`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn generate_access_token(
        &self,
        subject: &TokenSubject,
    ) -> AuthResult<(String, OffsetDateTime)> {
        self.sign(subject, &self.access_encoding, self.access_lifetime)
    }

    /// Signs a long-lived refresh token for `subject` with the refresh secret.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn generate_refresh_token(
        &self,
        subject: &TokenSubject,
    ) -> AuthResult<(String, OffsetDateTime)> {
        self.sign(subject, &self.refresh_encoding, self.refresh_lifetime)
    }

    /// Mints a matched access+refresh pair.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding either token fails.
    pub fn issue_pair(&self, subject: &TokenSubject) -> AuthResult<TokenPair> {
        let (access_token, access_expires_at) = self.generate_access_token(subject)?;
        let (refresh_token, refresh_expires_at) = self.generate_refresh_token(subject)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// `AuthError::TokenExpired` on expiry; `AuthError::InvalidToken` for
    /// any other validation failure (bad signature, wrong issuer, a token
    /// signed with the refresh secret, unknown role, ...).
    pub fn verify_access_token(&self, token: &str) -> AuthResult<Claims> {
        self.verify(token, &self.access_decoding)
    }

    /// Verifies a refresh token against the refresh secret.
    ///
    /// # Errors
    ///
    /// Same split as [`Self::verify_access_token`].
    pub fn verify_refresh_token(&self, token: &str) -> AuthResult<Claims> {
        self.verify(token, &self.refresh_decoding)
    }

    /// Refresh-token lifetime, used for session expiry and cache TTLs.
    #[must_use]
    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    /// Returns the issuer embedded in minted tokens.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    fn sign(
        &self,
        subject: &TokenSubject,
        key: &EncodingKey,
        lifetime: Duration,
    ) -> AuthResult<(String, OffsetDateTime)> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + lifetime;
        let claims = Claims {
            sub: subject.user_id,
            company_id: subject.company_id,
            email: subject.email.clone(),
            role: subject.role,
            iss: self.issuer.clone(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| AuthError::internal(format!("Failed to encode token: {e}")))?;
        Ok((token, expires_at))
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, key, &validation).map_err(map_jwt_error)?;
        Ok(data.claims)
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::invalid_token(err.to_string()),
    }
}
