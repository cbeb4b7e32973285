//! Authentication and authorization error types.
//!
//! This module defines all error types that can occur during authentication
//! and authorization operations. The HTTP mapping lives in
//! `middleware::error`; the important distinction there is that an expired
//! access token maps to 401 while a signature-invalid one maps to 403, so
//! clients can tell "refresh and retry" apart from "credentials rejected".

use hrms_storage::StorageError;

/// Errors that can occur during authentication and authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The access or refresh token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token is malformed, carries a bad signature, or fails validation
    /// for any reason other than expiry.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The authenticated user does not have permission to perform the action.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// The request payload is invalid or incomplete.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// A uniqueness constraint was violated (duplicate email, domain, ...).
    #[error("Conflict: {message}")]
    Conflict {
        /// Which constraint was violated.
        message: String,
    },

    /// The referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// The kind of entity that was not found.
        entity: String,
    },

    /// An error occurred while storing or retrieving auth data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the error maps to a 4xx response.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. }
        )
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, .. } => Self::NotFound { entity },
            StorageError::AlreadyExists { entity, detail } => Self::Conflict {
                message: format!("{entity} already exists: {detail}"),
            },
            StorageError::InvalidInput { message } => Self::InvalidRequest { message },
            other => Self::Storage {
                message: other.to_string(),
            },
        }
    }
}

/// Type alias for results of auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AuthError::unauthorized("missing header").to_string(),
            "Unauthorized: missing header"
        );
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
        assert_eq!(
            AuthError::invalid_token("bad signature").to_string(),
            "Invalid token: bad signature"
        );
        assert_eq!(AuthError::not_found("User").to_string(), "User not found");
    }

    #[test]
    fn test_storage_error_mapping() {
        let err: AuthError = StorageError::not_found("User", "abc").into();
        assert!(matches!(err, AuthError::NotFound { .. }));

        let err: AuthError = StorageError::already_exists("User", "email taken").into();
        assert!(matches!(err, AuthError::Conflict { .. }));

        let err: AuthError = StorageError::database("pool exhausted").into();
        assert!(matches!(err, AuthError::Storage { .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_error_predicate() {
        assert!(AuthError::TokenExpired.is_client_error());
        assert!(AuthError::forbidden("no").is_client_error());
        assert!(!AuthError::internal("boom").is_client_error());
    }
}
