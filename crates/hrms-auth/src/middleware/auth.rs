//! Bearer token authentication extractor.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use hrms_auth::middleware::BearerAuth;
//! use hrms_core::Permission;
//!
//! async fn protected_handler(BearerAuth(auth): BearerAuth) -> Result<String, hrms_auth::AuthError> {
//!     auth.require_any_permission(&[Permission::ViewUsers])?;
//!     Ok(format!("Hello, {}!", auth.email))
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use hrms_core::{Permission, Role};

use crate::error::AuthError;
use crate::token::{Claims, TokenService};

/// State required for bearer token authentication.
///
/// Include this in the application state and expose it to the extractor
/// via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// Token service for access-token verification.
    pub token_service: Arc<TokenService>,
}

impl AuthState {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }
}

/// Authenticated request context carried by [`BearerAuth`].
///
/// Everything here comes from the verified access token; nothing is loaded
/// from storage on the hot path.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    /// ANY-of permission guard: passes when the caller's role holds at
    /// least one of `required`. `super_admin` bypasses the check entirely.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` when no required permission is held.
    pub fn require_any_permission(&self, required: &[Permission]) -> Result<(), AuthError> {
        if self.role.is_super_admin() {
            return Ok(());
        }
        if self.role.has_any_permission(required) {
            Ok(())
        } else {
            tracing::debug!(user_id = %self.user_id, role = %self.role, "permission denied");
            Err(AuthError::forbidden("Insufficient permissions"))
        }
    }

    /// Like [`Self::require_any_permission`], but also passes when the
    /// caller is acting on their own record (`owner_id` equals the caller).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` when neither condition holds.
    pub fn require_any_permission_or_self(
        &self,
        required: &[Permission],
        owner_id: Uuid,
    ) -> Result<(), AuthError> {
        if self.user_id == owner_id {
            return Ok(());
        }
        self.require_any_permission(required)
    }

    /// Tenant guard: the caller's token must belong to `company_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` on any cross-company access attempt.
    pub fn ensure_company(&self, company_id: Uuid) -> Result<(), AuthError> {
        if self.company_id == company_id {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                token_company = %self.company_id,
                requested_company = %company_id,
                "cross-company access rejected"
            );
            Err(AuthError::forbidden("Access to this company is denied"))
        }
    }
}

impl From<&Claims> for AuthContext {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            company_id: claims.company_id,
            email: claims.email.clone(),
            role: claims.role,
        }
    }
}

/// Axum extractor that validates the `Authorization: Bearer` header and
/// yields an [`AuthContext`].
///
/// # Errors
///
/// Returns `AuthError` (which implements `IntoResponse`) if:
/// - the Authorization header is missing or malformed (401)
/// - the token has expired (401)
/// - the token signature or claims are invalid (403)
pub struct BearerAuth(pub AuthContext);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;

        let claims = auth_state.token_service.verify_access_token(token)?;

        Ok(BearerAuth(AuthContext::from(&claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            email: "jane@acme.test".into(),
            role,
        }
    }

    #[test]
    fn test_any_of_semantics() {
        let ctx = context(Role::Employee);
        // Holds request_leave but not manage_leave_requests.
        assert!(
            ctx.require_any_permission(&[
                Permission::ManageLeaveRequests,
                Permission::RequestLeave
            ])
            .is_ok()
        );
        assert!(
            ctx.require_any_permission(&[Permission::ManageLeaveRequests])
                .is_err()
        );
    }

    #[test]
    fn test_super_admin_bypasses_checks() {
        let ctx = context(Role::SuperAdmin);
        assert!(ctx.require_any_permission(&[Permission::ProcessPayroll]).is_ok());
        assert!(ctx.require_any_permission(&[]).is_ok());
    }

    #[test]
    fn test_empty_requirement_fails_closed() {
        let ctx = context(Role::CompanyAdmin);
        assert!(ctx.require_any_permission(&[]).is_err());
    }

    #[test]
    fn test_self_access_override() {
        let ctx = context(Role::Employee);
        // No view_all permission, but the caller owns the record.
        assert!(
            ctx.require_any_permission_or_self(
                &[Permission::ViewAllEmployeeProfiles],
                ctx.user_id
            )
            .is_ok()
        );
        assert!(
            ctx.require_any_permission_or_self(
                &[Permission::ViewAllEmployeeProfiles],
                Uuid::new_v4()
            )
            .is_err()
        );
    }

    #[test]
    fn test_company_guard() {
        let ctx = context(Role::CompanyAdmin);
        assert!(ctx.ensure_company(ctx.company_id).is_ok());
        assert!(matches!(
            ctx.ensure_company(Uuid::new_v4()).unwrap_err(),
            AuthError::Forbidden { .. }
        ));
    }
}
