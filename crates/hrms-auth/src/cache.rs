//! Refresh-token cache mirror.
//!
//! The durable session row is the authority; the cache entry under
//! `refresh_token:<userId>` is a fast-path secondary source. Refresh
//! validation requires BOTH to match the presented token, so a stale or
//! evicted cache entry can only reject, never accept.

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use crate::error::AuthResult;

/// Cache-backed mirror of each user's current refresh token.
///
/// Implemented by the server's cache layer; injected into
/// [`crate::service::AuthService`] so this crate stays backend-free.
#[async_trait]
pub trait RefreshTokenCache: Send + Sync {
    /// Stores `token` as the current refresh token for `user_id` with the
    /// given TTL, replacing any previous value.
    async fn store_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        ttl: Duration,
    ) -> AuthResult<()>;

    /// Fetches the cached refresh token for `user_id`, if present.
    async fn get_refresh_token(&self, user_id: Uuid) -> AuthResult<Option<String>>;

    /// Removes the cached refresh token. Idempotent.
    async fn delete_refresh_token(&self, user_id: Uuid) -> AuthResult<()>;
}
