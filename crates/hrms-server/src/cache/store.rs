//! Typed JSON facade over the byte-oriented cache backend.
//!
//! Handlers never touch raw bytes: reads deserialize from JSON, writes
//! serialize to JSON, and every entry is a whole-value snapshot of database
//! state. Cache problems are logged and degrade to misses; they never fail
//! the request.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use uuid::Uuid;

use hrms_auth::{AuthResult, RefreshTokenCache};

use super::backend::CacheBackend;
use super::keys;

/// Cache-aside store with a fixed default TTL for resource reads.
#[derive(Clone)]
pub struct CacheStore {
    backend: CacheBackend,
    default_ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: CacheBackend, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    /// Look up and deserialize a cached value.
    ///
    /// An entry that no longer decodes (schema drift between releases) is
    /// dropped and reported as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.backend.get(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "dropping undecodable cache entry");
                self.backend.invalidate(key).await;
                None
            }
        }
    }

    /// Serialize and store a value under the default TTL.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        self.set_json_with_ttl(key, value, self.default_ttl).await;
    }

    /// Serialize and store a value with an explicit TTL.
    pub async fn set_json_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.backend.set(key, bytes, ttl).await,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to serialize cache value");
            }
        }
    }

    pub async fn invalidate(&self, key: &str) {
        self.backend.invalidate(key).await;
    }

    pub async fn invalidate_prefix(&self, prefix: &str) {
        self.backend.invalidate_prefix(prefix).await;
    }
}

#[async_trait]
impl RefreshTokenCache for CacheStore {
    async fn store_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        ttl: Duration,
    ) -> AuthResult<()> {
        self.set_json_with_ttl(&keys::refresh_token(user_id), &token, ttl)
            .await;
        Ok(())
    }

    async fn get_refresh_token(&self, user_id: Uuid) -> AuthResult<Option<String>> {
        Ok(self.get_json(&keys::refresh_token(user_id)).await)
    }

    async fn delete_refresh_token(&self, user_id: Uuid) -> AuthResult<()> {
        self.invalidate(&keys::refresh_token(user_id)).await;
        Ok(())
    }
}
