//! Per-user, per-route fixed-window rate limiting.
//!
//! Counters live in the shared cache store (`rate_limit:<userId>:<route>`,
//! atomic INCR, TTL = window on the first increment) so the limit holds
//! across server instances. When Redis is unreachable or disabled the
//! limiter degrades to a per-instance counter map with the same window
//! semantics; stale local windows are reset on next touch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use uuid::Uuid;

use hrms_auth::AuthError;
use hrms_auth::middleware::BearerAuth;

use crate::cache::{CacheBackend, keys};
use crate::config::RateLimitConfig;
use crate::state::AppState;

#[derive(Debug)]
struct WindowCounter {
    count: u64,
    window_started: Instant,
}

/// Fixed-window limiter over the two-tier cache backend.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    backend: CacheBackend,
    local: Arc<DashMap<String, WindowCounter>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, backend: CacheBackend) -> Self {
        Self {
            config,
            backend,
            local: Arc::new(DashMap::new()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Count one request for `user_id` on `route`.
    ///
    /// Returns `true` while the window's request count stays within the
    /// configured maximum.
    pub async fn allow(&self, user_id: Uuid, route: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        let key = keys::rate_limit(user_id, route);
        let count = match self.backend.redis_pool() {
            Some(pool) => match self.increment_shared(pool, &key).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "shared rate-limit counter unavailable, using local");
                    self.increment_local(&key)
                }
            },
            None => self.increment_local(&key),
        };

        if count > self.config.max_requests {
            tracing::debug!(key = %key, count, max = self.config.max_requests, "rate limit exceeded");
            crate::metrics::record_rate_limited(route);
            false
        } else {
            true
        }
    }

    async fn increment_shared(&self, pool: &Pool, key: &str) -> Result<u64, String> {
        let mut conn = pool
            .get()
            .await
            .map_err(|e| format!("failed to get Redis connection: {e}"))?;

        let count: u64 = conn
            .incr(key, 1)
            .await
            .map_err(|e| format!("INCR failed: {e}"))?;

        // TTL = window on the first increment of the window
        if count == 1 {
            let window = i64::try_from(self.config.window_secs).unwrap_or(i64::MAX);
            conn.expire::<_, ()>(key, window)
                .await
                .map_err(|e| format!("EXPIRE failed: {e}"))?;
        }

        Ok(count)
    }

    fn increment_local(&self, key: &str) -> u64 {
        let window = Duration::from_secs(self.config.window_secs);
        let mut entry = self.local.entry(key.to_string()).or_insert(WindowCounter {
            count: 0,
            window_started: Instant::now(),
        });
        if entry.window_started.elapsed() >= window {
            entry.count = 0;
            entry.window_started = Instant::now();
        }
        entry.count += 1;
        entry.count
    }
}

/// Middleware guarding the resource routes.
///
/// Runs after the bearer token is verified (the extractor rejects
/// unauthenticated requests) and keys the counter by the matched route
/// template, so `/employees/{id}` counts as one route regardless of id.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let route = format!("{}:{}", req.method(), path);

    if !state.rate_limiter.allow(ctx.user_id, &route).await {
        return AuthError::forbidden("Rate limit exceeded").into_response();
    }

    next.run(req).await
}
