//! HRMS HTTP server: multi-tenant HR management over PostgreSQL with a
//! two-tier (in-process + Redis) cache.
//!
//! The library surface exists so integration tests and embedders can build
//! the router against any [`hrms_storage::HrmsStorage`] implementation;
//! `main.rs` wires the PostgreSQL-backed production assembly.

pub mod cache;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod rate_limit;
pub mod server;
pub mod state;

pub use cache::{CacheBackend, CacheStore, CachedEntry};
pub use config::{
    AppConfig, CacheConfig, PostgresStorageConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
pub use observability::{apply_logging_level, init_tracing};
pub use rate_limit::RateLimiter;
pub use server::{HrmsServer, ServerBuilder, build_app};
pub use state::AppState;

/// Create a cache backend based on configuration.
///
/// ## Cache Modes
///
/// - **Redis disabled**: Returns local-only cache (DashMap)
/// - **Redis enabled**: Attempts to connect to Redis, falls back to local on failure
///
/// ## Graceful Degradation
///
/// If Redis connection fails, the system automatically falls back to local-only mode.
/// This allows the server to start and run even if Redis is unavailable.
pub async fn create_cache_backend(config: &RedisConfig) -> CacheBackend {
    use std::time::Duration;

    if !config.enabled {
        tracing::info!("Redis disabled, using local cache only");
        return CacheBackend::new_local();
    }

    tracing::info!(url = %config.url, "Connecting to Redis");

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    let mut pool_config = redis_config.pool.unwrap_or_default();
    pool_config.max_size = config.pool_size;
    pool_config.timeouts.wait = Some(Duration::from_millis(config.timeout_ms));
    pool_config.timeouts.create = Some(Duration::from_millis(config.timeout_ms));
    pool_config.timeouts.recycle = Some(Duration::from_millis(config.timeout_ms));
    redis_config.pool = Some(pool_config);

    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to create Redis pool. Falling back to local cache."
            );
            return CacheBackend::new_local();
        }
    };

    // Test connection
    match pool.get().await {
        Ok(_) => {
            tracing::info!("Connected to Redis");

            let backend = CacheBackend::new_redis(pool.clone());

            // Start cache invalidation listener
            if let Some(local) = backend.local_cache() {
                cache::CacheInvalidationListener {
                    redis_pool: pool,
                    redis_url: config.url.clone(),
                    local_cache: local.clone(),
                }
                .start()
                .await;
            }

            backend
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to connect to Redis. Falling back to local cache."
            );
            CacheBackend::new_local()
        }
    }
}
