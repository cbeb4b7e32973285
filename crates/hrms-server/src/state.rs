//! Shared application state threaded through every handler.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;

use hrms_auth::AuthService;
use hrms_auth::middleware::AuthState;
use hrms_postgres::PgPool;
use hrms_storage::HrmsStorage;

use crate::cache::CacheStore;
use crate::rate_limit::RateLimiter;

/// Application state.
///
/// Everything here is cheap to clone: `Arc` handles and pool handles.
/// The storage seam is `Arc<dyn HrmsStorage>` so tests can substitute an
/// in-memory implementation for PostgreSQL.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn HrmsStorage>,
    pub cache: CacheStore,
    pub auth: Arc<AuthService>,
    pub auth_state: AuthState,
    pub rate_limiter: RateLimiter,
    /// Present when backed by PostgreSQL; health checks ping through it.
    pub db_pool: Option<PgPool>,
    pub started_at: Instant,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth_state.clone()
    }
}
