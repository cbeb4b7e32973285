//! Health and metrics endpoints. Both are public.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::metrics::{self, render_metrics};
use crate::state::AppState;

/// GET /health - liveness plus dependency reachability flags.
///
/// Always answers 200; a dead database or unreachable Redis flips the
/// corresponding flag and the overall status to `degraded` so probes can
/// distinguish "up but limping" from "down".
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(pool) => {
            metrics::record_db_pool_stats(pool.size(), pool.num_idle());
            hrms_postgres::test_connection(pool).await.is_ok()
        }
        // No pool means a non-Postgres backend; nothing to probe.
        None => true,
    };

    let stats = state.cache.backend().stats();
    metrics::set_cache_entries("l1", stats.l1_entries);
    let cache = if state.cache.backend().redis_pool().is_some() {
        state.cache.backend().is_redis_available().await
    } else {
        true
    };

    let status = if database && cache { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.started_at.elapsed().as_secs(),
        "database": database,
        "cache": cache,
        "cacheMode": stats.mode,
    }))
}

/// GET /metrics - Prometheus text exposition.
pub async fn prometheus_metrics() -> impl IntoResponse {
    match render_metrics() {
        Some(body) => (StatusCode::OK, body).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed\n",
        )
            .into_response(),
    }
}
