//! Prometheus metrics for the HRMS server.
//!
//! This module provides:
//! - HTTP request metrics (count, latency, active connections)
//! - Database pool metrics (connections, utilization)
//! - Cache metrics (hit/miss rates per tier, entries)
//! - Rate limiter metrics

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    pub const HTTP_ACTIVE_CONNECTIONS: &str = "http_active_connections";

    // Database pool metrics
    pub const DB_POOL_CONNECTIONS_TOTAL: &str = "db_pool_connections_total";
    pub const DB_POOL_CONNECTIONS_IDLE: &str = "db_pool_connections_idle";

    // Cache metrics
    pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
    pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
    pub const CACHE_ENTRIES: &str = "cache_entries";

    // Rate limiter metrics
    pub const RATE_LIMITED_TOTAL: &str = "rate_limited_total";
}

/// Initialize the Prometheus metrics exporter.
///
/// This should be called once at server startup.
/// Returns `true` if initialization succeeded, `false` if already initialized.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        tracing::debug!("Prometheus metrics already initialized");
        return false;
    }

    // Use install_recorder() for pull-based metrics (we serve /metrics ourselves)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROMETHEUS_HANDLE.set(handle).is_err() {
                tracing::warn!("Failed to store Prometheus handle (already set)");
                return false;
            }

            tracing::info!("Prometheus metrics initialized");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Render all metrics in Prometheus text format.
///
/// Returns `None` if metrics were not initialized.
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

// =============================================================================
// HTTP Metrics
// =============================================================================

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let status_class = match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };

    // Normalize path to avoid high cardinality
    let normalized_path = normalize_path(path);

    counter!(
        names::HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => normalized_path.clone(),
        "status" => status.to_string(),
        "status_class" => status_class.to_string()
    )
    .increment(1);

    histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => normalized_path
    )
    .record(duration.as_secs_f64());
}

/// Increment active HTTP connections.
pub fn increment_active_connections() {
    gauge!(names::HTTP_ACTIVE_CONNECTIONS).increment(1.0);
}

/// Decrement active HTTP connections.
pub fn decrement_active_connections() {
    gauge!(names::HTTP_ACTIVE_CONNECTIONS).decrement(1.0);
}

// =============================================================================
// Database Pool Metrics
// =============================================================================

/// Record database pool statistics.
pub fn record_db_pool_stats(total: u32, idle: usize) {
    gauge!(names::DB_POOL_CONNECTIONS_TOTAL).set(total as f64);
    gauge!(names::DB_POOL_CONNECTIONS_IDLE).set(idle as f64);
}

// =============================================================================
// Cache Metrics
// =============================================================================

/// Record a cache hit.
pub fn record_cache_hit(tier: &str) {
    counter!(names::CACHE_HITS_TOTAL, "tier" => tier.to_string()).increment(1);
}

/// Record a cache miss.
pub fn record_cache_miss() {
    counter!(names::CACHE_MISSES_TOTAL).increment(1);
}

/// Set the number of cache entries.
pub fn set_cache_entries(tier: &str, count: usize) {
    gauge!(names::CACHE_ENTRIES, "tier" => tier.to_string()).set(count as f64);
}

// =============================================================================
// Rate Limiter Metrics
// =============================================================================

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited(route: &str) {
    counter!(names::RATE_LIMITED_TOTAL, "route" => route.to_string()).increment(1);
}

// =============================================================================
// Helpers
// =============================================================================

/// Normalize a path to reduce cardinality.
///
/// Replaces resource IDs with placeholders to avoid creating too many unique label values.
fn normalize_path(path: &str) -> String {
    // /api/v1/employees/3f2a... -> /api/v1/employees/{id}
    let parts: Vec<&str> = path.split('/').collect();
    let normalized: Vec<String> = parts
        .iter()
        .map(|part| {
            if is_likely_id(part) {
                "{id}".to_string()
            } else {
                (*part).to_string()
            }
        })
        .collect();

    normalized.join("/")
}

/// Check if a string looks like an ID (UUID or numeric).
fn is_likely_id(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    // UUID pattern (with or without dashes)
    if s.len() == 36 && s.chars().filter(|c| *c == '-').count() == 4 {
        return true;
    }
    if s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return true;
    }

    // Numeric ID
    if s.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    false
}
