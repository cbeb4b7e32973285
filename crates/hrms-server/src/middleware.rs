//! HTTP middleware: request id propagation and content negotiation.
//!
//! Authentication and authorization live in `hrms-auth` (the `BearerAuth`
//! extractor); this module only carries the cross-cutting plumbing every
//! route shares.

use std::time::Instant;

use axum::{
    Json,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::metrics;

// Middleware that ensures each request has an X-Request-Id and mirrors it on the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it; otherwise generate one
    let req_id_value = req
        .headers()
        .get(&header_name)
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        });

    // Add to request extensions for downstream usage (e.g., logging)
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    // Add/propagate the request id header to response
    res.headers_mut().insert(header_name, req_id_value);

    res
}

// Content negotiation middleware: the API speaks JSON only. Accept must allow
// application/json, and POST/PUT bodies must declare it.
pub async fn content_negotiation(req: Request<Body>, next: Next) -> Response {
    let accepts_hdr = req.headers().get("accept").and_then(|v| v.to_str().ok());
    let accept_ok = accepts_hdr
        .map(|v| {
            let v = v.to_ascii_lowercase();
            v.contains("application/json") || v.contains("*/*")
        })
        .unwrap_or(true); // if missing, treat as ok per HTTP defaults

    if !accept_ok {
        return error_response(
            StatusCode::NOT_ACCEPTABLE,
            "Only application/json is supported in Accept",
        );
    }

    let method = req.method().clone();
    let needs_body_type = method == Method::POST || method == Method::PUT;

    if needs_body_type {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase());
        let content_ok = content_type
            .as_deref()
            .map(|s| s.starts_with("application/json"))
            .unwrap_or(false);
        if !content_ok {
            return error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type must be application/json",
            );
        }
    }

    next.run(req).await
}

// Counts requests, measures latency, and tracks the in-flight gauge. Uses
// the route template (not the raw path) to keep metric cardinality bounded.
pub async fn track_http_metrics(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    metrics::increment_active_connections();
    let res = next.run(req).await;
    metrics::decrement_active_connections();

    metrics::record_http_request(&method, &path, res.status().as_u16(), start.elapsed());
    res
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    let code = if status == StatusCode::NOT_ACCEPTABLE {
        "not_acceptable"
    } else {
        "unsupported_media_type"
    };
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    let body: Value = json!({
        "success": false,
        "error": {
            "message": msg,
            "code": code,
        },
        "timestamp": timestamp,
    });
    (status, Json(body)).into_response()
}

