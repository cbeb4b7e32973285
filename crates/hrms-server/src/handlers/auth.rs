//! Authentication endpoints.
//!
//! Thin HTTP shims over `hrms_auth::AuthService`; the service owns all the
//! credential and token logic, these handlers only move JSON and headers.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};

use hrms_auth::middleware::BearerAuth;
use hrms_auth::{
    AuthError, CompanyRegistrationRequest, CompanyRegistrationResponse, LoginRequest,
    RefreshRequest, RegisterRequest, RegisterResponse, SessionMeta, TokenResponse,
};

use crate::state::AppState;

/// POST /api/v1/auth/register - create a user plus employee record.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    let response = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login - verify credentials and issue a token pair.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let meta = session_meta(&headers);
    let response = state.auth.login(request, meta).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh-token - rotate a refresh token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = state.auth.refresh(&request.refresh_token).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout - drop the caller's session and refresh token.
pub async fn logout(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
) -> Result<StatusCode, AuthError> {
    state.auth.logout(ctx.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/companies/register - provision a tenant with its
/// first admin account.
pub async fn register_company(
    State(state): State<AppState>,
    Json(request): Json<CompanyRegistrationRequest>,
) -> Result<(StatusCode, Json<CompanyRegistrationResponse>), AuthError> {
    let response = state.auth.register_company(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Pulls session metadata out of request headers.
///
/// The server sits behind a proxy in every deployed topology, so the client
/// address comes from `X-Forwarded-For` (first hop) or `X-Real-IP` rather
/// than the socket peer.
fn session_meta(headers: &HeaderMap) -> SessionMeta {
    let device_info = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        });

    SessionMeta {
        device_info,
        ip_address,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_meta_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static("hrms-cli/1.0"),
        );
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.2"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));

        let meta = session_meta(&headers);
        assert_eq!(meta.device_info.as_deref(), Some("hrms-cli/1.0"));
        assert_eq!(meta.ip_address.as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_session_meta_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));

        let meta = session_meta(&headers);
        assert_eq!(meta.ip_address.as_deref(), Some("198.51.100.4"));
        assert!(meta.device_info.is_none());
    }

    #[test]
    fn test_session_meta_empty_headers() {
        let meta = session_meta(&HeaderMap::new());
        assert!(meta.ip_address.is_none());
        assert!(meta.device_info.is_none());
    }
}
