//! Error response handling for authentication middleware.
//!
//! Implements `IntoResponse` for `AuthError` with the API's error envelope:
//! `{"success": false, "error": {"message", "code"}, "timestamp"}`. The
//! status split that matters most: expired access tokens are 401 (refresh
//! and retry) while signature-invalid tokens are 403 (credentials rejected).

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = error_details(&self);

        if status.is_server_error() {
            tracing::error!(error = %self, "auth request failed");
        }

        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let body = json!({
            "success": false,
            "error": {
                "message": message,
                "code": code,
            },
            "timestamp": timestamp,
        });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = format!("Bearer error=\"{code}\", error_description=\"{message}\"");
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Extracts (HTTP status, machine-readable code, message) from an error.
fn error_details(error: &AuthError) -> (StatusCode, &'static str, String) {
    match error {
        AuthError::Unauthorized { message } => {
            (StatusCode::UNAUTHORIZED, "unauthorized", message.clone())
        }
        AuthError::TokenExpired => (
            StatusCode::UNAUTHORIZED,
            "token_expired",
            "Token has expired".to_string(),
        ),
        AuthError::InvalidToken { message } => {
            (StatusCode::FORBIDDEN, "invalid_token", message.clone())
        }
        AuthError::Forbidden { message } => (StatusCode::FORBIDDEN, "forbidden", message.clone()),
        AuthError::InvalidRequest { message } => {
            (StatusCode::BAD_REQUEST, "invalid_request", message.clone())
        }
        AuthError::Conflict { message } => (StatusCode::CONFLICT, "conflict", message.clone()),
        AuthError::NotFound { entity } => (
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{entity} not found"),
        ),
        AuthError::Storage { .. } | AuthError::Configuration { .. } | AuthError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_expired_token_maps_to_401_with_challenge() {
        let response = AuthError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(challenge.contains("token_expired"));

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "token_expired");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_signature_maps_to_403() {
        let response = AuthError::invalid_token("InvalidSignature").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "invalid_token");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (AuthError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (AuthError::forbidden("x"), StatusCode::FORBIDDEN),
            (AuthError::invalid_request("x"), StatusCode::BAD_REQUEST),
            (AuthError::conflict("x"), StatusCode::CONFLICT),
            (AuthError::not_found("User"), StatusCode::NOT_FOUND),
            (AuthError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_server_errors_do_not_leak_details() {
        let response = AuthError::storage("connection string with secrets").into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Internal server error");
    }
}
