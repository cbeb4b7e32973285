//! Axum middleware for bearer-token authentication and RBAC guards.

mod auth;
mod error;

pub use auth::{AuthContext, AuthState, BearerAuth};
