//! # hrms-auth
//!
//! Authentication and authorization module for the HRMS server.
//!
//! This crate provides:
//! - JWT access/refresh token pairs signed with independent secrets
//! - The authentication state machine (register, login, refresh, logout)
//! - Company registration with the first admin account
//! - Argon2id password hashing
//! - RBAC guards over the static role/permission matrix
//! - An Axum bearer-token extractor and the API error envelope
//!
//! ## Modules
//!
//! - [`config`] - Secrets and token lifetimes
//! - [`token`] - Token minting and verification
//! - [`password`] - Password hashing and verification
//! - [`service`] - The authentication flows
//! - [`cache`] - Refresh-token cache mirror trait
//! - [`middleware`] - Bearer extractor, permission guards, error responses

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use cache::RefreshTokenCache;
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use middleware::{AuthContext, AuthState, BearerAuth};
pub use password::{hash_password, verify_password};
pub use service::{
    AuthService, CompanyRegistrationRequest, CompanyRegistrationResponse, EmployeeRef,
    LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, SessionMeta, TokenResponse,
};
pub use token::{Claims, TokenPair, TokenService, TokenSubject};
