//! Authentication flows: register, login, refresh, logout, and company
//! registration.
//!
//! The service is storage-agnostic: it talks to the entity traits from
//! `hrms-storage` plus the [`RefreshTokenCache`] mirror, and owns no
//! persistence of its own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use hrms_core::{
    Company, Employee, EmploymentStatus, EmploymentType, NewCompany, Role, Session, User,
    UserSummary, generate_employee_number,
};
use hrms_storage::{CompanyStorage, SessionStorage, UserStorage};

use crate::cache::RefreshTokenCache;
use crate::error::{AuthError, AuthResult};
use crate::password::{hash_password, verify_password};
use crate::token::{TokenService, TokenSubject};

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Reference to the employee record derived at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub id: Uuid,
    pub employee_number: String,
}

/// Response for a successful registration. No tokens are issued here; the
/// client logs in afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: UserSummary,
    pub employee: EmployeeRef,
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub company_id: Uuid,
}

/// The access+refresh pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Payload for `POST /auth/refresh-token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Payload for `POST /auth/companies/register`: the company fields plus the
/// first admin's account details, in one flat body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRegistrationRequest {
    #[serde(flatten)]
    pub company: NewCompany,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_first_name: String,
    pub admin_last_name: String,
}

/// Response for a successful company registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRegistrationResponse {
    pub company: Company,
    pub admin_user: UserSummary,
}

/// Request metadata recorded on the session row.
#[derive(Debug, Clone, Default)]
pub struct SessionMeta {
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

/// Authentication service.
pub struct AuthService {
    users: Arc<dyn UserStorage>,
    sessions: Arc<dyn SessionStorage>,
    companies: Arc<dyn CompanyStorage>,
    refresh_cache: Arc<dyn RefreshTokenCache>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStorage>,
        sessions: Arc<dyn SessionStorage>,
        companies: Arc<dyn CompanyStorage>,
        refresh_cache: Arc<dyn RefreshTokenCache>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            sessions,
            companies,
            refresh_cache,
            tokens,
        }
    }

    /// Registers a user and their derived employee record in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// `AuthError::Conflict` if `(email, companyId)` is already taken;
    /// `AuthError::InvalidRequest` for missing or malformed fields.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<RegisterResponse> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        require_field(&request.first_name, "firstName")?;
        require_field(&request.last_name, "lastName")?;

        let password_hash = hash_password(&request.password)?;
        let now = OffsetDateTime::now_utc();

        let user = User {
            id: Uuid::new_v4(),
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            company_id: request.company_id,
            created_at: now,
            updated_at: now,
        };
        let employee = derive_employee(&user, now);

        self.users.create_user_with_employee(&user, &employee).await?;
        info!(user_id = %user.id, company_id = %user.company_id, "user registered");

        Ok(RegisterResponse {
            user: user.summary(),
            employee: EmployeeRef {
                id: employee.id,
                employee_number: employee.employee_number,
            },
        })
    }

    /// Authenticates a user and issues a fresh token pair.
    ///
    /// On success the session row is upserted (one row per user, so any
    /// previous device's refresh token is displaced) and the refresh token
    /// is mirrored into the cache with TTL = refresh lifetime.
    ///
    /// # Errors
    ///
    /// `AuthError::Unauthorized` when the user is absent in that company or
    /// the password does not match. The two cases are indistinguishable to
    /// the caller.
    pub async fn login(&self, request: LoginRequest, meta: SessionMeta) -> AuthResult<TokenResponse> {
        let user = self
            .users
            .find_user_by_email(&request.email, request.company_id)
            .await?
            .ok_or_else(|| AuthError::unauthorized("Invalid credentials"))?;

        if !verify_password(&request.password, &user.password_hash)? {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::unauthorized("Invalid credentials"));
        }

        let pair = self.tokens.issue_pair(&TokenSubject::from(&user))?;
        let now = OffsetDateTime::now_utc();
        let session = Session {
            user_id: user.id,
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            expires_at: pair.refresh_expires_at,
            device_info: meta.device_info,
            ip_address: meta.ip_address,
            created_at: now,
            updated_at: now,
        };
        self.sessions.upsert_session(&session).await?;
        self.refresh_cache
            .store_refresh_token(user.id, &pair.refresh_token, self.tokens.refresh_lifetime())
            .await?;

        info!(user_id = %user.id, "login succeeded");
        Ok(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Rotates a refresh token after cross-validating it against both the
    /// cache mirror and the durable session row.
    ///
    /// # Errors
    ///
    /// `AuthError::TokenExpired` (401) when the presented token has lapsed;
    /// `AuthError::InvalidToken` (403) when its signature is bad;
    /// `AuthError::Forbidden` (403) when either validity source disagrees
    /// with the presented token, including replay of a rotated token.
    pub async fn refresh(&self, presented: &str) -> AuthResult<TokenResponse> {
        let claims = self.tokens.verify_refresh_token(presented)?;
        let user_id = claims.sub;

        let cached = self.refresh_cache.get_refresh_token(user_id).await?;
        if cached.as_deref() != Some(presented) {
            debug!(%user_id, "refresh token cache mismatch");
            return Err(AuthError::forbidden("Invalid or expired refresh token"));
        }

        let session = self
            .sessions
            .find_session_by_user(user_id)
            .await?
            .filter(|s| s.refresh_token == presented && !s.is_expired())
            .ok_or_else(|| {
                debug!(%user_id, "refresh token session mismatch");
                AuthError::forbidden("Invalid or expired refresh token")
            })?;

        let pair = self.tokens.issue_pair(&TokenSubject::from(&claims))?;
        let rotated = Session {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            expires_at: pair.refresh_expires_at,
            updated_at: OffsetDateTime::now_utc(),
            ..session
        };
        self.sessions.upsert_session(&rotated).await?;
        self.refresh_cache
            .store_refresh_token(user_id, &pair.refresh_token, self.tokens.refresh_lifetime())
            .await?;

        debug!(%user_id, "refresh token rotated");
        Ok(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Invalidates the caller's session: cache mirror and durable row.
    ///
    /// Idempotent; logging out twice is not an error.
    pub async fn logout(&self, user_id: Uuid) -> AuthResult<()> {
        self.refresh_cache.delete_refresh_token(user_id).await?;
        self.sessions.delete_session(user_id).await?;
        info!(%user_id, "logged out");
        Ok(())
    }

    /// Creates a company, its first COMPANY_ADMIN user, and that user's
    /// employee record in a single transaction.
    ///
    /// # Errors
    ///
    /// `AuthError::Conflict` when the domain or the admin email is taken.
    pub async fn register_company(
        &self,
        request: CompanyRegistrationRequest,
    ) -> AuthResult<CompanyRegistrationResponse> {
        require_field(&request.company.name, "name")?;
        require_field(&request.company.domain, "domain")?;
        validate_email(&request.admin_email)?;
        validate_password(&request.admin_password)?;
        require_field(&request.admin_first_name, "adminFirstName")?;
        require_field(&request.admin_last_name, "adminLastName")?;

        let password_hash = hash_password(&request.admin_password)?;
        let now = OffsetDateTime::now_utc();

        let company = Company {
            id: Uuid::new_v4(),
            name: request.company.name,
            domain: request.company.domain,
            industry: request.company.industry,
            company_size: request.company.company_size,
            subscription_plan: request.company.subscription_plan,
            billing_cycle: request.company.billing_cycle,
            max_employees: request.company.max_employees,
            max_storage_gb: request.company.max_storage_gb,
            created_at: now,
        };
        let admin = User {
            id: Uuid::new_v4(),
            email: request.admin_email,
            password_hash,
            first_name: request.admin_first_name,
            last_name: request.admin_last_name,
            role: Role::CompanyAdmin,
            company_id: company.id,
            created_at: now,
            updated_at: now,
        };
        let employee = derive_employee(&admin, now);

        self.companies
            .register_company(&company, &admin, &employee)
            .await?;
        info!(company_id = %company.id, "company registered");

        Ok(CompanyRegistrationResponse {
            admin_user: admin.summary(),
            company,
        })
    }

    /// The token service used by this instance.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

/// Builds the employee record derived from a freshly registered user.
fn derive_employee(user: &User, now: OffsetDateTime) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        company_id: user.company_id,
        user_id: Some(user.id),
        employee_number: generate_employee_number(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        department_id: None,
        manager_id: None,
        hire_date: now.date(),
        employment_type: EmploymentType::FullTime,
        employment_status: EmploymentStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

fn require_field(value: &str, name: &str) -> AuthResult<()> {
    if value.trim().is_empty() {
        return Err(AuthError::invalid_request(format!("{name} is required")));
    }
    Ok(())
}

fn validate_email(email: &str) -> AuthResult<()> {
    require_field(email, "email")?;
    if !email.contains('@') {
        return Err(AuthError::invalid_request("email is invalid"));
    }
    Ok(())
}

fn validate_password(password: &str) -> AuthResult<()> {
    if password.len() < 8 {
        return Err(AuthError::invalid_request(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}
