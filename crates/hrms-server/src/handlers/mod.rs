//! HTTP handlers, grouped by resource.
//!
//! Every handler returns `Result<_, AuthError>` so error responses share one
//! envelope. Company scoping follows one rule set: creates check the body's
//! `companyId` against the token, reads and deletes require a `companyId`
//! query parameter that must match the token, and updates take the company
//! from the token alone.

use serde::Deserialize;
use uuid::Uuid;

use hrms_auth::middleware::AuthContext;
use hrms_auth::{AuthError, AuthResult};
use hrms_core::{DEFAULT_PAGE_LIMIT, PageQuery};

pub mod auth;
pub mod departments;
pub mod employees;
pub mod health;
pub mod leaves;

/// Query parameters for detail, delete, and analytics endpoints, which
/// carry only the company scope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompanyScope {
    pub company_id: Option<Uuid>,
}

/// Resolves the company a request operates on.
///
/// The query parameter is mandatory for reads and deletes so a caller can
/// never fall through to an unscoped lookup, and it must name the caller's
/// own company.
pub(crate) fn required_company(
    ctx: &AuthContext,
    company_id: Option<Uuid>,
) -> AuthResult<Uuid> {
    let company_id = company_id
        .ok_or_else(|| AuthError::invalid_request("companyId query parameter is required"))?;
    ctx.ensure_company(company_id)?;
    Ok(company_id)
}

/// Builds a normalized page query from optional query parameters.
pub(crate) fn page_query(page: Option<u32>, limit: Option<u32>) -> PageQuery {
    PageQuery::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::Role;

    fn context(company_id: Uuid) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            company_id,
            email: "hr@acme.test".into(),
            role: Role::Hr,
        }
    }

    #[test]
    fn test_required_company_missing_param() {
        let ctx = context(Uuid::new_v4());
        let err = required_company(&ctx, None).unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[test]
    fn test_required_company_mismatch_is_forbidden() {
        let ctx = context(Uuid::new_v4());
        let err = required_company(&ctx, Some(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden { .. }));
    }

    #[test]
    fn test_required_company_match() {
        let company_id = Uuid::new_v4();
        let ctx = context(company_id);
        assert_eq!(required_company(&ctx, Some(company_id)).unwrap(), company_id);
    }

    #[test]
    fn test_page_query_defaults() {
        let query = page_query(None, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_page_query_normalizes() {
        let query = page_query(Some(0), Some(9999));
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 100);
    }
}
