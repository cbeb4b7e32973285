//! Employee CRUD and analytics handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use hrms_auth::AuthError;
use hrms_auth::middleware::BearerAuth;
use hrms_core::{
    Employee, EmployeeAnalytics, EmployeeFilter, EmployeeUpdate, EmploymentStatus, NewEmployee,
    Page, Permission,
};

use crate::cache::keys;
use crate::state::AppState;

use super::{CompanyScope, page_query, required_company};

const MANAGE: &[Permission] = &[Permission::ManageEmployeeProfiles];
const VIEW_ALL: &[Permission] = &[Permission::ViewAllEmployeeProfiles];
const ANALYTICS: &[Permission] = &[Permission::ViewCompanyAnalytics];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListParams {
    pub company_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub employment_status: Option<EmploymentStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// POST /api/v1/employees - create an employee record.
pub async fn create(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Json(input): Json<NewEmployee>,
) -> Result<(StatusCode, Json<Employee>), AuthError> {
    ctx.ensure_company(input.company_id)?;
    ctx.require_any_permission(MANAGE)?;

    let employee = input.into_employee();
    state.storage.create_employee(&employee).await?;

    state
        .cache
        .invalidate_prefix(&keys::employee_list_prefix(employee.company_id))
        .await;
    state
        .cache
        .invalidate(&keys::employee_analytics(employee.company_id))
        .await;

    tracing::info!(
        id = %employee.id,
        employee_number = %employee.employee_number,
        company_id = %employee.company_id,
        "created employee"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/v1/employees - list employees with optional filters.
pub async fn list(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Query(params): Query<EmployeeListParams>,
) -> Result<Json<Page<Employee>>, AuthError> {
    let company_id = required_company(&ctx, params.company_id)?;
    ctx.require_any_permission(VIEW_ALL)?;

    let filter = EmployeeFilter {
        department_id: params.department_id,
        manager_id: params.manager_id,
        employment_status: params.employment_status,
    };
    let page = page_query(params.page, params.limit);

    let cache_key = keys::employee_list(company_id, &filter, &page);
    if let Some(cached) = state.cache.get_json::<Page<Employee>>(&cache_key).await {
        return Ok(Json(cached));
    }

    let result = state.storage.list_employees(company_id, &filter, page).await?;
    state.cache.set_json(&cache_key, &result).await;
    Ok(Json(result))
}

/// GET /api/v1/employees/{id} - fetch one employee.
///
/// Holders of VIEW_ALL_EMPLOYEE_PROFILES can read anyone; everyone else can
/// read only the record linked to their own account.
pub async fn detail(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<Employee>, AuthError> {
    let company_id = required_company(&ctx, scope.company_id)?;

    let cache_key = keys::employee_detail(id, company_id);
    let employee = match state.cache.get_json::<Employee>(&cache_key).await {
        Some(found) => found,
        None => {
            let found = state
                .storage
                .get_employee(id, company_id)
                .await?
                .ok_or_else(|| AuthError::not_found("Employee"))?;
            state.cache.set_json(&cache_key, &found).await;
            found
        }
    };

    if employee.user_id != Some(ctx.user_id) {
        ctx.require_any_permission(VIEW_ALL)?;
    }
    Ok(Json(employee))
}

/// PUT /api/v1/employees/{id} - partial update.
///
/// The company comes from the token: update bodies carry no `companyId`, so
/// a caller can only ever touch rows in their own tenant.
pub async fn update(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Json(update): Json<EmployeeUpdate>,
) -> Result<Json<Employee>, AuthError> {
    ctx.require_any_permission(MANAGE)?;
    if update.is_empty() {
        return Err(AuthError::invalid_request("No fields to update"));
    }

    let employee = state
        .storage
        .update_employee(id, ctx.company_id, &update)
        .await?;

    state
        .cache
        .invalidate(&keys::employee_detail(id, ctx.company_id))
        .await;
    state
        .cache
        .invalidate_prefix(&keys::employee_list_prefix(ctx.company_id))
        .await;
    state
        .cache
        .invalidate(&keys::employee_analytics(ctx.company_id))
        .await;

    tracing::info!(id = %id, company_id = %ctx.company_id, "updated employee");
    Ok(Json(employee))
}

/// DELETE /api/v1/employees/{id} - remove an employee record.
pub async fn delete(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<StatusCode, AuthError> {
    let company_id = required_company(&ctx, scope.company_id)?;
    ctx.require_any_permission(MANAGE)?;

    state.storage.delete_employee(id, company_id).await?;

    state
        .cache
        .invalidate(&keys::employee_detail(id, company_id))
        .await;
    state
        .cache
        .invalidate_prefix(&keys::employee_list_prefix(company_id))
        .await;
    state
        .cache
        .invalidate(&keys::employee_analytics(company_id))
        .await;

    tracing::info!(id = %id, company_id = %company_id, "deleted employee");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/employees/analytics - workforce counts for one company.
pub async fn analytics(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<EmployeeAnalytics>, AuthError> {
    let company_id = required_company(&ctx, scope.company_id)?;
    ctx.require_any_permission(ANALYTICS)?;

    let cache_key = keys::employee_analytics(company_id);
    if let Some(cached) = state.cache.get_json::<EmployeeAnalytics>(&cache_key).await {
        return Ok(Json(cached));
    }

    let result = state.storage.employee_analytics(company_id).await?;
    state.cache.set_json(&cache_key, &result).await;
    Ok(Json(result))
}
