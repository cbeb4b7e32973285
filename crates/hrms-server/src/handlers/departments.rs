//! Department CRUD handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use hrms_auth::AuthError;
use hrms_auth::middleware::BearerAuth;
use hrms_core::{Department, DepartmentFilter, DepartmentUpdate, NewDepartment, Page, Permission};

use crate::cache::keys;
use crate::state::AppState;

use super::{CompanyScope, page_query, required_company};

const MANAGE: &[Permission] = &[Permission::ManageOrgStructure];
const VIEW: &[Permission] = &[Permission::ViewUsers, Permission::ViewAllEmployeeProfiles];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentListParams {
    pub company_id: Option<Uuid>,
    pub parent_department_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// POST /api/v1/departments - create a department.
pub async fn create(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Json(input): Json<NewDepartment>,
) -> Result<(StatusCode, Json<Department>), AuthError> {
    ctx.ensure_company(input.company_id)?;
    ctx.require_any_permission(MANAGE)?;

    let department = input.into_department();
    state.storage.create_department(&department).await?;

    state
        .cache
        .invalidate_prefix(&keys::department_list_prefix(department.company_id))
        .await;

    tracing::info!(
        id = %department.id,
        name = %department.name,
        company_id = %department.company_id,
        "created department"
    );
    Ok((StatusCode::CREATED, Json(department)))
}

/// GET /api/v1/departments - list departments.
pub async fn list(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Query(params): Query<DepartmentListParams>,
) -> Result<Json<Page<Department>>, AuthError> {
    let company_id = required_company(&ctx, params.company_id)?;
    ctx.require_any_permission(VIEW)?;

    let filter = DepartmentFilter {
        parent_department_id: params.parent_department_id,
    };
    let page = page_query(params.page, params.limit);

    let cache_key = keys::department_list(company_id, &filter, &page);
    if let Some(cached) = state.cache.get_json::<Page<Department>>(&cache_key).await {
        return Ok(Json(cached));
    }

    let result = state
        .storage
        .list_departments(company_id, &filter, page)
        .await?;
    state.cache.set_json(&cache_key, &result).await;
    Ok(Json(result))
}

/// GET /api/v1/departments/{id} - fetch one department.
pub async fn detail(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<Department>, AuthError> {
    let company_id = required_company(&ctx, scope.company_id)?;
    ctx.require_any_permission(VIEW)?;

    let cache_key = keys::department_detail(id, company_id);
    if let Some(cached) = state.cache.get_json::<Department>(&cache_key).await {
        return Ok(Json(cached));
    }

    let department = state
        .storage
        .get_department(id, company_id)
        .await?
        .ok_or_else(|| AuthError::not_found("Department"))?;
    state.cache.set_json(&cache_key, &department).await;
    Ok(Json(department))
}

/// PUT /api/v1/departments/{id} - partial update, scoped to the token's
/// company.
pub async fn update(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Json(update): Json<DepartmentUpdate>,
) -> Result<Json<Department>, AuthError> {
    ctx.require_any_permission(MANAGE)?;
    if update.is_empty() {
        return Err(AuthError::invalid_request("No fields to update"));
    }

    let department = state
        .storage
        .update_department(id, ctx.company_id, &update)
        .await?;

    state
        .cache
        .invalidate(&keys::department_detail(id, ctx.company_id))
        .await;
    state
        .cache
        .invalidate_prefix(&keys::department_list_prefix(ctx.company_id))
        .await;

    tracing::info!(id = %id, company_id = %ctx.company_id, "updated department");
    Ok(Json(department))
}

/// DELETE /api/v1/departments/{id} - remove a department.
pub async fn delete(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<StatusCode, AuthError> {
    let company_id = required_company(&ctx, scope.company_id)?;
    ctx.require_any_permission(MANAGE)?;

    state.storage.delete_department(id, company_id).await?;

    state
        .cache
        .invalidate(&keys::department_detail(id, company_id))
        .await;
    state
        .cache
        .invalidate_prefix(&keys::department_list_prefix(company_id))
        .await;

    tracing::info!(id = %id, company_id = %company_id, "deleted department");
    Ok(StatusCode::NO_CONTENT)
}
