//! Leave request handlers, including the approve/reject transitions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use hrms_auth::AuthError;
use hrms_auth::middleware::BearerAuth;
use hrms_core::{
    LeaveRequest, LeaveRequestFilter, LeaveRequestUpdate, LeaveStatus, NewLeaveRequest, Page,
    Permission,
};

use crate::cache::keys;
use crate::state::AppState;

use super::{CompanyScope, page_query, required_company};

const REQUEST: &[Permission] = &[Permission::RequestLeave];
const MANAGE: &[Permission] = &[Permission::ManageLeaveRequests];
const VIEW: &[Permission] = &[Permission::ViewAllLeaveRequests, Permission::ManageLeaveRequests];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveListParams {
    pub company_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub status: Option<LeaveStatus>,
    #[serde(default, with = "hrms_core::time::iso_date::option")]
    pub start_date_from: Option<Date>,
    #[serde(default, with = "hrms_core::time::iso_date::option")]
    pub start_date_to: Option<Date>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// POST /api/v1/leave-requests - file a leave request.
///
/// New requests always enter `pending`; approval state is reachable only
/// through update by a holder of MANAGE_LEAVE_REQUESTS.
pub async fn create(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Json(input): Json<NewLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveRequest>), AuthError> {
    ctx.ensure_company(input.company_id)?;
    ctx.require_any_permission(REQUEST)?;

    if input.end_date < input.start_date {
        return Err(AuthError::invalid_request(
            "endDate must not precede startDate",
        ));
    }
    if input.total_days <= 0.0 {
        return Err(AuthError::invalid_request("totalDays must be positive"));
    }

    let request = input.into_leave_request();
    state.storage.create_leave_request(&request).await?;

    state
        .cache
        .invalidate_prefix(&keys::leave_request_list_prefix(request.company_id))
        .await;

    tracing::info!(
        id = %request.id,
        employee_id = %request.employee_id,
        leave_type = %request.leave_type,
        "created leave request"
    );
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/v1/leave-requests - list leave requests with optional filters.
pub async fn list(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Query(params): Query<LeaveListParams>,
) -> Result<Json<Page<LeaveRequest>>, AuthError> {
    let company_id = required_company(&ctx, params.company_id)?;
    ctx.require_any_permission(VIEW)?;

    let filter = LeaveRequestFilter {
        employee_id: params.employee_id,
        status: params.status,
        start_date_from: params.start_date_from,
        start_date_to: params.start_date_to,
    };
    let page = page_query(params.page, params.limit);

    let cache_key = keys::leave_request_list(company_id, &filter, &page);
    if let Some(cached) = state
        .cache
        .get_json::<Page<LeaveRequest>>(&cache_key)
        .await
    {
        return Ok(Json(cached));
    }

    let result = state
        .storage
        .list_leave_requests(company_id, &filter, page)
        .await?;
    state.cache.set_json(&cache_key, &result).await;
    Ok(Json(result))
}

/// GET /api/v1/leave-requests/{id} - fetch one leave request.
pub async fn detail(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<Json<LeaveRequest>, AuthError> {
    let company_id = required_company(&ctx, scope.company_id)?;
    ctx.require_any_permission(VIEW)?;

    let cache_key = keys::leave_request_detail(id, company_id);
    if let Some(cached) = state.cache.get_json::<LeaveRequest>(&cache_key).await {
        return Ok(Json(cached));
    }

    let request = state
        .storage
        .get_leave_request(id, company_id)
        .await?
        .ok_or_else(|| AuthError::not_found("Leave request"))?;
    state.cache.set_json(&cache_key, &request).await;
    Ok(Json(request))
}

/// PUT /api/v1/leave-requests/{id} - partial update and status transitions.
///
/// An approval stamps the caller as approver unless the body already names
/// one; `approvedAt` is assigned by storage in the same write.
pub async fn update(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Json(mut update): Json<LeaveRequestUpdate>,
) -> Result<Json<LeaveRequest>, AuthError> {
    ctx.require_any_permission(MANAGE)?;
    if update.is_empty() {
        return Err(AuthError::invalid_request("No fields to update"));
    }

    if update.status == Some(LeaveStatus::Approved) && update.approved_by_id.is_none() {
        update.approved_by_id = Some(ctx.user_id);
    }

    let request = state
        .storage
        .update_leave_request(id, ctx.company_id, &update)
        .await?;

    state
        .cache
        .invalidate(&keys::leave_request_detail(id, ctx.company_id))
        .await;
    state
        .cache
        .invalidate_prefix(&keys::leave_request_list_prefix(ctx.company_id))
        .await;

    tracing::info!(
        id = %id,
        status = ?update.status,
        company_id = %ctx.company_id,
        "updated leave request"
    );
    Ok(Json(request))
}

/// DELETE /api/v1/leave-requests/{id} - remove a leave request.
pub async fn delete(
    State(state): State<AppState>,
    BearerAuth(ctx): BearerAuth,
    Path(id): Path<Uuid>,
    Query(scope): Query<CompanyScope>,
) -> Result<StatusCode, AuthError> {
    let company_id = required_company(&ctx, scope.company_id)?;
    ctx.require_any_permission(MANAGE)?;

    state.storage.delete_leave_request(id, company_id).await?;

    state
        .cache
        .invalidate(&keys::leave_request_detail(id, company_id))
        .await;
    state
        .cache
        .invalidate_prefix(&keys::leave_request_list_prefix(company_id))
        .await;

    tracing::info!(id = %id, company_id = %company_id, "deleted leave request");
    Ok(StatusCode::NO_CONTENT)
}
