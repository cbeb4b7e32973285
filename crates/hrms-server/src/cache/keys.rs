//! Deterministic cache key builders.
//!
//! Every key is company-scoped. Detail keys are `entity:<id>:<companyId>`;
//! list keys join the filter values in a fixed order (absent filters become
//! the sentinel `all`) and end with `page{p}:limit{l}` so each page caches
//! independently. Write paths invalidate a company's whole list keyspace via
//! the `*_prefix` builders.

use hrms_core::{DepartmentFilter, EmployeeFilter, LeaveRequestFilter, PageQuery};
use uuid::Uuid;

fn or_all<T: ToString>(value: Option<&T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "all".into())
}

pub fn employee_detail(id: Uuid, company_id: Uuid) -> String {
    format!("employee:{id}:{company_id}")
}

pub fn employee_list(company_id: Uuid, filter: &EmployeeFilter, query: &PageQuery) -> String {
    let page = query.normalized();
    format!(
        "employees:{company_id}:{}:{}:{}:page{}:limit{}",
        or_all(filter.department_id.as_ref()),
        or_all(filter.manager_id.as_ref()),
        or_all(filter.employment_status.map(|s| s.as_str()).as_ref()),
        page.page,
        page.limit,
    )
}

pub fn employee_list_prefix(company_id: Uuid) -> String {
    format!("employees:{company_id}:")
}

pub fn employee_analytics(company_id: Uuid) -> String {
    format!("employee_analytics:{company_id}")
}

pub fn department_detail(id: Uuid, company_id: Uuid) -> String {
    format!("department:{id}:{company_id}")
}

pub fn department_list(company_id: Uuid, filter: &DepartmentFilter, query: &PageQuery) -> String {
    let page = query.normalized();
    format!(
        "departments:{company_id}:{}:page{}:limit{}",
        or_all(filter.parent_department_id.as_ref()),
        page.page,
        page.limit,
    )
}

pub fn department_list_prefix(company_id: Uuid) -> String {
    format!("departments:{company_id}:")
}

pub fn leave_request_detail(id: Uuid, company_id: Uuid) -> String {
    format!("leave_request:{id}:{company_id}")
}

pub fn leave_request_list(
    company_id: Uuid,
    filter: &LeaveRequestFilter,
    query: &PageQuery,
) -> String {
    let page = query.normalized();
    format!(
        "leave_requests:{company_id}:{}:{}:{}:{}:page{}:limit{}",
        or_all(filter.employee_id.as_ref()),
        or_all(filter.status.map(|s| s.as_str()).as_ref()),
        or_all(filter.start_date_from.as_ref()),
        or_all(filter.start_date_to.as_ref()),
        page.page,
        page.limit,
    )
}

pub fn leave_request_list_prefix(company_id: Uuid) -> String {
    format!("leave_requests:{company_id}:")
}

pub fn refresh_token(user_id: Uuid) -> String {
    format!("refresh_token:{user_id}")
}

pub fn rate_limit(user_id: Uuid, route: &str) -> String {
    format!("rate_limit:{user_id}:{route}")
}
