//! Employee record and the analytics summary derived from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Employment contract kind. Wire values are SCREAMING_SNAKE_CASE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Intern,
}

/// Current standing of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    #[default]
    Active,
    OnLeave,
    Terminated,
    Resigned,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "ACTIVE",
            EmploymentStatus::OnLeave => "ON_LEAVE",
            EmploymentStatus::Terminated => "TERMINATED",
            EmploymentStatus::Resigned => "RESIGNED",
        }
    }
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "FULL_TIME",
            EmploymentType::PartTime => "PART_TIME",
            EmploymentType::Contract => "CONTRACT",
            EmploymentType::Intern => "INTERN",
        }
    }
}

/// An employee row. Created automatically alongside a `User` at
/// registration, or directly by an HR workflow (in which case `user_id`
/// may be absent until the person gets an account).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,

    /// Human-facing identifier, format `EMP-` followed by eight uppercase
    /// alphanumerics. Unique per company.
    pub employee_number: String,

    pub email: String,
    pub first_name: String,
    pub last_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<Uuid>,

    #[serde(with = "crate::time::iso_date")]
    pub hire_date: Date,
    pub employment_type: EmploymentType,
    pub employment_status: EmploymentStatus,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Input for creating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub company_id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(with = "crate::time::iso_date")]
    pub hire_date: Date,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub employment_status: EmploymentStatus,
}

impl NewEmployee {
    /// Materializes the full record: fresh id, generated employee number,
    /// and both timestamps set to now.
    pub fn into_employee(self) -> Employee {
        let now = OffsetDateTime::now_utc();
        Employee {
            id: Uuid::new_v4(),
            company_id: self.company_id,
            user_id: self.user_id,
            employee_number: generate_employee_number(),
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            department_id: self.department_id,
            manager_id: self.manager_id,
            hire_date: self.hire_date,
            employment_type: self.employment_type,
            employment_status: self.employment_status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `EMP-` followed by eight uppercase alphanumerics.
pub fn generate_employee_number() -> String {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();
    format!("EMP-{suffix}")
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
}

impl EmployeeUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.department_id.is_none()
            && self.manager_id.is_none()
            && self.employment_type.is_none()
            && self.employment_status.is_none()
    }
}

/// List filters. All optional; each narrows the company-scoped result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilter {
    #[serde(default)]
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
}

/// Aggregate counts for one company's workforce.
///
/// Maps are ordered so the serialized form is deterministic, which keeps
/// the cached JSON stable across rebuilds of the same data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAnalytics {
    pub total_employees: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_department: BTreeMap<String, u64>,
}
