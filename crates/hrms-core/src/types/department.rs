//! Department type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// An organizational unit within one company. Departments may nest via
/// `parent_department_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<Uuid>,

    /// Annual budget in minor currency units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headcount_limit: Option<i32>,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Input for creating a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub company_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_department_id: Option<Uuid>,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub headcount_limit: Option<i32>,
}

impl NewDepartment {
    /// Materializes the full record: fresh id, both timestamps set to now.
    pub fn into_department(self) -> Department {
        let now = OffsetDateTime::now_utc();
        Department {
            id: Uuid::new_v4(),
            company_id: self.company_id,
            name: self.name,
            description: self.description,
            parent_department_id: self.parent_department_id,
            manager_id: self.manager_id,
            budget: self.budget,
            headcount_limit: self.headcount_limit,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_department_id: Option<Uuid>,
    #[serde(default)]
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub budget: Option<i64>,
    #[serde(default)]
    pub headcount_limit: Option<i32>,
}

impl DepartmentUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.parent_department_id.is_none()
            && self.manager_id.is_none()
            && self.budget.is_none()
            && self.headcount_limit.is_none()
    }
}

/// List filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentFilter {
    #[serde(default)]
    pub parent_department_id: Option<Uuid>,
}
