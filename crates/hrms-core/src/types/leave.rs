//! Leave request type and its status lifecycle.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Lifecycle state of a leave request. New requests always start `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }
}

/// A leave request row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: Uuid,
    pub company_id: Uuid,
    pub employee_id: Uuid,

    /// Free-form category (vacation, sick, parental, ...).
    pub leave_type: String,

    #[serde(with = "crate::time::iso_date")]
    pub start_date: Date,
    #[serde(with = "crate::time::iso_date")]
    pub end_date: Date,
    pub total_days: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub status: LeaveStatus,

    #[serde(with = "time::serde::rfc3339")]
    pub requested_at: OffsetDateTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by_id: Option<Uuid>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub approved_at: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Input for filing a leave request. Status and timestamps are assigned by
/// the service, not the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub leave_type: String,
    #[serde(with = "crate::time::iso_date")]
    pub start_date: Date,
    #[serde(with = "crate::time::iso_date")]
    pub end_date: Date,
    pub total_days: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

impl NewLeaveRequest {
    /// Materializes a pending request stamped with the current time.
    pub fn into_leave_request(self) -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4(),
            company_id: self.company_id,
            employee_id: self.employee_id,
            leave_type: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            total_days: self.total_days,
            reason: self.reason,
            status: LeaveStatus::Pending,
            requested_at: OffsetDateTime::now_utc(),
            approved_by_id: None,
            approved_at: None,
            rejection_reason: None,
        }
    }
}

/// Partial update; status transitions carry the approver metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestUpdate {
    #[serde(default)]
    pub status: Option<LeaveStatus>,
    #[serde(default)]
    pub approved_by_id: Option<Uuid>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, with = "crate::time::iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "crate::time::iso_date::option")]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub total_days: Option<f64>,
}

impl LeaveRequestUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.approved_by_id.is_none()
            && self.rejection_reason.is_none()
            && self.reason.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.total_days.is_none()
    }
}

/// List filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestFilter {
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<LeaveStatus>,
    #[serde(default, with = "crate::time::iso_date::option")]
    pub start_date_from: Option<Date>,
    #[serde(default, with = "crate::time::iso_date::option")]
    pub start_date_to: Option<Date>,
}
