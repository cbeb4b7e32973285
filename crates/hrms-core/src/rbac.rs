//! Static role/permission model.
//!
//! Nine fixed roles map to sets drawn from a fixed permission enumeration.
//! The mapping is immutable at runtime: not persisted, not user-editable.
//! `super_admin` holds every permission and bypasses explicit checks at the
//! authorization layer. Roles outside the enumeration cannot be represented,
//! so deserializing a token with an unknown role string fails closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed role enumeration carried in the JWT `role` claim and the User row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    CompanyAdmin,
    Employee,
    Manager,
    Intern,
    Trainer,
    Auditor,
    Hr,
    PayrollManager,
}

/// Fixed permission enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Company administration
    ManageCompanySettings,
    ViewCompanyAnalytics,
    // User management
    ManageUsers,
    ViewUsers,
    // Employee profile management
    ManageEmployeeProfiles,
    ViewAllEmployeeProfiles,
    ViewOwnEmployeeProfile,
    // Department & position management
    ManageOrgStructure,
    // Time tracking
    ClockInOut,
    ManageTimeRecords,
    ViewAllTimeRecords,
    // Leave management
    RequestLeave,
    ManageLeaveRequests,
    ViewAllLeaveRequests,
    // Payroll management
    ProcessPayroll,
    ViewPayrollRecords,
    ViewOwnPayroll,
    // Performance reviews
    ManagePerformanceReviews,
    ConductPerformanceReview,
    ViewPerformanceReviews,
    ViewOwnPerformanceReview,
    // Training management
    ManageTrainingPrograms,
    EnrollInTraining,
    ViewAllTrainingProgress,
    ViewOwnTrainingProgress,
    // Audit and billing
    ManageAuditLogs,
    ViewAuditLogs,
    ViewCompanyBilling,
    ManageCompanyBilling,
    ViewAllCompaniesBillings,
    ViewSubscriptionDetails,
    ViewAllCompanies,
    AuditCompanies,
}

impl Permission {
    /// Every permission in the enumeration, in declaration order.
    pub const ALL: &'static [Permission] = &[
        Permission::ManageCompanySettings,
        Permission::ViewCompanyAnalytics,
        Permission::ManageUsers,
        Permission::ViewUsers,
        Permission::ManageEmployeeProfiles,
        Permission::ViewAllEmployeeProfiles,
        Permission::ViewOwnEmployeeProfile,
        Permission::ManageOrgStructure,
        Permission::ClockInOut,
        Permission::ManageTimeRecords,
        Permission::ViewAllTimeRecords,
        Permission::RequestLeave,
        Permission::ManageLeaveRequests,
        Permission::ViewAllLeaveRequests,
        Permission::ProcessPayroll,
        Permission::ViewPayrollRecords,
        Permission::ViewOwnPayroll,
        Permission::ManagePerformanceReviews,
        Permission::ConductPerformanceReview,
        Permission::ViewPerformanceReviews,
        Permission::ViewOwnPerformanceReview,
        Permission::ManageTrainingPrograms,
        Permission::EnrollInTraining,
        Permission::ViewAllTrainingProgress,
        Permission::ViewOwnTrainingProgress,
        Permission::ManageAuditLogs,
        Permission::ViewAuditLogs,
        Permission::ViewCompanyBilling,
        Permission::ManageCompanyBilling,
        Permission::ViewAllCompaniesBillings,
        Permission::ViewSubscriptionDetails,
        Permission::ViewAllCompanies,
        Permission::AuditCompanies,
    ];
}

const COMPANY_ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ManageCompanySettings,
    Permission::ViewCompanyAnalytics,
    Permission::ManageUsers,
    Permission::ViewUsers,
    Permission::ManageEmployeeProfiles,
    Permission::ViewAllEmployeeProfiles,
    Permission::ManageOrgStructure,
    Permission::ManageTimeRecords,
    Permission::ViewAllTimeRecords,
    Permission::ManageLeaveRequests,
    Permission::ViewAllLeaveRequests,
    Permission::ViewPayrollRecords,
    Permission::ManagePerformanceReviews,
    Permission::ConductPerformanceReview,
    Permission::ViewPerformanceReviews,
    Permission::ManageTrainingPrograms,
    Permission::EnrollInTraining,
    Permission::ViewAllTrainingProgress,
    Permission::ViewCompanyBilling,
    Permission::ManageCompanyBilling,
    Permission::ViewSubscriptionDetails,
    Permission::ViewAuditLogs,
];

const HR_PERMISSIONS: &[Permission] = &[
    Permission::ViewUsers,
    Permission::ManageUsers,
    Permission::ManageEmployeeProfiles,
    Permission::ViewAllEmployeeProfiles,
    Permission::ManageOrgStructure,
    Permission::ManageTimeRecords,
    Permission::ViewAllTimeRecords,
    Permission::ManageLeaveRequests,
    Permission::ViewAllLeaveRequests,
    Permission::ViewPayrollRecords,
    Permission::ManagePerformanceReviews,
    Permission::ConductPerformanceReview,
    Permission::ViewPerformanceReviews,
    Permission::ManageTrainingPrograms,
    Permission::ViewAllTrainingProgress,
    Permission::ViewOwnEmployeeProfile,
    Permission::ClockInOut,
    Permission::RequestLeave,
    Permission::ViewOwnPayroll,
    Permission::ViewOwnPerformanceReview,
    Permission::EnrollInTraining,
    Permission::ViewOwnTrainingProgress,
    Permission::ViewAuditLogs,
];

const MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnEmployeeProfile,
    Permission::ViewAllEmployeeProfiles,
    Permission::ClockInOut,
    Permission::RequestLeave,
    Permission::ViewOwnPayroll,
    Permission::ViewOwnPerformanceReview,
    Permission::EnrollInTraining,
    Permission::ViewOwnTrainingProgress,
    Permission::ManageTimeRecords,
    Permission::ViewAllTimeRecords,
    Permission::ManageLeaveRequests,
    Permission::ViewAllLeaveRequests,
    Permission::ConductPerformanceReview,
    Permission::ViewPerformanceReviews,
];

const PAYROLL_MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::ProcessPayroll,
    Permission::ViewPayrollRecords,
    Permission::ViewAllEmployeeProfiles,
    Permission::ViewAllTimeRecords,
    Permission::ViewAllLeaveRequests,
    Permission::ViewOwnEmployeeProfile,
    Permission::ClockInOut,
    Permission::RequestLeave,
    Permission::ViewOwnPayroll,
    Permission::ViewOwnPerformanceReview,
    Permission::EnrollInTraining,
    Permission::ViewOwnTrainingProgress,
    Permission::ViewAuditLogs,
];

const TRAINER_PERMISSIONS: &[Permission] = &[
    Permission::ManageTrainingPrograms,
    Permission::EnrollInTraining,
    Permission::ViewAllTrainingProgress,
    Permission::ViewAllEmployeeProfiles,
    Permission::ViewOwnEmployeeProfile,
    Permission::ClockInOut,
    Permission::RequestLeave,
    Permission::ViewOwnPayroll,
    Permission::ViewOwnPerformanceReview,
    Permission::ViewOwnTrainingProgress,
];

const AUDITOR_PERMISSIONS: &[Permission] = &[
    Permission::ViewAuditLogs,
    Permission::ManageAuditLogs,
    Permission::ViewAllCompaniesBillings,
    Permission::ViewAllCompanies,
    Permission::AuditCompanies,
    Permission::ViewAllEmployeeProfiles,
    Permission::ViewAllTimeRecords,
    Permission::ViewAllLeaveRequests,
    Permission::ViewPayrollRecords,
    Permission::ViewPerformanceReviews,
    Permission::ViewAllTrainingProgress,
];

const EMPLOYEE_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnEmployeeProfile,
    Permission::ClockInOut,
    Permission::RequestLeave,
    Permission::ViewOwnPayroll,
    Permission::ViewOwnPerformanceReview,
    Permission::EnrollInTraining,
    Permission::ViewOwnTrainingProgress,
];

const INTERN_PERMISSIONS: &[Permission] = &[
    Permission::ViewOwnEmployeeProfile,
    Permission::ClockInOut,
    Permission::RequestLeave,
    Permission::ViewOwnPayroll,
    Permission::ViewOwnPerformanceReview,
    Permission::EnrollInTraining,
    Permission::ViewOwnTrainingProgress,
];

impl Role {
    /// Every role in the enumeration.
    pub const ALL: &'static [Role] = &[
        Role::SuperAdmin,
        Role::CompanyAdmin,
        Role::Employee,
        Role::Manager,
        Role::Intern,
        Role::Trainer,
        Role::Auditor,
        Role::Hr,
        Role::PayrollManager,
    ];

    /// The wire/database representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::CompanyAdmin => "company_admin",
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Intern => "intern",
            Role::Trainer => "trainer",
            Role::Auditor => "auditor",
            Role::Hr => "hr",
            Role::PayrollManager => "payroll_manager",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// The static permission set granted by this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::SuperAdmin => Permission::ALL,
            Role::CompanyAdmin => COMPANY_ADMIN_PERMISSIONS,
            Role::Hr => HR_PERMISSIONS,
            Role::Manager => MANAGER_PERMISSIONS,
            Role::PayrollManager => PAYROLL_MANAGER_PERMISSIONS,
            Role::Trainer => TRAINER_PERMISSIONS,
            Role::Auditor => AUDITOR_PERMISSIONS,
            Role::Employee => EMPLOYEE_PERMISSIONS,
            Role::Intern => INTERN_PERMISSIONS,
        }
    }

    /// Set-membership lookup against the static matrix.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// OR-semantics: true when the role holds at least one of `required`.
    pub fn has_any_permission(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.has_permission(*p))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "company_admin" => Ok(Role::CompanyAdmin),
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "intern" => Ok(Role::Intern),
            "trainer" => Ok(Role::Trainer),
            "auditor" => Ok(Role::Auditor),
            "hr" => Ok(Role::Hr),
            "payroll_manager" => Ok(Role::PayrollManager),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A role string outside the fixed enumeration. Callers treat this as a
/// fail-closed authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageCompanySettings => "manage_company_settings",
            Permission::ViewCompanyAnalytics => "view_company_analytics",
            Permission::ManageUsers => "manage_users",
            Permission::ViewUsers => "view_users",
            Permission::ManageEmployeeProfiles => "manage_employee_profiles",
            Permission::ViewAllEmployeeProfiles => "view_all_employee_profiles",
            Permission::ViewOwnEmployeeProfile => "view_own_employee_profile",
            Permission::ManageOrgStructure => "manage_org_structure",
            Permission::ClockInOut => "clock_in_out",
            Permission::ManageTimeRecords => "manage_time_records",
            Permission::ViewAllTimeRecords => "view_all_time_records",
            Permission::RequestLeave => "request_leave",
            Permission::ManageLeaveRequests => "manage_leave_requests",
            Permission::ViewAllLeaveRequests => "view_all_leave_requests",
            Permission::ProcessPayroll => "process_payroll",
            Permission::ViewPayrollRecords => "view_payroll_records",
            Permission::ViewOwnPayroll => "view_own_payroll",
            Permission::ManagePerformanceReviews => "manage_performance_reviews",
            Permission::ConductPerformanceReview => "conduct_performance_review",
            Permission::ViewPerformanceReviews => "view_performance_reviews",
            Permission::ViewOwnPerformanceReview => "view_own_performance_review",
            Permission::ManageTrainingPrograms => "manage_training_programs",
            Permission::EnrollInTraining => "enroll_in_training",
            Permission::ViewAllTrainingProgress => "view_all_training_progress",
            Permission::ViewOwnTrainingProgress => "view_own_training_progress",
            Permission::ManageAuditLogs => "manage_audit_logs",
            Permission::ViewAuditLogs => "view_audit_logs",
            Permission::ViewCompanyBilling => "view_company_billing",
            Permission::ManageCompanyBilling => "manage_company_billing",
            Permission::ViewAllCompaniesBillings => "view_all_companies_billings",
            Permission::ViewSubscriptionDetails => "view_subscription_details",
            Permission::ViewAllCompanies => "view_all_companies",
            Permission::AuditCompanies => "audit_companies",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_holds_every_permission() {
        for permission in Permission::ALL {
            assert!(
                Role::SuperAdmin.has_permission(*permission),
                "super_admin missing {permission}"
            );
        }
    }

    #[test]
    fn test_matrix_membership() {
        assert!(Role::CompanyAdmin.has_permission(Permission::ManageCompanySettings));
        assert!(Role::CompanyAdmin.has_permission(Permission::ViewAuditLogs));
        assert!(!Role::CompanyAdmin.has_permission(Permission::ProcessPayroll));
        assert!(!Role::CompanyAdmin.has_permission(Permission::ViewAllCompanies));

        assert!(Role::Hr.has_permission(Permission::ManageEmployeeProfiles));
        assert!(!Role::Hr.has_permission(Permission::ProcessPayroll));

        assert!(Role::PayrollManager.has_permission(Permission::ProcessPayroll));
        assert!(!Role::PayrollManager.has_permission(Permission::ManageUsers));

        assert!(Role::Auditor.has_permission(Permission::AuditCompanies));
        assert!(!Role::Auditor.has_permission(Permission::RequestLeave));

        assert!(Role::Employee.has_permission(Permission::RequestLeave));
        assert!(!Role::Employee.has_permission(Permission::ManageLeaveRequests));
    }

    #[test]
    fn test_intern_matches_employee_grants() {
        assert_eq!(Role::Intern.permissions(), Role::Employee.permissions());
    }

    #[test]
    fn test_or_semantics() {
        // Employee holds request_leave but not manage_leave_requests: any-of
        // must succeed when at least one required permission is held.
        let required = [Permission::ManageLeaveRequests, Permission::RequestLeave];
        assert!(Role::Employee.has_any_permission(&required));
        assert!(!Role::Employee.has_any_permission(&[Permission::ManageLeaveRequests]));
        assert!(!Role::Employee.has_any_permission(&[]));
    }

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, *role);
        }
        assert!("payroll_admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_representation() {
        let json = serde_json::to_string(&Role::PayrollManager).unwrap();
        assert_eq!(json, "\"payroll_manager\"");
        let role: Role = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(role, Role::SuperAdmin);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_permission_serde_representation() {
        let json = serde_json::to_string(&Permission::ClockInOut).unwrap();
        assert_eq!(json, "\"clock_in_out\"");
        let permission: Permission =
            serde_json::from_str("\"view_all_companies_billings\"").unwrap();
        assert_eq!(permission, Permission::ViewAllCompaniesBillings);
    }

    #[test]
    fn test_permission_as_str_matches_serde() {
        for permission in Permission::ALL {
            let json = serde_json::to_string(permission).unwrap();
            assert_eq!(json, format!("\"{}\"", permission.as_str()));
        }
    }
}
