//! Domain types shared across the workspace.
//!
//! Every entity is company-scoped: rows carry a `company_id` and the storage
//! and HTTP layers never cross that boundary. Serialized representations use
//! camelCase field names.

pub mod company;
pub mod department;
pub mod employee;
pub mod leave;
pub mod session;
pub mod user;

pub use company::{Company, NewCompany};
pub use department::{Department, DepartmentFilter, DepartmentUpdate, NewDepartment};
pub use employee::{
    Employee, EmployeeAnalytics, EmployeeFilter, EmployeeUpdate, EmploymentStatus, EmploymentType,
    NewEmployee,
};
pub use leave::{LeaveRequest, LeaveRequestFilter, LeaveRequestUpdate, LeaveStatus, NewLeaveRequest};
pub use session::Session;
pub use user::{NewUser, User, UserSummary};
