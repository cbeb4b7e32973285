pub mod error;
pub mod pagination;
pub mod rbac;
pub mod time;
pub mod types;

pub use error::{CoreError, ErrorCategory, Result};
pub use pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, PageQuery};
pub use rbac::{Permission, Role, UnknownRole};
pub use types::company::{Company, NewCompany};
pub use types::department::{Department, DepartmentFilter, DepartmentUpdate, NewDepartment};
pub use types::employee::{
    Employee, EmployeeAnalytics, EmployeeFilter, EmployeeUpdate, EmploymentStatus, EmploymentType,
    NewEmployee, generate_employee_number,
};
pub use types::leave::{
    LeaveRequest, LeaveRequestFilter, LeaveRequestUpdate, LeaveStatus, NewLeaveRequest,
};
pub use types::session::Session;
pub use types::user::{NewUser, User, UserSummary};
