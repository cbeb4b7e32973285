//! Storage traits for the HRMS storage abstraction layer.
//!
//! This module defines the per-entity contracts that storage backends must
//! implement. All traits are company-scoped where the entity is: lookups
//! take the caller's `company_id` and implementations must never return
//! rows from another company.

use async_trait::async_trait;
use uuid::Uuid;

use hrms_core::{
    Company, Department, DepartmentFilter, DepartmentUpdate, Employee, EmployeeAnalytics,
    EmployeeFilter, EmployeeUpdate, LeaveRequest, LeaveRequestFilter, LeaveRequestUpdate, Page,
    PageQuery, Session, User,
};

use crate::error::StorageError;

/// Storage trait for user accounts.
///
/// Uniqueness is on `(email, company_id)`: creating a second account with
/// the same email in the same company fails `AlreadyExists`, while the same
/// email in a different company is a distinct account.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Persists a user together with their derived employee record in a
    /// single transaction. Either both rows exist afterwards or neither.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if `(email, company_id)` is
    /// taken for either row.
    async fn create_user_with_employee(
        &self,
        user: &User,
        employee: &Employee,
    ) -> Result<(), StorageError>;

    /// Looks up a user by email within one company.
    ///
    /// Returns `None` if no such account exists in that company, even when
    /// the email exists under a different company.
    async fn find_user_by_email(
        &self,
        email: &str,
        company_id: Uuid,
    ) -> Result<Option<User>, StorageError>;

    /// Looks up a user by primary key.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError>;
}

/// Storage trait for durable sessions (one row per user).
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Inserts or replaces the session row for `session.user_id`.
    ///
    /// Login and refresh both funnel through this method, so the row always
    /// reflects the most recently issued token pair.
    async fn upsert_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Fetches the current session row for a user, if any.
    async fn find_session_by_user(&self, user_id: Uuid) -> Result<Option<Session>, StorageError>;

    /// Deletes the session row for a user.
    ///
    /// Idempotent: deleting an absent row is not an error.
    async fn delete_session(&self, user_id: Uuid) -> Result<(), StorageError>;
}

/// Storage trait for companies (tenants).
#[async_trait]
pub trait CompanyStorage: Send + Sync {
    /// Persists a company together with its first admin user and that
    /// user's employee record, all in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the company domain or the
    /// admin `(email, company_id)` pair is taken.
    async fn register_company(
        &self,
        company: &Company,
        admin: &User,
        employee: &Employee,
    ) -> Result<(), StorageError>;

    /// Looks up a company by primary key.
    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, StorageError>;

    /// Looks up a company by its unique domain.
    async fn find_company_by_domain(&self, domain: &str)
    -> Result<Option<Company>, StorageError>;
}

/// Storage trait for employee records.
#[async_trait]
pub trait EmployeeStorage: Send + Sync {
    /// Persists a new employee.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the employee number or the
    /// `(email, company_id)` pair is taken.
    async fn create_employee(&self, employee: &Employee) -> Result<(), StorageError>;

    /// Fetches one employee within the caller's company.
    async fn get_employee(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, StorageError>;

    /// Fetches the employee record linked to a user account, if one exists.
    async fn find_employee_by_user(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, StorageError>;

    /// Lists employees in one company, narrowed by `filter`, ordered by
    /// creation time descending.
    async fn list_employees(
        &self,
        company_id: Uuid,
        filter: &EmployeeFilter,
        page: PageQuery,
    ) -> Result<Page<Employee>, StorageError>;

    /// Applies a partial update and returns the updated row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the employee does not exist in
    /// that company.
    async fn update_employee(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &EmployeeUpdate,
    ) -> Result<Employee, StorageError>;

    /// Deletes an employee.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the employee does not exist in
    /// that company.
    async fn delete_employee(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError>;

    /// Aggregates workforce counts for one company: total headcount plus
    /// breakdowns by employment status and by department.
    async fn employee_analytics(
        &self,
        company_id: Uuid,
    ) -> Result<EmployeeAnalytics, StorageError>;
}

/// Storage trait for departments.
#[async_trait]
pub trait DepartmentStorage: Send + Sync {
    /// Persists a new department.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the `(name, company_id)`
    /// pair is taken.
    async fn create_department(&self, department: &Department) -> Result<(), StorageError>;

    /// Fetches one department within the caller's company.
    async fn get_department(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Department>, StorageError>;

    /// Lists departments in one company, narrowed by `filter`, ordered by
    /// name ascending.
    async fn list_departments(
        &self,
        company_id: Uuid,
        filter: &DepartmentFilter,
        page: PageQuery,
    ) -> Result<Page<Department>, StorageError>;

    /// Applies a partial update and returns the updated row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the department does not exist in
    /// that company.
    async fn update_department(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &DepartmentUpdate,
    ) -> Result<Department, StorageError>;

    /// Deletes a department.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the department does not exist in
    /// that company.
    async fn delete_department(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError>;
}

/// Storage trait for leave requests.
#[async_trait]
pub trait LeaveRequestStorage: Send + Sync {
    /// Persists a new leave request.
    async fn create_leave_request(&self, request: &LeaveRequest) -> Result<(), StorageError>;

    /// Fetches one leave request within the caller's company.
    async fn get_leave_request(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<LeaveRequest>, StorageError>;

    /// Lists leave requests in one company, narrowed by `filter`, ordered
    /// by request time descending.
    async fn list_leave_requests(
        &self,
        company_id: Uuid,
        filter: &LeaveRequestFilter,
        page: PageQuery,
    ) -> Result<Page<LeaveRequest>, StorageError>;

    /// Applies a partial update (including status transitions) and returns
    /// the updated row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the request does not exist in
    /// that company.
    async fn update_leave_request(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &LeaveRequestUpdate,
    ) -> Result<LeaveRequest, StorageError>;

    /// Deletes a leave request.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the request does not exist in
    /// that company.
    async fn delete_leave_request(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError>;
}

/// Composite trait for backends that implement the full HRMS data model.
///
/// Blanket-implemented so any type implementing all entity traits can be
/// carried behind one `Arc<dyn HrmsStorage>`.
pub trait HrmsStorage:
    UserStorage
    + SessionStorage
    + CompanyStorage
    + EmployeeStorage
    + DepartmentStorage
    + LeaveRequestStorage
{
}

impl<T> HrmsStorage for T where
    T: UserStorage
        + SessionStorage
        + CompanyStorage
        + EmployeeStorage
        + DepartmentStorage
        + LeaveRequestStorage
{
}
