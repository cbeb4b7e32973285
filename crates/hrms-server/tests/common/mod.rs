//! In-memory storage backend for the HTTP integration tests.
//!
//! Mirrors the PostgreSQL backend's observable behavior: company-scoped
//! lookups, uniqueness rules, partial-update semantics, and list ordering.
//! Everything lives in `DashMap`s so tests run without external services.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use hrms_core::{
    Company, Department, DepartmentFilter, DepartmentUpdate, Employee, EmployeeAnalytics,
    EmployeeFilter, EmployeeUpdate, LeaveRequest, LeaveRequestFilter, LeaveRequestUpdate,
    LeaveStatus, Page, PageQuery, Session, User,
};
use hrms_storage::{
    CompanyStorage, DepartmentStorage, EmployeeStorage, LeaveRequestStorage, SessionStorage,
    StorageError, UserStorage,
};

#[derive(Default)]
pub struct MemoryStorage {
    users: DashMap<Uuid, User>,
    sessions: DashMap<Uuid, Session>,
    companies: DashMap<Uuid, Company>,
    employees: DashMap<Uuid, Employee>,
    departments: DashMap<Uuid, Department>,
    leave_requests: DashMap<Uuid, LeaveRequest>,
}

impl MemoryStorage {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn user_email_taken(&self, email: &str, company_id: Uuid) -> bool {
        self.users
            .iter()
            .any(|u| u.value().email == email && u.value().company_id == company_id)
    }

    fn employee_taken(&self, employee: &Employee) -> bool {
        self.employees.iter().any(|e| {
            let e = e.value();
            e.company_id == employee.company_id
                && (e.email == employee.email || e.employee_number == employee.employee_number)
        })
    }
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn create_user_with_employee(
        &self,
        user: &User,
        employee: &Employee,
    ) -> Result<(), StorageError> {
        if self.user_email_taken(&user.email, user.company_id) {
            return Err(StorageError::already_exists(
                "User",
                format!("email {} in company", user.email),
            ));
        }
        if self.employee_taken(employee) {
            return Err(StorageError::already_exists(
                "Employee",
                format!("email {} in company", employee.email),
            ));
        }
        self.users.insert(user.id, user.clone());
        self.employees.insert(employee.id, employee.clone());
        Ok(())
    }

    async fn find_user_by_email(
        &self,
        email: &str,
        company_id: Uuid,
    ) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.value().email == email && u.value().company_id == company_id)
            .map(|u| u.value().clone()))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn upsert_session(&self, session: &Session) -> Result<(), StorageError> {
        self.sessions.insert(session.user_id, session.clone());
        Ok(())
    }

    async fn find_session_by_user(&self, user_id: Uuid) -> Result<Option<Session>, StorageError> {
        Ok(self.sessions.get(&user_id).map(|s| s.value().clone()))
    }

    async fn delete_session(&self, user_id: Uuid) -> Result<(), StorageError> {
        self.sessions.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl CompanyStorage for MemoryStorage {
    async fn register_company(
        &self,
        company: &Company,
        admin: &User,
        employee: &Employee,
    ) -> Result<(), StorageError> {
        if self
            .companies
            .iter()
            .any(|c| c.value().domain == company.domain)
        {
            return Err(StorageError::already_exists(
                "Company",
                format!("domain {}", company.domain),
            ));
        }
        if self.user_email_taken(&admin.email, admin.company_id) {
            return Err(StorageError::already_exists(
                "User",
                format!("email {} in company", admin.email),
            ));
        }
        self.companies.insert(company.id, company.clone());
        self.users.insert(admin.id, admin.clone());
        self.employees.insert(employee.id, employee.clone());
        Ok(())
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, StorageError> {
        Ok(self.companies.get(&id).map(|c| c.value().clone()))
    }

    async fn find_company_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Company>, StorageError> {
        Ok(self
            .companies
            .iter()
            .find(|c| c.value().domain == domain)
            .map(|c| c.value().clone()))
    }
}

#[async_trait]
impl EmployeeStorage for MemoryStorage {
    async fn create_employee(&self, employee: &Employee) -> Result<(), StorageError> {
        if self.employee_taken(employee) {
            return Err(StorageError::already_exists(
                "Employee",
                format!("email {} in company", employee.email),
            ));
        }
        self.employees.insert(employee.id, employee.clone());
        Ok(())
    }

    async fn get_employee(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, StorageError> {
        Ok(self
            .employees
            .get(&id)
            .map(|e| e.value().clone())
            .filter(|e| e.company_id == company_id))
    }

    async fn find_employee_by_user(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, StorageError> {
        Ok(self
            .employees
            .iter()
            .find(|e| {
                e.value().user_id == Some(user_id) && e.value().company_id == company_id
            })
            .map(|e| e.value().clone()))
    }

    async fn list_employees(
        &self,
        company_id: Uuid,
        filter: &EmployeeFilter,
        page: PageQuery,
    ) -> Result<Page<Employee>, StorageError> {
        let page = page.normalized();
        let mut items: Vec<Employee> = self
            .employees
            .iter()
            .map(|e| e.value().clone())
            .filter(|e| e.company_id == company_id)
            .filter(|e| filter.department_id.is_none_or(|d| e.department_id == Some(d)))
            .filter(|e| filter.manager_id.is_none_or(|m| e.manager_id == Some(m)))
            .filter(|e| {
                filter
                    .employment_status
                    .is_none_or(|s| e.employment_status == s)
            })
            .collect();
        // created_at DESC, id as tiebreaker for same-instant inserts
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = items.len() as u64;
        let items = paginate(items, page);
        Ok(Page::new(items, total, page))
    }

    async fn update_employee(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &EmployeeUpdate,
    ) -> Result<Employee, StorageError> {
        let mut entry = self
            .employees
            .get_mut(&id)
            .filter(|e| e.value().company_id == company_id)
            .ok_or_else(|| StorageError::not_found("Employee", id))?;

        let employee = entry.value_mut();
        if let Some(v) = &update.first_name {
            employee.first_name = v.clone();
        }
        if let Some(v) = &update.last_name {
            employee.last_name = v.clone();
        }
        if let Some(v) = &update.email {
            employee.email = v.clone();
        }
        if let Some(v) = update.department_id {
            employee.department_id = Some(v);
        }
        if let Some(v) = update.manager_id {
            employee.manager_id = Some(v);
        }
        if let Some(v) = update.employment_type {
            employee.employment_type = v;
        }
        if let Some(v) = update.employment_status {
            employee.employment_status = v;
        }
        employee.updated_at = OffsetDateTime::now_utc();
        Ok(employee.clone())
    }

    async fn delete_employee(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError> {
        self.employees
            .remove_if(&id, |_, e| e.company_id == company_id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Employee", id))
    }

    async fn employee_analytics(
        &self,
        company_id: Uuid,
    ) -> Result<EmployeeAnalytics, StorageError> {
        let mut total = 0u64;
        let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_department: BTreeMap<String, u64> = BTreeMap::new();

        for entry in self.employees.iter() {
            let employee = entry.value();
            if employee.company_id != company_id {
                continue;
            }
            total += 1;
            *by_status
                .entry(employee.employment_status.as_str().to_string())
                .or_insert(0) += 1;
            let department = employee
                .department_id
                .and_then(|id| self.departments.get(&id).map(|d| d.value().name.clone()))
                .unwrap_or_else(|| "unassigned".to_string());
            *by_department.entry(department).or_insert(0) += 1;
        }

        Ok(EmployeeAnalytics {
            total_employees: total,
            by_status,
            by_department,
        })
    }
}

#[async_trait]
impl DepartmentStorage for MemoryStorage {
    async fn create_department(&self, department: &Department) -> Result<(), StorageError> {
        if self.departments.iter().any(|d| {
            d.value().company_id == department.company_id && d.value().name == department.name
        }) {
            return Err(StorageError::already_exists(
                "Department",
                format!("name {} in company", department.name),
            ));
        }
        self.departments.insert(department.id, department.clone());
        Ok(())
    }

    async fn get_department(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Department>, StorageError> {
        Ok(self
            .departments
            .get(&id)
            .map(|d| d.value().clone())
            .filter(|d| d.company_id == company_id))
    }

    async fn list_departments(
        &self,
        company_id: Uuid,
        filter: &DepartmentFilter,
        page: PageQuery,
    ) -> Result<Page<Department>, StorageError> {
        let page = page.normalized();
        let mut items: Vec<Department> = self
            .departments
            .iter()
            .map(|d| d.value().clone())
            .filter(|d| d.company_id == company_id)
            .filter(|d| {
                filter
                    .parent_department_id
                    .is_none_or(|p| d.parent_department_id == Some(p))
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));

        let total = items.len() as u64;
        let items = paginate(items, page);
        Ok(Page::new(items, total, page))
    }

    async fn update_department(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &DepartmentUpdate,
    ) -> Result<Department, StorageError> {
        let mut entry = self
            .departments
            .get_mut(&id)
            .filter(|d| d.value().company_id == company_id)
            .ok_or_else(|| StorageError::not_found("Department", id))?;

        let department = entry.value_mut();
        if let Some(v) = &update.name {
            department.name = v.clone();
        }
        if let Some(v) = &update.description {
            department.description = Some(v.clone());
        }
        if let Some(v) = update.parent_department_id {
            department.parent_department_id = Some(v);
        }
        if let Some(v) = update.manager_id {
            department.manager_id = Some(v);
        }
        if let Some(v) = update.budget {
            department.budget = Some(v);
        }
        if let Some(v) = update.headcount_limit {
            department.headcount_limit = Some(v);
        }
        department.updated_at = OffsetDateTime::now_utc();
        Ok(department.clone())
    }

    async fn delete_department(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError> {
        self.departments
            .remove_if(&id, |_, d| d.company_id == company_id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Department", id))
    }
}

#[async_trait]
impl LeaveRequestStorage for MemoryStorage {
    async fn create_leave_request(&self, request: &LeaveRequest) -> Result<(), StorageError> {
        self.leave_requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn get_leave_request(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<LeaveRequest>, StorageError> {
        Ok(self
            .leave_requests
            .get(&id)
            .map(|r| r.value().clone())
            .filter(|r| r.company_id == company_id))
    }

    async fn list_leave_requests(
        &self,
        company_id: Uuid,
        filter: &LeaveRequestFilter,
        page: PageQuery,
    ) -> Result<Page<LeaveRequest>, StorageError> {
        let page = page.normalized();
        let mut items: Vec<LeaveRequest> = self
            .leave_requests
            .iter()
            .map(|r| r.value().clone())
            .filter(|r| r.company_id == company_id)
            .filter(|r| filter.employee_id.is_none_or(|e| r.employee_id == e))
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| filter.start_date_from.is_none_or(|d| r.start_date >= d))
            .filter(|r| filter.start_date_to.is_none_or(|d| r.start_date <= d))
            .collect();
        items.sort_by(|a, b| b.requested_at.cmp(&a.requested_at).then(b.id.cmp(&a.id)));

        let total = items.len() as u64;
        let items = paginate(items, page);
        Ok(Page::new(items, total, page))
    }

    async fn update_leave_request(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &LeaveRequestUpdate,
    ) -> Result<LeaveRequest, StorageError> {
        let mut entry = self
            .leave_requests
            .get_mut(&id)
            .filter(|r| r.value().company_id == company_id)
            .ok_or_else(|| StorageError::not_found("Leave request", id))?;

        let request = entry.value_mut();
        if let Some(v) = update.status {
            request.status = v;
        }
        if let Some(v) = update.approved_by_id {
            request.approved_by_id = Some(v);
        }
        if update.status == Some(LeaveStatus::Approved) {
            request.approved_at = Some(OffsetDateTime::now_utc());
        }
        if let Some(v) = &update.rejection_reason {
            request.rejection_reason = Some(v.clone());
        }
        if let Some(v) = &update.reason {
            request.reason = Some(v.clone());
        }
        if let Some(v) = update.start_date {
            request.start_date = v;
        }
        if let Some(v) = update.end_date {
            request.end_date = v;
        }
        if let Some(v) = update.total_days {
            request.total_days = v;
        }
        Ok(request.clone())
    }

    async fn delete_leave_request(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError> {
        self.leave_requests
            .remove_if(&id, |_, r| r.company_id == company_id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Leave request", id))
    }
}

fn paginate<T>(items: Vec<T>, page: PageQuery) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    items
        .into_iter()
        .skip(offset)
        .take(page.limit as usize)
        .collect()
}
