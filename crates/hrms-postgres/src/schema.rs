//! Schema bootstrap for the PostgreSQL storage backend.
//!
//! Creates the HRMS tables and indexes if they are missing. Every statement
//! is `IF NOT EXISTS`, so running the bootstrap against an existing database
//! is safe and leaves data untouched.

use sqlx_postgres::PgPool;
use tracing::{debug, info, instrument};

use crate::error::{PostgresError, Result};

/// DDL statements executed in order. Tables referenced by foreign keys come
/// before their referents; `departments.manager_id` stays a plain column
/// because departments and employees reference each other.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        domain TEXT NOT NULL UNIQUE,
        industry TEXT,
        company_size TEXT,
        subscription_plan TEXT NOT NULL DEFAULT 'free',
        billing_cycle TEXT NOT NULL DEFAULT 'monthly',
        max_employees INTEGER NOT NULL DEFAULT 25,
        max_storage_gb INTEGER NOT NULL DEFAULT 5,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        role TEXT NOT NULL,
        company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (email, company_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
        access_token TEXT NOT NULL,
        refresh_token TEXT NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL,
        device_info TEXT,
        ip_address TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        id UUID PRIMARY KEY,
        company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT,
        parent_department_id UUID REFERENCES departments(id) ON DELETE SET NULL,
        manager_id UUID,
        budget BIGINT,
        headcount_limit INTEGER,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (company_id, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id UUID PRIMARY KEY,
        company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        user_id UUID REFERENCES users(id) ON DELETE SET NULL,
        employee_number TEXT NOT NULL,
        email TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        department_id UUID REFERENCES departments(id) ON DELETE SET NULL,
        manager_id UUID REFERENCES employees(id) ON DELETE SET NULL,
        hire_date DATE NOT NULL,
        employment_type TEXT NOT NULL DEFAULT 'FULL_TIME',
        employment_status TEXT NOT NULL DEFAULT 'ACTIVE',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (company_id, employee_number),
        UNIQUE (company_id, email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id UUID PRIMARY KEY,
        company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
        leave_type TEXT NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        total_days DOUBLE PRECISION NOT NULL,
        reason TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        requested_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        approved_by_id UUID REFERENCES users(id) ON DELETE SET NULL,
        approved_at TIMESTAMPTZ,
        rejection_reason TEXT
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_users_company ON users (company_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_employees_company ON employees (company_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_employees_department ON employees (department_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_employees_manager ON employees (manager_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_employees_user ON employees (user_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_departments_company ON departments (company_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_leave_requests_company ON leave_requests (company_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_leave_requests_employee ON leave_requests (employee_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_leave_requests_status ON leave_requests (company_id, status)"#,
];

/// Ensures all HRMS tables and indexes exist.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx_core::query::query(statement)
            .execute(pool)
            .await
            .map_err(PostgresError::from)?;
        debug!(
            statement = statement.trim_start().lines().next().unwrap_or_default(),
            "Schema statement applied"
        );
    }

    info!("HRMS schema is in place");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_precede_their_foreign_keys() {
        let order: Vec<usize> = ["companies", "users", "sessions", "departments", "employees"]
            .iter()
            .map(|table| {
                SCHEMA_STATEMENTS
                    .iter()
                    .position(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")))
                    .unwrap_or_else(|| panic!("missing table {table}"))
            })
            .collect();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted, "tables must be created in dependency order");
    }

    #[test]
    fn test_uniqueness_constraints_present() {
        let users = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("CREATE TABLE IF NOT EXISTS users"))
            .unwrap();
        assert!(users.contains("UNIQUE (email, company_id)"));

        let companies = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("CREATE TABLE IF NOT EXISTS companies"))
            .unwrap();
        assert!(companies.contains("domain TEXT NOT NULL UNIQUE"));

        let employees = SCHEMA_STATEMENTS
            .iter()
            .find(|s| s.contains("CREATE TABLE IF NOT EXISTS employees"))
            .unwrap();
        assert!(employees.contains("UNIQUE (company_id, employee_number)"));
    }
}
