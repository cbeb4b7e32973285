//! Employee storage.
//!
//! All lookups are scoped by `company_id`; a row from another company is
//! indistinguishable from a missing row. List filters use null-coalescing
//! predicates, so one statement covers every filter combination.

use async_trait::async_trait;
use sqlx_core::error::Error as SqlxError;
use sqlx_core::executor::Executor;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::row::Row;
use sqlx_postgres::{PgRow, Postgres};
use uuid::Uuid;

use hrms_core::{Employee, EmployeeAnalytics, EmployeeFilter, EmployeeUpdate, Page, PageQuery};
use hrms_storage::{EmployeeStorage, StorageError};

use crate::error::{PostgresError, db_error, unique_conflict};
use crate::rows::decode_wire_enum;
use crate::storage::PostgresStorage;

pub(crate) fn employee_from_row(row: &PgRow) -> Result<Employee, PostgresError> {
    Ok(Employee {
        id: row.try_get("id")?,
        company_id: row.try_get("company_id")?,
        user_id: row.try_get("user_id")?,
        employee_number: row.try_get("employee_number")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        department_id: row.try_get("department_id")?,
        manager_id: row.try_get("manager_id")?,
        hire_date: row.try_get("hire_date")?,
        employment_type: decode_wire_enum(row.try_get("employment_type")?)?,
        employment_status: decode_wire_enum(row.try_get("employment_status")?)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Inserts an employee row. Also used by the registration transactions in
/// the user and company modules.
pub(crate) async fn insert_employee<'e, E>(
    executor: E,
    employee: &Employee,
) -> Result<(), SqlxError>
where
    E: Executor<'e, Database = Postgres>,
{
    query(
        r#"
        INSERT INTO employees (id, company_id, user_id, employee_number, email,
                               first_name, last_name, department_id, manager_id,
                               hire_date, employment_type, employment_status,
                               created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(employee.id)
    .bind(employee.company_id)
    .bind(employee.user_id)
    .bind(&employee.employee_number)
    .bind(&employee.email)
    .bind(&employee.first_name)
    .bind(&employee.last_name)
    .bind(employee.department_id)
    .bind(employee.manager_id)
    .bind(employee.hire_date)
    .bind(employee.employment_type.as_str())
    .bind(employee.employment_status.as_str())
    .bind(employee.created_at)
    .bind(employee.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl EmployeeStorage for PostgresStorage {
    async fn create_employee(&self, employee: &Employee) -> Result<(), StorageError> {
        insert_employee(self.pool(), employee).await.map_err(|e| {
            unique_conflict(
                e,
                "Employee",
                format!(
                    "employee number {} or email {} in company {}",
                    employee.employee_number, employee.email, employee.company_id
                ),
            )
        })
    }

    async fn get_employee(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, StorageError> {
        let row = query(
            r#"
            SELECT id, company_id, user_id, employee_number, email,
                   first_name, last_name, department_id, manager_id,
                   hire_date, employment_type, employment_status,
                   created_at, updated_at
            FROM employees
            WHERE id = $1
              AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(employee_from_row)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn find_employee_by_user(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Employee>, StorageError> {
        let row = query(
            r#"
            SELECT id, company_id, user_id, employee_number, email,
                   first_name, last_name, department_id, manager_id,
                   hire_date, employment_type, employment_status,
                   created_at, updated_at
            FROM employees
            WHERE user_id = $1
              AND company_id = $2
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(employee_from_row)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn list_employees(
        &self,
        company_id: Uuid,
        filter: &EmployeeFilter,
        page: PageQuery,
    ) -> Result<Page<Employee>, StorageError> {
        let page = page.normalized();
        let status = filter.employment_status.map(|s| s.as_str());

        let (total,): (i64,) = query_as(
            r#"
            SELECT COUNT(*)
            FROM employees
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR department_id = $2)
              AND ($3::uuid IS NULL OR manager_id = $3)
              AND ($4::text IS NULL OR employment_status = $4)
            "#,
        )
        .bind(company_id)
        .bind(filter.department_id)
        .bind(filter.manager_id)
        .bind(status)
        .fetch_one(self.pool())
        .await
        .map_err(db_error)?;

        let rows = query(
            r#"
            SELECT id, company_id, user_id, employee_number, email,
                   first_name, last_name, department_id, manager_id,
                   hire_date, employment_type, employment_status,
                   created_at, updated_at
            FROM employees
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR department_id = $2)
              AND ($3::uuid IS NULL OR manager_id = $3)
              AND ($4::text IS NULL OR employment_status = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(company_id)
        .bind(filter.department_id)
        .bind(filter.manager_id)
        .bind(status)
        .bind(i64::from(page.limit))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await
        .map_err(db_error)?;

        let items = rows
            .iter()
            .map(employee_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(Page::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            page,
        ))
    }

    async fn update_employee(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &EmployeeUpdate,
    ) -> Result<Employee, StorageError> {
        let employment_type = update.employment_type.map(|t| t.as_str());
        let employment_status = update.employment_status.map(|s| s.as_str());

        let row = query(
            r#"
            UPDATE employees
            SET first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                department_id = COALESCE($6, department_id),
                manager_id = COALESCE($7, manager_id),
                employment_type = COALESCE($8, employment_type),
                employment_status = COALESCE($9, employment_status),
                updated_at = NOW()
            WHERE id = $1
              AND company_id = $2
            RETURNING id, company_id, user_id, employee_number, email,
                      first_name, last_name, department_id, manager_id,
                      hire_date, employment_type, employment_status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.email.as_deref())
        .bind(update.department_id)
        .bind(update.manager_id)
        .bind(employment_type)
        .bind(employment_status)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| unique_conflict(e, "Employee", format!("email in company {company_id}")))?;

        match row {
            Some(row) => employee_from_row(&row).map_err(StorageError::from),
            None => Err(StorageError::not_found("Employee", id)),
        }
    }

    async fn delete_employee(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError> {
        let result = query("DELETE FROM employees WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(self.pool())
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Employee", id));
        }
        Ok(())
    }

    async fn employee_analytics(
        &self,
        company_id: Uuid,
    ) -> Result<EmployeeAnalytics, StorageError> {
        let (total,): (i64,) = query_as("SELECT COUNT(*) FROM employees WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(self.pool())
            .await
            .map_err(db_error)?;

        let status_rows: Vec<(String, i64)> = query_as(
            r#"
            SELECT employment_status, COUNT(*)
            FROM employees
            WHERE company_id = $1
            GROUP BY employment_status
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool())
        .await
        .map_err(db_error)?;

        // Employees without a department fall under "unassigned".
        let department_rows: Vec<(Option<String>, i64)> = query_as(
            r#"
            SELECT d.name, COUNT(*)
            FROM employees e
            LEFT JOIN departments d ON d.id = e.department_id
            WHERE e.company_id = $1
            GROUP BY d.name
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool())
        .await
        .map_err(db_error)?;

        let by_status = status_rows
            .into_iter()
            .map(|(status, count)| (status, u64::try_from(count).unwrap_or_default()))
            .collect();

        let by_department = department_rows
            .into_iter()
            .map(|(name, count)| {
                (
                    name.unwrap_or_else(|| "unassigned".to_string()),
                    u64::try_from(count).unwrap_or_default(),
                )
            })
            .collect();

        Ok(EmployeeAnalytics {
            total_employees: u64::try_from(total).unwrap_or_default(),
            by_status,
            by_department,
        })
    }
}
