//! Company (tenant) storage.
//!
//! Company registration is the one cross-entity write: the company, its
//! first admin user, and the admin's employee record land in a single
//! transaction so a half-registered tenant can never exist.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_postgres::PgRow;
use uuid::Uuid;

use hrms_core::{Company, Employee, User};
use hrms_storage::{CompanyStorage, StorageError};

use crate::error::{PostgresError, db_error, unique_conflict};
use crate::storage::PostgresStorage;

fn company_from_row(row: &PgRow) -> Result<Company, PostgresError> {
    Ok(Company {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        domain: row.try_get("domain")?,
        industry: row.try_get("industry")?,
        company_size: row.try_get("company_size")?,
        subscription_plan: row.try_get("subscription_plan")?,
        billing_cycle: row.try_get("billing_cycle")?,
        max_employees: row.try_get("max_employees")?,
        max_storage_gb: row.try_get("max_storage_gb")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl CompanyStorage for PostgresStorage {
    async fn register_company(
        &self,
        company: &Company,
        admin: &User,
        employee: &Employee,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(db_error)?;

        query(
            r#"
            INSERT INTO companies (id, name, domain, industry, company_size,
                                   subscription_plan, billing_cycle,
                                   max_employees, max_storage_gb, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.domain)
        .bind(company.industry.as_deref())
        .bind(company.company_size.as_deref())
        .bind(&company.subscription_plan)
        .bind(&company.billing_cycle)
        .bind(company.max_employees)
        .bind(company.max_storage_gb)
        .bind(company.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| unique_conflict(e, "Company", format!("domain {}", company.domain)))?;

        crate::user::insert_user(&mut *tx, admin).await.map_err(|e| {
            unique_conflict(
                e,
                "User",
                format!("email {} in company {}", admin.email, admin.company_id),
            )
        })?;

        crate::employee::insert_employee(&mut *tx, employee)
            .await
            .map_err(|e| {
                unique_conflict(
                    e,
                    "Employee",
                    format!("employee number {}", employee.employee_number),
                )
            })?;

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, StorageError> {
        let row = query(
            r#"
            SELECT id, name, domain, industry, company_size,
                   subscription_plan, billing_cycle,
                   max_employees, max_storage_gb, created_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(company_from_row)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn find_company_by_domain(&self, domain: &str) -> Result<Option<Company>, StorageError> {
        let row = query(
            r#"
            SELECT id, name, domain, industry, company_size,
                   subscription_plan, billing_cycle,
                   max_employees, max_storage_gb, created_at
            FROM companies
            WHERE domain = $1
            "#,
        )
        .bind(domain)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(company_from_row)
            .transpose()
            .map_err(StorageError::from)
    }
}
