//! Department storage.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::row::Row;
use sqlx_postgres::PgRow;
use uuid::Uuid;

use hrms_core::{Department, DepartmentFilter, DepartmentUpdate, Page, PageQuery};
use hrms_storage::{DepartmentStorage, StorageError};

use crate::error::{PostgresError, db_error, unique_conflict};
use crate::storage::PostgresStorage;

fn department_from_row(row: &PgRow) -> Result<Department, PostgresError> {
    Ok(Department {
        id: row.try_get("id")?,
        company_id: row.try_get("company_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        parent_department_id: row.try_get("parent_department_id")?,
        manager_id: row.try_get("manager_id")?,
        budget: row.try_get("budget")?,
        headcount_limit: row.try_get("headcount_limit")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl DepartmentStorage for PostgresStorage {
    async fn create_department(&self, department: &Department) -> Result<(), StorageError> {
        query(
            r#"
            INSERT INTO departments (id, company_id, name, description,
                                     parent_department_id, manager_id, budget,
                                     headcount_limit, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(department.id)
        .bind(department.company_id)
        .bind(&department.name)
        .bind(department.description.as_deref())
        .bind(department.parent_department_id)
        .bind(department.manager_id)
        .bind(department.budget)
        .bind(department.headcount_limit)
        .bind(department.created_at)
        .bind(department.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| {
            unique_conflict(
                e,
                "Department",
                format!(
                    "name {} in company {}",
                    department.name, department.company_id
                ),
            )
        })?;

        Ok(())
    }

    async fn get_department(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Department>, StorageError> {
        let row = query(
            r#"
            SELECT id, company_id, name, description, parent_department_id,
                   manager_id, budget, headcount_limit, created_at, updated_at
            FROM departments
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
            .map(department_from_row)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn list_departments(
        &self,
        company_id: Uuid,
        filter: &DepartmentFilter,
        page: PageQuery,
    ) -> Result<Page<Department>, StorageError> {
        let page = page.normalized();

        let (total,): (i64,) = query_as(
            r#"
            SELECT COUNT(*)
            FROM departments
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR parent_department_id = $2)
            "#,
        )
        .bind(company_id)
        .bind(filter.parent_department_id)
        .fetch_one(self.pool())
        .await
        .map_err(db_error)?;

        let rows = query(
            r#"
            SELECT id, company_id, name, description, parent_department_id,
                   manager_id, budget, headcount_limit, created_at, updated_at
            FROM departments
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR parent_department_id = $2)
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(company_id)
        .bind(filter.parent_department_id)
        .bind(i64::from(page.limit))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await
        .map_err(db_error)?;

        let items = rows
            .iter()
            .map(department_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(Page::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            page,
        ))
    }

    async fn update_department(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &DepartmentUpdate,
    ) -> Result<Department, StorageError> {
        let row = query(
            r#"
            UPDATE departments
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                parent_department_id = COALESCE($5, parent_department_id),
                manager_id = COALESCE($6, manager_id),
                budget = COALESCE($7, budget),
                headcount_limit = COALESCE($8, headcount_limit),
                updated_at = NOW()
            WHERE id = $1
              AND company_id = $2
            RETURNING id, company_id, name, description, parent_department_id,
                      manager_id, budget, headcount_limit, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.parent_department_id)
        .bind(update.manager_id)
        .bind(update.budget)
        .bind(update.headcount_limit)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| unique_conflict(e, "Department", format!("name in company {company_id}")))?;

        match row {
            Some(row) => department_from_row(&row).map_err(StorageError::from),
            None => Err(StorageError::not_found("Department", id)),
        }
    }

    async fn delete_department(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError> {
        let result = query("DELETE FROM departments WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(self.pool())
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Department", id));
        }
        Ok(())
    }
}
