//! User account storage.
//!
//! Users are unique on `(email, company_id)`; the same address in two
//! companies is two independent accounts. Registration writes the user and
//! their employee record in one transaction.

use async_trait::async_trait;
use sqlx_core::error::Error as SqlxError;
use sqlx_core::executor::Executor;
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_postgres::{PgRow, Postgres};
use uuid::Uuid;

use hrms_core::{Employee, User};
use hrms_storage::{StorageError, UserStorage};

use crate::error::{PostgresError, db_error, unique_conflict};
use crate::rows::decode_wire_enum;
use crate::storage::PostgresStorage;

pub(crate) fn user_from_row(row: &PgRow) -> Result<User, PostgresError> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        role: decode_wire_enum(row.try_get("role")?)?,
        company_id: row.try_get("company_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Inserts a user row. Shared between registration and company bootstrap,
/// which both run it inside a transaction.
pub(crate) async fn insert_user<'e, E>(executor: E, user: &User) -> Result<(), SqlxError>
where
    E: Executor<'e, Database = Postgres>,
{
    query(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name,
                           role, company_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.role.as_str())
    .bind(user.company_id)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl UserStorage for PostgresStorage {
    async fn create_user_with_employee(
        &self,
        user: &User,
        employee: &Employee,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(db_error)?;

        insert_user(&mut *tx, user).await.map_err(|e| {
            unique_conflict(
                e,
                "User",
                format!("email {} in company {}", user.email, user.company_id),
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

    async fn find_user_by_email(
        &self,
        email: &str,
        company_id: Uuid,
    ) -> Result<Option<User>, StorageError> {
        let row = query(
            r#"
            SELECT id, email, password_hash, first_name, last_name,
                   role, company_id, created_at, updated_at
            FROM users
            WHERE email = $1
              AND company_id = $2
            "#,
        )
        .bind(email)
        .bind(company_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let row = query(
            r#"
            SELECT id, email, password_hash, first_name, last_name,
                   role, company_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(StorageError::from)
    }
}
