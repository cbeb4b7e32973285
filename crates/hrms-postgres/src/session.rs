//! Durable session storage.
//!
//! One row per user, keyed by `user_id`. Login and refresh both upsert, so
//! the row always carries the most recently issued token pair.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_postgres::PgRow;
use uuid::Uuid;

use hrms_core::Session;
use hrms_storage::{SessionStorage, StorageError};

use crate::error::{PostgresError, db_error};
use crate::storage::PostgresStorage;

fn session_from_row(row: &PgRow) -> Result<Session, PostgresError> {
    Ok(Session {
        user_id: row.try_get("user_id")?,
        access_token: row.try_get("access_token")?,
        refresh_token: row.try_get("refresh_token")?,
        expires_at: row.try_get("expires_at")?,
        device_info: row.try_get("device_info")?,
        ip_address: row.try_get("ip_address")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl SessionStorage for PostgresStorage {
    async fn upsert_session(&self, session: &Session) -> Result<(), StorageError> {
        query(
            r#"
            INSERT INTO sessions (user_id, access_token, refresh_token, expires_at,
                                  device_info, ip_address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_at = EXCLUDED.expires_at,
                device_info = EXCLUDED.device_info,
                ip_address = EXCLUDED.ip_address,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session.user_id)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.expires_at)
        .bind(session.device_info.as_deref())
        .bind(session.ip_address.as_deref())
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(self.pool())
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_session_by_user(&self, user_id: Uuid) -> Result<Option<Session>, StorageError> {
        let row = query(
            r#"
            SELECT user_id, access_token, refresh_token, expires_at,
                   device_info, ip_address, created_at, updated_at
            FROM sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        row.as_ref()
            .map(session_from_row)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn delete_session(&self, user_id: Uuid) -> Result<(), StorageError> {
        // Idempotent: deleting an absent row is fine.
        query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
