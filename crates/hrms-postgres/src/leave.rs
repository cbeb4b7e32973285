//! Leave request storage.
//!
//! Approval timestamps are set here: when an update moves a request into
//! `approved`, the row's `approved_at` becomes the database's NOW() rather
//! than a caller-supplied value.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::row::Row;
use sqlx_postgres::PgRow;
use uuid::Uuid;

use hrms_core::{LeaveRequest, LeaveRequestFilter, LeaveRequestUpdate, Page, PageQuery};
use hrms_storage::{LeaveRequestStorage, StorageError};

use crate::error::{PostgresError, db_error};
use crate::rows::decode_wire_enum;
use crate::storage::PostgresStorage;

fn leave_from_row(row: &PgRow) -> Result<LeaveRequest, PostgresError> {
    Ok(LeaveRequest {
        id: row.try_get("id")?,
        company_id: row.try_get("company_id")?,
        employee_id: row.try_get("employee_id")?,
        leave_type: row.try_get("leave_type")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        total_days: row.try_get("total_days")?,
        reason: row.try_get("reason")?,
        status: decode_wire_enum(row.try_get("status")?)?,
        requested_at: row.try_get("requested_at")?,
        approved_by_id: row.try_get("approved_by_id")?,
        approved_at: row.try_get("approved_at")?,
        rejection_reason: row.try_get("rejection_reason")?,
    })
}

#[async_trait]
impl LeaveRequestStorage for PostgresStorage {
    async fn create_leave_request(&self, request: &LeaveRequest) -> Result<(), StorageError> {
        query(
            r#"
            INSERT INTO leave_requests (id, company_id, employee_id, leave_type,
                                        start_date, end_date, total_days, reason,
                                        status, requested_at, approved_by_id,
                                        approved_at, rejection_reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(request.id)
        .bind(request.company_id)
        .bind(request.employee_id)
        .bind(&request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.total_days)
        .bind(request.reason.as_deref())
        .bind(request.status.as_str())
        .bind(request.requested_at)
        .bind(request.approved_by_id)
        .bind(request.approved_at)
        .bind(request.rejection_reason.as_deref())
        .execute(self.pool())
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_leave_request(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<LeaveRequest>, StorageError> {
        let row = query(
            r#"
            SELECT id, company_id, employee_id, leave_type, start_date, end_date,
                   total_days, reason, status, requested_at, approved_by_id,
                   approved_at, rejection_reason
            FROM leave_requests
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
            .map(leave_from_row)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn list_leave_requests(
        &self,
        company_id: Uuid,
        filter: &LeaveRequestFilter,
        page: PageQuery,
    ) -> Result<Page<LeaveRequest>, StorageError> {
        let page = page.normalized();
        let status = filter.status.map(|s| s.as_str());

        let (total,): (i64,) = query_as(
            r#"
            SELECT COUNT(*)
            FROM leave_requests
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR employee_id = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::date IS NULL OR start_date >= $4)
              AND ($5::date IS NULL OR start_date <= $5)
            "#,
        )
        .bind(company_id)
        .bind(filter.employee_id)
        .bind(status)
        .bind(filter.start_date_from)
        .bind(filter.start_date_to)
        .fetch_one(self.pool())
        .await
        .map_err(db_error)?;

        let rows = query(
            r#"
            SELECT id, company_id, employee_id, leave_type, start_date, end_date,
                   total_days, reason, status, requested_at, approved_by_id,
                   approved_at, rejection_reason
            FROM leave_requests
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR employee_id = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::date IS NULL OR start_date >= $4)
              AND ($5::date IS NULL OR start_date <= $5)
            ORDER BY requested_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(company_id)
        .bind(filter.employee_id)
        .bind(status)
        .bind(filter.start_date_from)
        .bind(filter.start_date_to)
        .bind(i64::from(page.limit))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await
        .map_err(db_error)?;

        let items = rows
            .iter()
            .map(leave_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(Page::new(
            items,
            u64::try_from(total).unwrap_or_default(),
            page,
        ))
    }

    async fn update_leave_request(
        &self,
        id: Uuid,
        company_id: Uuid,
        update: &LeaveRequestUpdate,
    ) -> Result<LeaveRequest, StorageError> {
        let status = update.status.map(|s| s.as_str());

        let row = query(
            r#"
            UPDATE leave_requests
            SET status = COALESCE($3, status),
                approved_by_id = COALESCE($4, approved_by_id),
                approved_at = CASE WHEN $3::text = 'approved' THEN NOW()
                                   ELSE approved_at END,
                rejection_reason = COALESCE($5, rejection_reason),
                reason = COALESCE($6, reason),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                total_days = COALESCE($9, total_days)
            WHERE id = $1
              AND company_id = $2
            RETURNING id, company_id, employee_id, leave_type, start_date, end_date,
                      total_days, reason, status, requested_at, approved_by_id,
                      approved_at, rejection_reason
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(status)
        .bind(update.approved_by_id)
        .bind(update.rejection_reason.as_deref())
        .bind(update.reason.as_deref())
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(update.total_days)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;

        match row {
            Some(row) => leave_from_row(&row).map_err(StorageError::from),
            None => Err(StorageError::not_found("Leave request", id)),
        }
    }

    async fn delete_leave_request(&self, id: Uuid, company_id: Uuid) -> Result<(), StorageError> {
        let result = query("DELETE FROM leave_requests WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(self.pool())
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Leave request", id));
        }
        Ok(())
    }
}
