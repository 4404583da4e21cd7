//! Withdrawal ledger reads
//!
//! The ledger is append-only; the only writer is the withdraw operation in
//! `db::employees`.

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::WithdrawalEntry;
use crate::report::{ReportFilters, ReportRow};

pub async fn recent_for_employee(
    pool: &PgPool,
    employee_pk: i64,
    limit: i64,
) -> Result<Vec<WithdrawalEntry>, AppError> {
    let entries = sqlx::query_as::<_, WithdrawalEntry>(
        r#"
        SELECT id, employee_id, gallons_withdrawn, withdrawal_date_time
        FROM withdrawal_history
        WHERE employee_id = $1
        ORDER BY withdrawal_date_time DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(employee_pk)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Ledger joined with the owning employee, newest first. Date bounds are
/// inclusive and compare the date component only (UTC).
pub async fn report_rows(
    pool: &PgPool,
    filters: &ReportFilters,
) -> Result<Vec<ReportRow>, AppError> {
    let rows = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT w.id, e.employee_id, e.name, e.department, e.grade, e.location,
               w.gallons_withdrawn, w.withdrawal_date_time
        FROM withdrawal_history w
        JOIN employees e ON e.id = w.employee_id
        WHERE ($1::date IS NULL OR (w.withdrawal_date_time AT TIME ZONE 'UTC')::date >= $1)
          AND ($2::date IS NULL OR (w.withdrawal_date_time AT TIME ZONE 'UTC')::date <= $2)
        ORDER BY w.withdrawal_date_time DESC, w.id DESC
        "#,
    )
    .bind(filters.start_date)
    .bind(filters.end_date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
