//! Employee database operations: scan lookup, quota lifecycle, admin CRUD

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::error::{AppError, ErrorCode};
use crate::models::{Employee, EmployeePayload};
use crate::quota::{self, Grade};

// ── Scan path ──

pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<Employee>, AppError> {
    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, barcode_tag, employee_id, name, department, grade, location,
               monthly_quota, current_taken_gallons, last_quota_reset,
               created_at, updated_at
        FROM employees
        WHERE barcode_tag = $1 OR employee_id = $1
        LIMIT 1
        "#,
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

/// Lazy monthly reset: zero the counter when the record is touched in a new
/// calendar month (or was never reset). No write when the period is current.
pub async fn reset_if_stale(
    pool: &PgPool,
    employee: Employee,
    today: NaiveDate,
) -> Result<(Employee, bool), AppError> {
    if !quota::needs_reset(employee.last_quota_reset, today) {
        return Ok((employee, false));
    }

    let updated = sqlx::query_as::<_, Employee>(
        r#"
        UPDATE employees
        SET current_taken_gallons = 0, last_quota_reset = $1, updated_at = now()
        WHERE id = $2
        RETURNING id, barcode_tag, employee_id, name, department, grade, location,
                  monthly_quota, current_taken_gallons, last_quota_reset,
                  created_at, updated_at
        "#,
    )
    .bind(today)
    .bind(employee.id)
    .fetch_one(pool)
    .await?;
    Ok((updated, true))
}

/// Resolve an employee by either identifier and normalize its period.
pub async fn lookup_current(
    pool: &PgPool,
    identifier: &str,
    today: NaiveDate,
) -> Result<Employee, AppError> {
    let employee = find_by_identifier(pool, identifier)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    let (employee, _) = reset_if_stale(pool, employee, today).await?;
    Ok(employee)
}

/// Withdraw gallons against the current period.
///
/// The whole read-check-write runs in one transaction with the employee row
/// locked (`FOR UPDATE`), so concurrent withdrawals for the same employee
/// serialize and the counter update and ledger append commit together or not
/// at all.
pub async fn withdraw(
    pool: &PgPool,
    employee_pk: i64,
    gallons: i32,
    now: DateTime<Utc>,
) -> Result<Employee, AppError> {
    let today = now.date_naive();
    let mut tx = pool.begin().await?;

    let mut employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, barcode_tag, employee_id, name, department, grade, location,
               monthly_quota, current_taken_gallons, last_quota_reset,
               created_at, updated_at
        FROM employees
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(employee_pk)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    // Withdrawal always operates against the current period
    if quota::needs_reset(employee.last_quota_reset, today) {
        employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET current_taken_gallons = 0, last_quota_reset = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, barcode_tag, employee_id, name, department, grade, location,
                      monthly_quota, current_taken_gallons, last_quota_reset,
                      created_at, updated_at
            "#,
        )
        .bind(today)
        .bind(employee.id)
        .fetch_one(&mut *tx)
        .await?;
    }

    if !quota::within_quota(employee.current_taken_gallons, employee.monthly_quota, gallons) {
        // Dropping the transaction rolls the reset back too; the next touch
        // will redo it.
        return Err(AppError::new(ErrorCode::InsufficientQuota)
            .with_detail("requested", gallons)
            .with_detail("remaining", employee.remaining_quota()));
    }

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        UPDATE employees
        SET current_taken_gallons = current_taken_gallons + $1, updated_at = now()
        WHERE id = $2
        RETURNING id, barcode_tag, employee_id, name, department, grade, location,
                  monthly_quota, current_taken_gallons, last_quota_reset,
                  created_at, updated_at
        "#,
    )
    .bind(gallons)
    .bind(employee_pk)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO withdrawal_history (employee_id, gallons_withdrawn, withdrawal_date_time)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(employee_pk)
    .bind(gallons)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(employee)
}

// ── Admin CRUD ──

pub async fn list_employees(
    pool: &PgPool,
    page: i64,
    per_page: i64,
) -> Result<(Vec<Employee>, i64), AppError> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;

    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, barcode_tag, employee_id, name, department, grade, location,
               monthly_quota, current_taken_gallons, last_quota_reset,
               created_at, updated_at
        FROM employees
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(per_page)
    .bind((page - 1) * per_page)
    .fetch_all(pool)
    .await?;

    Ok((employees, total))
}

pub async fn find_employee(pool: &PgPool, id: i64) -> Result<Employee, AppError> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, barcode_tag, employee_id, name, department, grade, location,
               monthly_quota, current_taken_gallons, last_quota_reset,
               created_at, updated_at
        FROM employees
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))
}

pub async fn create_employee(
    pool: &PgPool,
    data: &EmployeePayload,
    grade: Grade,
) -> Result<Employee, AppError> {
    sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (
            barcode_tag, employee_id, name, department, grade, location, monthly_quota
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, barcode_tag, employee_id, name, department, grade, location,
                  monthly_quota, current_taken_gallons, last_quota_reset,
                  created_at, updated_at
        "#,
    )
    .bind(&data.barcode_tag)
    .bind(&data.employee_id)
    .bind(&data.name)
    .bind(&data.department)
    .bind(grade.as_str())
    .bind(&data.location)
    .bind(grade.monthly_quota())
    .fetch_one(pool)
    .await
    .map_err(identifier_conflict)
}

/// Full-payload update. The quota follows the grade; the usage counter is
/// deliberately left alone even when the new quota drops below it — the next
/// monthly reset normalizes it.
pub async fn update_employee(
    pool: &PgPool,
    id: i64,
    data: &EmployeePayload,
    grade: Grade,
) -> Result<Employee, AppError> {
    sqlx::query_as::<_, Employee>(
        r#"
        UPDATE employees
        SET barcode_tag = $1, employee_id = $2, name = $3, department = $4,
            grade = $5, location = $6, monthly_quota = $7, updated_at = now()
        WHERE id = $8
        RETURNING id, barcode_tag, employee_id, name, department, grade, location,
                  monthly_quota, current_taken_gallons, last_quota_reset,
                  created_at, updated_at
        "#,
    )
    .bind(&data.barcode_tag)
    .bind(&data.employee_id)
    .bind(&data.name)
    .bind(&data.department)
    .bind(grade.as_str())
    .bind(&data.location)
    .bind(grade.monthly_quota())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(identifier_conflict)?
    .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))
}

/// Ledger entries go with the employee (ON DELETE CASCADE).
pub async fn delete_employee(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let rows = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    Ok(())
}

/// Map unique-constraint violations on the identifier columns to
/// field-specific errors; everything else propagates as a database error.
fn identifier_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let constraint = db.constraint().unwrap_or_default();
            if constraint.contains("barcode_tag") {
                return AppError::new(ErrorCode::BarcodeTagExists)
                    .with_detail("field", "barcode_tag");
            }
            if constraint.contains("employee_id") {
                return AppError::new(ErrorCode::EmployeeIdExists)
                    .with_detail("field", "employee_id");
            }
            return AppError::new(ErrorCode::AlreadyExists);
        }
    }
    e.into()
}
