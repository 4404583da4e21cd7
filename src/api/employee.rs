//! Admin employee CRUD endpoints

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::db::{employees, withdrawals};
use crate::error::{ApiResponse, AppError};
use crate::models::{Employee, EmployeeDetail, EmployeePayload, Paginated};
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

const PER_PAGE: i64 = 10;
const RECENT_WITHDRAWALS: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Paginated<Employee>> {
    let page = query.page.unwrap_or(1).max(1);
    let (data, total) = employees::list_employees(&state.pool, page, PER_PAGE).await?;
    Ok(Json(ApiResponse::success(Paginated {
        data,
        page,
        per_page: PER_PAGE,
        total,
    })))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<Employee> {
    let grade = payload.validate()?;
    let employee = employees::create_employee(&state.pool, &payload, grade).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Employee created successfully.",
        employee,
    )))
}

pub async fn show_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<EmployeeDetail> {
    let employee = employees::find_employee(&state.pool, id).await?;
    let recent_withdrawals =
        withdrawals::recent_for_employee(&state.pool, employee.id, RECENT_WITHDRAWALS).await?;
    let qr_code_url = employee.qr_code_url();
    Ok(Json(ApiResponse::success(EmployeeDetail {
        employee,
        recent_withdrawals,
        qr_code_url,
    })))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<Employee> {
    let grade = payload.validate()?;
    let employee = employees::update_employee(&state.pool, id, &payload, grade).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Employee updated successfully.",
        employee,
    )))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    employees::delete_employee(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok_with_message(
        "Employee deleted successfully.",
    )))
}
