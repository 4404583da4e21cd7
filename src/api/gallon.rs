//! Scan station endpoints: employee lookup and gallon withdrawal

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;

use crate::db::employees;
use crate::error::{ApiResponse, AppError};
use crate::models::EmployeeSummary;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub lookup: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdentifyRequest {
    pub identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub employee_id: Option<i64>,
    pub gallons: Option<i32>,
}

/// Barcode scanners submit the tag as a query parameter.
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<EmployeeSummary> {
    resolve(&state, query.lookup.as_deref()).await
}

/// Manual entry posts the identifier in the body.
pub async fn identify(
    State(state): State<AppState>,
    Json(req): Json<IdentifyRequest>,
) -> ApiResult<EmployeeSummary> {
    resolve(&state, req.identifier.as_deref()).await
}

async fn resolve(state: &AppState, identifier: Option<&str>) -> ApiResult<EmployeeSummary> {
    let identifier = identifier.unwrap_or("").trim();
    if identifier.is_empty() {
        return Err(
            AppError::validation("Identifier is required.").with_detail("field", "identifier")
        );
    }

    let today = Utc::now().date_naive();
    let employee = employees::lookup_current(&state.pool, identifier, today).await?;
    Ok(Json(ApiResponse::success(EmployeeSummary::from(&employee))))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Json(req): Json<WithdrawRequest>,
) -> ApiResult<EmployeeSummary> {
    let employee_pk = req.employee_id.ok_or_else(|| {
        AppError::validation("Employee ID is required.").with_detail("field", "employee_id")
    })?;
    let gallons = match req.gallons {
        Some(g) if g >= 1 => g,
        _ => {
            return Err(
                AppError::validation("Gallons must be a positive integer.")
                    .with_detail("field", "gallons"),
            );
        }
    };

    let employee = employees::withdraw(&state.pool, employee_pk, gallons, Utc::now()).await?;

    Ok(Json(ApiResponse::success_with_message(
        format!(
            "Successfully withdrew {gallons} gallon(s). Remaining quota: {}",
            employee.remaining_quota()
        ),
        EmployeeSummary::from(&employee),
    )))
}
