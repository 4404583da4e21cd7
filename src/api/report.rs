//! Withdrawal history CSV download

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use chrono::{NaiveDate, Utc};
use http::header;
use serde::Deserialize;

use crate::db::withdrawals;
use crate::error::AppError;
use crate::report::{self, ReportFilters};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub async fn download_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filters = ReportFilters {
        start_date: parse_date_param("start_date", query.start_date.as_deref())?,
        end_date: parse_date_param("end_date", query.end_date.as_deref())?,
    };

    let rows = withdrawals::report_rows(&state.pool, &filters).await?;
    let csv = report::render_csv(&rows);
    let filename = report::report_filename(Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}

fn parse_date_param(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::validation(format!("{field} must be a date in YYYY-MM-DD format."))
                    .with_detail("field", field)
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_date_param() {
        assert_eq!(parse_date_param("start_date", None).unwrap(), None);
        assert_eq!(parse_date_param("start_date", Some("")).unwrap(), None);
        assert_eq!(
            parse_date_param("start_date", Some("2024-02-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }

    #[test]
    fn test_parse_date_param_rejects_garbage() {
        let err = parse_date_param("end_date", Some("02/01/2024")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "end_date");
    }
}
