//! Employee and withdrawal ledger models, plus API payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::quota::Grade;

/// Third-party QR rendering service; we only construct the URL.
const QR_API_BASE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Employee record as stored
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    /// Unique barcode for scanning
    pub barcode_tag: String,
    /// Employee ID for manual input
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub grade: String,
    pub location: String,
    /// Derived from grade at create/update time, not recomputed on read
    pub monthly_quota: i32,
    pub current_taken_gallons: i32,
    pub last_quota_reset: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn remaining_quota(&self) -> i32 {
        self.monthly_quota - self.current_taken_gallons
    }

    /// URL of the QR code image for this employee's barcode tag.
    pub fn qr_code_url(&self) -> String {
        format!(
            "{QR_API_BASE}?size=200x200&data={}",
            urlencoding::encode(&self.barcode_tag)
        )
    }
}

/// Employee shape shown on the scan station
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSummary {
    pub id: i64,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub grade: String,
    pub location: String,
    pub monthly_quota: i32,
    pub current_taken_gallons: i32,
    pub remaining_quota: i32,
}

impl From<&Employee> for EmployeeSummary {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            employee_id: e.employee_id.clone(),
            name: e.name.clone(),
            department: e.department.clone(),
            grade: e.grade.clone(),
            location: e.location.clone(),
            monthly_quota: e.monthly_quota,
            current_taken_gallons: e.current_taken_gallons,
            remaining_quota: e.remaining_quota(),
        }
    }
}

/// Create/update employee payload (full replacement, admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeePayload {
    pub barcode_tag: String,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub grade: String,
    pub location: String,
}

impl EmployeePayload {
    /// Field-level validation. Returns the parsed grade so the caller can
    /// compute the quota from it.
    pub fn validate(&self) -> Result<Grade, AppError> {
        fn required(field: &'static str, value: &str) -> Result<(), AppError> {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{field} is required."))
                    .with_detail("field", field));
            }
            Ok(())
        }

        required("barcode_tag", &self.barcode_tag)?;
        required("employee_id", &self.employee_id)?;
        required("name", &self.name)?;
        required("department", &self.department)?;
        required("grade", &self.grade)?;
        required("location", &self.location)?;

        Grade::parse(&self.grade)
            .ok_or_else(|| AppError::new(ErrorCode::InvalidGrade).with_detail("field", "grade"))
    }
}

/// One withdrawal ledger entry. Immutable once created.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WithdrawalEntry {
    pub id: i64,
    pub employee_id: i64,
    pub gallons_withdrawn: i32,
    pub withdrawal_date_time: DateTime<Utc>,
}

/// Admin detail view: employee plus recent ledger entries
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
    pub recent_withdrawals: Vec<WithdrawalEntry>,
    pub qr_code_url: String,
}

/// Paginated listing envelope
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(barcode_tag: &str) -> Employee {
        Employee {
            id: 1,
            barcode_tag: barcode_tag.to_string(),
            employee_id: "EMP001".to_string(),
            name: "John Doe".to_string(),
            department: "IT".to_string(),
            grade: "G8".to_string(),
            location: "Jakarta Office".to_string(),
            monthly_quota: 24,
            current_taken_gallons: 5,
            last_quota_reset: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_remaining_quota() {
        assert_eq!(employee("TEST001").remaining_quota(), 19);
    }

    #[test]
    fn test_qr_code_url() {
        assert_eq!(
            employee("TEST001").qr_code_url(),
            "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=TEST001"
        );
    }

    #[test]
    fn test_qr_code_url_percent_encodes_tag() {
        let url = employee("A B&C=1").qr_code_url();
        assert!(url.ends_with("data=A%20B%26C%3D1"));
    }

    fn payload() -> EmployeePayload {
        EmployeePayload {
            barcode_tag: "BC123456".to_string(),
            employee_id: "EMP001".to_string(),
            name: "John Doe".to_string(),
            department: "IT".to_string(),
            grade: "G8".to_string(),
            location: "Jakarta Office".to_string(),
        }
    }

    #[test]
    fn test_payload_validate_ok() {
        assert_eq!(payload().validate().unwrap(), Grade::G8);
    }

    #[test]
    fn test_payload_validate_missing_field() {
        let mut p = payload();
        p.name = "  ".to_string();
        let err = p.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "name");
    }

    #[test]
    fn test_payload_validate_bad_grade() {
        let mut p = payload();
        p.grade = "G99".to_string();
        let err = p.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidGrade);
    }
}
