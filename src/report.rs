//! Withdrawal history CSV report
//!
//! The column order, header text, and quoting of free-text fields are a
//! compatibility contract with the existing report consumers; embedded quote
//! characters are escaped by doubling.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Optional inclusive date bounds for the report query.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// One report line: ledger entry joined with its owning employee.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub grade: String,
    pub location: String,
    pub gallons_withdrawn: i32,
    pub withdrawal_date_time: DateTime<Utc>,
}

const CSV_HEADER: &str = "Withdrawal ID,Employee ID,Employee Name,Department,Grade,\
Location,Gallons Withdrawn,Withdrawal Date,Withdrawal Time";

/// Double-quote a free-text field, doubling any embedded quotes.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn render_csv(rows: &[ReportRow]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for row in rows {
        let line = [
            row.id.to_string(),
            quoted(&row.employee_id),
            quoted(&row.name),
            quoted(&row.department),
            row.grade.clone(),
            quoted(&row.location),
            row.gallons_withdrawn.to_string(),
            row.withdrawal_date_time.format("%Y-%m-%d").to_string(),
            row.withdrawal_date_time.format("%H:%M:%S").to_string(),
        ]
        .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

/// Download filename, e.g. `withdrawal_history_2024_07_01_153045.csv`.
pub fn report_filename(now: DateTime<Utc>) -> String {
    format!("withdrawal_history_{}.csv", now.format("%Y_%m_%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> ReportRow {
        ReportRow {
            id: 42,
            employee_id: "EMP001".to_string(),
            name: "John Doe".to_string(),
            department: "IT".to_string(),
            grade: "G8".to_string(),
            location: "Jakarta Office".to_string(),
            gallons_withdrawn: 3,
            withdrawal_date_time: Utc.with_ymd_and_hms(2024, 7, 1, 15, 30, 45).unwrap(),
        }
    }

    #[test]
    fn test_header_line() {
        let csv = render_csv(&[]);
        assert_eq!(
            csv,
            "Withdrawal ID,Employee ID,Employee Name,Department,Grade,\
             Location,Gallons Withdrawn,Withdrawal Date,Withdrawal Time\n"
        );
    }

    #[test]
    fn test_column_order_and_quoting() {
        let csv = render_csv(&[row()]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "42,\"EMP001\",\"John Doe\",\"IT\",G8,\"Jakarta Office\",3,2024-07-01,15:30:45"
        );
    }

    #[test]
    fn test_embedded_comma_survives_quoting() {
        let mut r = row();
        r.department = "Research, Development".to_string();
        let csv = render_csv(&[r]);
        assert!(csv.contains("\"Research, Development\""));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let mut r = row();
        r.name = "John \"JD\" Doe".to_string();
        let csv = render_csv(&[r]);
        assert!(csv.contains("\"John \"\"JD\"\" Doe\""));
    }

    #[test]
    fn test_one_line_per_entry_newest_first_preserved() {
        let mut older = row();
        older.id = 1;
        let rows = vec![row(), older];
        let csv = render_csv(&rows);
        // Rendering preserves query order; no re-sorting here
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.lines().nth(1).unwrap().starts_with("42,"));
        assert!(csv.lines().nth(2).unwrap().starts_with("1,"));
    }

    #[test]
    fn test_report_filename_format() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 15, 30, 45).unwrap();
        assert_eq!(
            report_filename(now),
            "withdrawal_history_2024_07_01_153045.csv"
        );
    }
}
