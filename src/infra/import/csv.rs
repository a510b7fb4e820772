use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;

use crate::infra::seed::EmployeeRecord;
use crate::infra::sqlite::queries::insert_employees;
use crate::infra::sqlite::schema::init_db;
use crate::usecase::grid::format::{parse_date, parse_number};

pub const REQUIRED_HEADERS: [&str; 6] = ["name", "email", "department", "role", "join_date", "salary"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResult {
    pub row_count: usize,
}

fn header_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn field(record: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|idx| record.get(idx))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Imports `name,email,department,role,status,join_date,salary` rows; `status` is optional
/// and defaults to `active`.
pub fn import_employees_csv(db_path: &Path, csv_path: &Path) -> Result<ImportResult> {
    init_db(db_path)?;

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .clone();

    for required in REQUIRED_HEADERS {
        if header_index(&headers, required).is_none() {
            anyhow::bail!("csv header `{required}` is required")
        }
    }

    let name_idx = header_index(&headers, "name");
    let email_idx = header_index(&headers, "email");
    let department_idx = header_index(&headers, "department");
    let role_idx = header_index(&headers, "role");
    let status_idx = header_index(&headers, "status");
    let join_idx = header_index(&headers, "join_date");
    let salary_idx = header_index(&headers, "salary");

    let mut records = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.context("failed to parse csv record")?;
        let join_text = field(&record, join_idx);
        let join_date = parse_date(&join_text)
            .map(|value| value.date())
            .with_context(|| format!("row {}: invalid join_date `{join_text}`", row_idx + 1))?;
        let salary_text = field(&record, salary_idx);
        let salary = parse_number(&salary_text)
            .with_context(|| format!("row {}: invalid salary `{salary_text}`", row_idx + 1))?;
        let status = match field(&record, status_idx) {
            status if status.is_empty() => "active".to_string(),
            status => status,
        };

        records.push(EmployeeRecord {
            name: field(&record, name_idx),
            email: field(&record, email_idx),
            department: field(&record, department_idx),
            role: field(&record, role_idx),
            status,
            join_date,
            salary,
        });
    }

    let row_count = insert_employees(db_path, &records)?;
    Ok(ImportResult { row_count })
}
