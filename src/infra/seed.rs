use chrono::NaiveDate;

use crate::domain::entities::row::Row;

const FIRST_NAMES: [&str; 12] = [
    "John", "Jane", "Alice", "Bob", "Carol", "David", "Eve", "Frank", "Grace", "Henry", "Ivy",
    "Jack",
];
const LAST_NAMES: [&str; 8] = [
    "Doe", "Smith", "Johnson", "Brown", "Lee", "Garcia", "Martin", "Walker",
];
const DEPARTMENTS: [(&str, &[&str]); 4] = [
    ("Engineering", &["Software Engineer", "Senior Engineer", "Tech Lead"]),
    ("Marketing", &["Marketing Specialist", "Content Writer"]),
    ("Sales", &["Account Executive", "Sales Manager"]),
    ("Human Resources", &["HR Generalist", "Recruiter"]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub status: String,
    pub join_date: NaiveDate,
    pub salary: f64,
}

impl EmployeeRecord {
    pub fn to_row(&self, id: i64) -> Row {
        Row::new()
            .with("id", id)
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("department", self.department.as_str())
            .with("role", self.role.as_str())
            .with("status", self.status.as_str())
            .with("joinDate", self.join_date)
            .with("salary", self.salary)
    }
}

/// Deterministic employee fixtures for demos and tests.
pub fn demo_employees(count: usize) -> Vec<EmployeeRecord> {
    let base_date = NaiveDate::from_ymd_opt(2019, 1, 7).unwrap_or_default();
    (0..count)
        .map(|idx| {
            let first = FIRST_NAMES[idx % FIRST_NAMES.len()];
            let last = LAST_NAMES[(idx / FIRST_NAMES.len() + idx) % LAST_NAMES.len()];
            let (department, roles) = DEPARTMENTS[idx % DEPARTMENTS.len()];
            let role = roles[idx % roles.len()];
            let status = if idx % 5 == 4 { "inactive" } else { "active" };
            let join_date = base_date + chrono::Duration::days((idx as i64) * 37);
            EmployeeRecord {
                name: format!("{first} {last}"),
                email: format!(
                    "{}.{}{}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    idx + 1
                ),
                department: department.to_string(),
                role: role.to_string(),
                status: status.to_string(),
                join_date,
                salary: 52_000.0 + ((idx * 1_375) % 48_000) as f64,
            }
        })
        .collect()
}

pub fn demo_rows(count: usize) -> Vec<Row> {
    demo_employees(count)
        .iter()
        .enumerate()
        .map(|(idx, record)| record.to_row(idx as i64 + 1))
        .collect()
}
