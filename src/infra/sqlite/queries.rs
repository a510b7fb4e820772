use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, types::Value};

use crate::domain::entities::page::PageQuery;
use crate::domain::entities::row::{CellValue, Row};
use crate::infra::seed::EmployeeRecord;
use crate::infra::sqlite::schema::open_connection;
use crate::usecase::grid::format::parse_date;

const SELECT_COLUMNS: &str = "id, name, email, department, role, status, join_date, salary";
const SEARCH_COLUMNS: [&str; 6] = ["name", "email", "department", "role", "status", "join_date"];

/// Row key to SQL column. Sorting only accepts keys listed here.
fn sort_column(key: &str) -> Option<&'static str> {
    match key {
        "id" => Some("id"),
        "name" => Some("name"),
        "email" => Some("email"),
        "department" => Some("department"),
        "role" => Some("role"),
        "status" => Some("status"),
        "joinDate" => Some("join_date"),
        "salary" => Some("salary"),
        _ => None,
    }
}

/// Wraps a search term for `LIKE ... ESCAPE '\'` so typed `%` and `_` match literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn employee_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let join_date: String = row.get(6)?;
    let join_value = parse_date(&join_date)
        .map(CellValue::Date)
        .unwrap_or_else(|| CellValue::Text(join_date.clone()));
    let mut out = Row::new()
        .with("id", row.get::<_, i64>(0)?)
        .with("name", row.get::<_, String>(1)?)
        .with("email", row.get::<_, String>(2)?)
        .with("department", row.get::<_, String>(3)?)
        .with("role", row.get::<_, String>(4)?)
        .with("status", row.get::<_, String>(5)?)
        .with("salary", row.get::<_, f64>(7)?);
    out.set("joinDate", join_value);
    Ok(out)
}

pub fn query_employee_page(db_path: &Path, query: &PageQuery) -> Result<(Vec<Row>, usize)> {
    if query.page_size == 0 {
        anyhow::bail!("page_size must be greater than zero")
    }

    let conn = open_connection(db_path)?;

    let mut filter_sql = String::new();
    let mut filter_params: Vec<Value> = Vec::new();
    let search = query.search.trim();
    if !search.is_empty() {
        let clauses = SEARCH_COLUMNS
            .iter()
            .map(|column| format!("{column} LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        filter_sql = format!(" WHERE ({clauses})");
        let pattern = like_pattern(search);
        for _ in SEARCH_COLUMNS {
            filter_params.push(Value::Text(pattern.clone()));
        }
    }

    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM employee{filter_sql}"),
            params_from_iter(filter_params.iter()),
            |row| row.get(0),
        )
        .context("failed to count employees")?;

    let order_sql = match &query.sort {
        Some(sort) => {
            let column = sort_column(&sort.column)
                .with_context(|| format!("unsupported sort column: {}", sort.column))?;
            format!(" ORDER BY {column} {}, id ASC", sort.direction.as_sql())
        }
        None => " ORDER BY id ASC".to_string(),
    };

    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM employee{filter_sql}{order_sql} LIMIT ? OFFSET ?"
    );
    let mut page_params = filter_params;
    page_params.push(Value::Integer(query.page_size as i64));
    page_params.push(Value::Integer(query.offset() as i64));

    let mut stmt = conn
        .prepare(&sql)
        .context("failed to prepare employee page query")?;
    let rows = stmt
        .query_map(params_from_iter(page_params.iter()), employee_row)
        .context("failed to query employee page")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect employee rows")?;

    Ok((rows, total.max(0) as usize))
}

pub fn insert_employee(db_path: &Path, record: &EmployeeRecord) -> Result<i64> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO employee(name, email, department, role, status, join_date, salary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.name,
            record.email,
            record.department,
            record.role,
            record.status,
            record.join_date.format("%Y-%m-%d").to_string(),
            record.salary,
        ],
    )
    .context("failed to insert employee")?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_employees(db_path: &Path, records: &[EmployeeRecord]) -> Result<usize> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;

    let mut insert_stmt = tx
        .prepare(
            "INSERT INTO employee(name, email, department, role, status, join_date, salary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .context("failed to prepare employee insert")?;
    for record in records {
        insert_stmt
            .execute(params![
                record.name,
                record.email,
                record.department,
                record.role,
                record.status,
                record.join_date.format("%Y-%m-%d").to_string(),
                record.salary,
            ])
            .with_context(|| format!("failed to insert employee {}", record.email))?;
    }
    drop(insert_stmt);

    tx.commit().context("failed to commit employee insert")?;
    Ok(records.len())
}

/// Returns whether a row was removed.
pub fn delete_employee(db_path: &Path, id: i64) -> Result<bool> {
    let conn = open_connection(db_path)?;
    let removed = conn
        .execute("DELETE FROM employee WHERE id = ?1", params![id])
        .with_context(|| format!("failed to delete employee #{id}"))?;
    Ok(removed > 0)
}

pub fn count_employees(db_path: &Path) -> Result<usize> {
    let conn = open_connection(db_path)?;
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))
        .context("failed to count employees")?;
    Ok(total.max(0) as usize)
}
