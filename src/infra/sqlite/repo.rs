use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::domain::entities::page::{PageQuery, PageResult};
use crate::domain::entities::row::{CellValue, Row, RowId};
use crate::infra::seed::{demo_employees, EmployeeRecord};
use crate::infra::sqlite::queries::{
    count_employees, delete_employee, insert_employee, insert_employees, query_employee_page,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::grid::format::parse_date;
use crate::usecase::ports::source::{RowSource, SourceError};

pub struct SqliteSource {
    pub db_path: PathBuf,
}

impl SqliteSource {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        init_db(&db_path)?;
        Ok(Self { db_path })
    }

    /// Fills an empty employee table with the demo fixtures.
    pub fn seed_if_empty(&self, count: usize) -> Result<usize> {
        if count_employees(&self.db_path)? > 0 {
            return Ok(0);
        }
        let inserted = insert_employees(&self.db_path, &demo_employees(count))?;
        info!(inserted, db = %self.db_path.display(), "seeded employee table");
        Ok(inserted)
    }
}

fn text_field(row: &Row, key: &str) -> Result<String, SourceError> {
    match row.get(key) {
        CellValue::Text(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        CellValue::Null => Err(SourceError::Query(format!("missing field `{key}`"))),
        other => {
            let text = other.to_plain_string();
            if text.trim().is_empty() {
                Err(SourceError::Query(format!("missing field `{key}`")))
            } else {
                Ok(text)
            }
        }
    }
}

fn record_from_row(row: &Row) -> Result<EmployeeRecord, SourceError> {
    let join_date = match row.get("joinDate") {
        CellValue::Date(value) => value.date(),
        CellValue::Text(text) => parse_date(text)
            .map(|value| value.date())
            .ok_or_else(|| SourceError::Query(format!("invalid joinDate `{text}`")))?,
        _ => return Err(SourceError::Query("missing field `joinDate`".to_string())),
    };
    let status = match row.get("status") {
        CellValue::Null => "active".to_string(),
        other => other.to_plain_string(),
    };

    Ok(EmployeeRecord {
        name: text_field(row, "name")?,
        email: text_field(row, "email")?,
        department: text_field(row, "department")?,
        role: text_field(row, "role")?,
        status,
        join_date,
        salary: row.get("salary").as_f64().unwrap_or(0.0),
    })
}

impl RowSource for SqliteSource {
    fn load_page(&self, query: PageQuery) -> Result<PageResult, SourceError> {
        let (rows, total) = query_employee_page(&self.db_path, &query)
            .map_err(|err| SourceError::Query(format!("{err:#}")))?;
        debug!(
            page = query.page,
            page_size = query.page_size,
            search = %query.search,
            total,
            "loaded employee page"
        );

        Ok(PageResult {
            rows,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    fn create_row(&self, row: Row) -> Result<RowId, SourceError> {
        let record = record_from_row(&row)?;
        let id = insert_employee(&self.db_path, &record).map_err(SourceError::storage)?;
        Ok(RowId(id))
    }

    fn delete_row(&self, id: RowId) -> Result<(), SourceError> {
        let removed = delete_employee(&self.db_path, id.0).map_err(SourceError::storage)?;
        if !removed {
            return Err(SourceError::NotFound(id));
        }
        Ok(())
    }
}
