use std::sync::RwLock;

use crate::domain::entities::page::{PageQuery, PageResult, SortDirection};
use crate::domain::entities::row::{Row, RowId};
use crate::usecase::grid::sort::compare_cells;
use crate::usecase::ports::source::{RowSource, SourceError};

/// In-memory row source with full-text search over every cell.
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: RwLock<Vec<Row>>,
}

fn row_contains(row: &Row, term: &str) -> bool {
    row.iter()
        .any(|(_, value)| value.to_plain_string().to_lowercase().contains(term))
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn snapshot(&self) -> Result<Vec<Row>, SourceError> {
        self.rows
            .read()
            .map(|rows| rows.clone())
            .map_err(SourceError::storage)
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RowSource for MemorySource {
    fn load_page(&self, query: PageQuery) -> Result<PageResult, SourceError> {
        if query.page_size == 0 {
            return Err(SourceError::Query(
                "page_size must be greater than zero".to_string(),
            ));
        }

        let rows = self.rows.read().map_err(SourceError::storage)?;
        let term = query.search.trim().to_lowercase();
        let mut matched: Vec<&Row> = rows
            .iter()
            .filter(|row| term.is_empty() || row_contains(row, &term))
            .collect();

        if let Some(sort) = &query.sort {
            matched.sort_by(|left, right| {
                let ordering = compare_cells(left.get(&sort.column), right.get(&sort.column));
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total = matched.len();
        let page_rows = matched
            .into_iter()
            .skip(query.offset())
            .take(query.page_size)
            .cloned()
            .collect();

        Ok(PageResult {
            rows: page_rows,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }

    fn create_row(&self, row: Row) -> Result<RowId, SourceError> {
        let mut rows = self.rows.write().map_err(SourceError::storage)?;
        let next_id = rows
            .iter()
            .filter_map(|row| row.id())
            .map(i64::from)
            .max()
            .unwrap_or(0)
            + 1;
        rows.push(row.with("id", next_id));
        Ok(RowId(next_id))
    }

    fn delete_row(&self, id: RowId) -> Result<(), SourceError> {
        let mut rows = self.rows.write().map_err(SourceError::storage)?;
        let before = rows.len();
        rows.retain(|row| row.id() != Some(id));
        if rows.len() == before {
            return Err(SourceError::NotFound(id));
        }
        Ok(())
    }
}
