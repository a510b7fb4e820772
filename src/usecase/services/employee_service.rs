use std::sync::Arc;

use tracing::{error, info};

use crate::defaults::DEFAULT_PAGE_SIZE;
use crate::domain::entities::page::{PageQuery, PageResult};
use crate::domain::entities::row::{Row, RowId};
use crate::usecase::ports::source::{RowSource, SourceError};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load employees. Please try again.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create employee. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete employee. Please try again.";

/// Listing state for one employee page: the current filters, the last page that loaded,
/// and the loading/error flags the hosting page shows.
pub struct EmployeeService {
    source: Arc<dyn RowSource>,
    filters: PageQuery,
    rows: Vec<Row>,
    total: usize,
    loading: bool,
    error: Option<String>,
}

impl EmployeeService {
    pub fn new(source: Arc<dyn RowSource>) -> Self {
        Self {
            source,
            filters: PageQuery::new(0, DEFAULT_PAGE_SIZE),
            rows: Vec::new(),
            total: 0,
            loading: false,
            error: None,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &PageQuery {
        &self.filters
    }

    pub fn total_pages(&self) -> usize {
        if self.filters.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.filters.page_size)
    }

    /// Loads a page. Omitted filters keep their current value. On failure the previous
    /// rows stay in place and the error message is recorded.
    pub fn load(
        &mut self,
        page: Option<usize>,
        page_size: Option<usize>,
        search: Option<String>,
    ) -> Result<PageResult, SourceError> {
        self.filters.page = page.unwrap_or(self.filters.page);
        self.filters.page_size = page_size
            .filter(|size| *size > 0)
            .unwrap_or(self.filters.page_size);
        if let Some(search) = search {
            self.filters.search = search;
        }

        self.loading = true;
        self.error = None;
        let result = self.source.load_page(self.filters.clone());
        self.loading = false;

        match result {
            Ok(page) => {
                info!(
                    page = page.page + 1,
                    page_size = page.page_size,
                    total = page.total,
                    search = %self.filters.search,
                    "loaded employees"
                );
                self.rows = page.rows.clone();
                self.total = page.total;
                Ok(page)
            }
            Err(err) => {
                error!(error = %err, "error loading employees");
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    pub fn reload(&mut self) -> Result<PageResult, SourceError> {
        self.load(None, None, None)
    }

    pub fn create(&mut self, row: Row) -> Result<RowId, SourceError> {
        self.error = None;
        match self.source.create_row(row) {
            Ok(id) => {
                info!(id = id.0, "employee created");
                self.reload()?;
                Ok(id)
            }
            Err(err) => {
                error!(error = %err, "error creating employee");
                self.error = Some(CREATE_FAILED_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    /// Deletes a row, then reloads the current page. A page emptied by the delete steps
    /// back one page.
    pub fn delete(&mut self, id: RowId) -> Result<(), SourceError> {
        self.error = None;
        if let Err(err) = self.source.delete_row(id) {
            error!(error = %err, "error deleting employee");
            self.error = Some(DELETE_FAILED_MESSAGE.to_string());
            return Err(err);
        }
        info!(id = id.0, "employee deleted");

        let page = self.reload()?;
        if page.rows.is_empty() && self.filters.page > 0 {
            let previous = self.filters.page - 1;
            self.load(Some(previous), None, None)?;
        }
        Ok(())
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.filters = PageQuery::new(0, DEFAULT_PAGE_SIZE);
        self.rows.clear();
        self.total = 0;
        self.loading = false;
        self.error = None;
    }
}
