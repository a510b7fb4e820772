use crate::domain::entities::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Filters handed to a row source. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub sort: Option<SortSpec>,
}

impl PageQuery {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            search: String::new(),
            sort: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub rows: Vec<Row>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}
