use thiserror::Error;

use crate::domain::entities::page::{PageQuery, PageResult};
use crate::domain::entities::row::{Row, RowId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("query failed: {0}")]
    Query(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("row #{0} not found")]
    NotFound(RowId),
}

impl SourceError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        SourceError::Storage(err.to_string())
    }
}

/// Data-access collaborator behind a listing page. The grid never calls this itself; the
/// hosting page does, in answer to grid events.
pub trait RowSource: Send + Sync {
    fn load_page(&self, query: PageQuery) -> Result<PageResult, SourceError>;
    fn create_row(&self, row: Row) -> Result<RowId, SourceError>;
    fn delete_row(&self, id: RowId) -> Result<(), SourceError>;
}
