use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;

use crate::defaults::{
    ACTIONS_COLUMN, DEFAULT_CREATE_LABEL, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS,
    DEFAULT_SEARCH_DEBOUNCE, DEFAULT_SEARCH_PLACEHOLDER,
};
use crate::domain::entities::column::{ColumnDef, RowAction};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("duplicate column key `{0}`")]
    DuplicateColumn(String),
    #[error("duplicate action key `{0}`")]
    DuplicateAction(String),
    #[error("column key `{0}` is reserved for row actions")]
    ReservedColumnKey(String),
}

/// Declarative grid configuration.
///
/// Treated as a value: callers replace it wholesale whenever their state changes and the
/// grid never writes back into it. The server-side fields (`total_items`, `current_page`,
/// `default_page_size`) are authoritative over the grid's local pagination mirror when
/// `server_side_pagination` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub columns: Vec<ColumnDef>,
    pub actions: Vec<RowAction>,
    pub search_enabled: bool,
    pub search_placeholder: Option<String>,
    pub pagination_enabled: bool,
    pub page_size_options: Vec<usize>,
    pub default_page_size: Option<usize>,
    pub create_button_enabled: bool,
    pub create_button_label: Option<String>,
    pub table_min_width: Option<String>,
    pub max_height: Option<String>,
    pub total_items: Option<usize>,
    pub current_page: Option<usize>,
    pub server_side_pagination: bool,
    pub server_side_search: bool,
    pub search_debounce: Option<Duration>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            actions: Vec::new(),
            search_enabled: false,
            search_placeholder: None,
            pagination_enabled: true,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            default_page_size: None,
            create_button_enabled: false,
            create_button_label: None,
            table_min_width: None,
            max_height: None,
            total_items: None,
            current_page: None,
            server_side_pagination: false,
            server_side_search: false,
            search_debounce: None,
        }
    }
}

impl GridConfig {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut column_keys = HashSet::new();
        for column in &self.columns {
            if column.key == ACTIONS_COLUMN && !self.actions.is_empty() {
                return Err(ConfigError::ReservedColumnKey(column.key.clone()));
            }
            if !column_keys.insert(column.key.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.key.clone()));
            }
        }

        let mut action_keys = HashSet::new();
        for action in &self.actions {
            if !action_keys.insert(action.key.as_str()) {
                return Err(ConfigError::DuplicateAction(action.key.clone()));
            }
        }

        Ok(())
    }

    /// Configured default page size; zero or absent falls back to the built-in default.
    pub fn effective_page_size(&self) -> usize {
        self.default_page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn debounce_window(&self) -> Duration {
        self.search_debounce.unwrap_or(DEFAULT_SEARCH_DEBOUNCE)
    }

    pub fn placeholder(&self) -> &str {
        self.search_placeholder
            .as_deref()
            .unwrap_or(DEFAULT_SEARCH_PLACEHOLDER)
    }

    pub fn create_label(&self) -> &str {
        self.create_button_label
            .as_deref()
            .unwrap_or(DEFAULT_CREATE_LABEL)
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.key == key)
    }

    /// Copy with the server-authoritative pagination fields overridden.
    pub fn with_server_state(&self, total_items: usize, current_page: usize, page_size: usize) -> Self {
        Self {
            total_items: Some(total_items),
            current_page: Some(current_page),
            default_page_size: Some(page_size),
            ..self.clone()
        }
    }
}
