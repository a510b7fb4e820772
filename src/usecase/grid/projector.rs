use crate::defaults::ACTIONS_COLUMN;
use crate::domain::entities::column::{ColumnDef, ColumnKind};
use crate::domain::entities::config::GridConfig;
use crate::domain::entities::page::SortDirection;
use crate::domain::entities::row::{CellValue, Row};
use crate::usecase::grid::format::{format_currency_cell, format_date_cell, format_short_date};
use crate::usecase::grid::sort::SortState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    pub style: String,
    pub class: String,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub key: String,
    pub text: String,
    pub badge_class: Option<String>,
    pub style: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub color: Option<String>,
}

/// One displayed row. `index` points into the row set the grid currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub cells: Vec<CellView>,
    pub actions: Vec<ActionView>,
}

pub fn displayed_columns(config: &GridConfig) -> Vec<String> {
    let mut keys: Vec<String> = config.columns.iter().map(|col| col.key.clone()).collect();
    if !config.actions.is_empty() {
        keys.push(ACTIONS_COLUMN.to_string());
    }
    keys
}

fn badge_key(value: &CellValue) -> String {
    value.to_plain_string().to_lowercase()
}

pub fn badge_class(column: &ColumnDef, value: &CellValue) -> String {
    let ColumnKind::Badge(styles) = &column.kind else {
        return String::new();
    };
    styles
        .get(&badge_key(value))
        .map(|style| style.class.clone())
        .unwrap_or_default()
}

pub fn badge_label(column: &ColumnDef, value: &CellValue) -> String {
    let raw = value.to_plain_string();
    let ColumnKind::Badge(styles) = &column.kind else {
        return raw;
    };
    styles
        .get(&raw.to_lowercase())
        .and_then(|style| style.label.clone())
        .unwrap_or(raw)
}

pub fn format_cell_value(column: &ColumnDef, value: &CellValue) -> String {
    if value.is_null() {
        return String::new();
    }

    match &column.kind {
        ColumnKind::Text => value.to_plain_string(),
        ColumnKind::Date => format_date_cell(value),
        ColumnKind::Currency => format_currency_cell(value),
        ColumnKind::Badge(_) => badge_label(column, value),
        ColumnKind::Custom(Some(formatter)) => formatter(value),
        ColumnKind::Custom(None) => value.to_plain_string(),
    }
}

/// Text a row contributes to the local search haystack for one column.
pub fn search_text(value: &CellValue) -> String {
    match value {
        CellValue::Date(date) => format_short_date(date),
        other => other.to_plain_string(),
    }
}

pub fn column_style(column: &ColumnDef) -> String {
    let mut style = String::new();
    if let Some(width) = &column.width {
        style.push_str(&format!("width: {width}; max-width: {width};"));
    }
    if let Some(min_width) = &column.min_width {
        if !style.is_empty() {
            style.push(' ');
        }
        style.push_str(&format!("min-width: {min_width};"));
    }
    style
}

pub fn column_class(column: &ColumnDef) -> String {
    if column.sticky {
        "sticky-column".to_string()
    } else {
        String::new()
    }
}

pub fn table_style(config: &GridConfig) -> String {
    let mut parts = Vec::new();
    if let Some(min_width) = &config.table_min_width {
        parts.push(format!("min-width: {min_width};"));
    }
    parts.join(" ")
}

pub fn container_style(config: &GridConfig) -> String {
    let mut style = "overflow: auto;".to_string();
    if let Some(max_height) = &config.max_height {
        style.push_str(&format!(" max-height: {max_height};"));
    }
    style
}

pub fn header_views(config: &GridConfig, sort: Option<&SortState>) -> Vec<HeaderView> {
    config
        .columns
        .iter()
        .map(|column| HeaderView {
            key: column.key.clone(),
            label: column.label.clone(),
            style: column_style(column),
            class: column_class(column),
            sortable: column.sortable,
            sort: sort
                .filter(|state| state.column == column.key)
                .map(|state| state.direction),
        })
        .collect()
}

pub fn project_row(config: &GridConfig, row: &Row, index: usize) -> RowView {
    let cells = config
        .columns
        .iter()
        .map(|column| {
            let value = row.get(&column.key);
            let badge_class = match column.kind {
                ColumnKind::Badge(_) if !value.is_null() => Some(badge_class(column, value)),
                _ => None,
            };
            CellView {
                key: column.key.clone(),
                text: format_cell_value(column, value),
                badge_class,
                style: column_style(column),
                class: column_class(column),
            }
        })
        .collect();

    let actions = config
        .actions
        .iter()
        .filter(|action| action.is_visible(row))
        .map(|action| ActionView {
            key: action.key.clone(),
            label: action.label.clone(),
            icon: action.icon.clone(),
            color: action.color.clone(),
        })
        .collect();

    RowView {
        index,
        cells,
        actions,
    }
}
