use std::sync::Arc;

use dioxus::prelude::*;
use tracing::{debug, warn};

use crate::domain::entities::column::{BadgeStyle, ColumnDef, ColumnKind, RowAction};
use crate::domain::entities::config::GridConfig;
use crate::domain::entities::row::{CellValue, Row};
use crate::infra::memory::source::MemorySource;
use crate::infra::seed::demo_rows;
use crate::ui::components::DataGrid;
use crate::usecase::grid::format::format_number_with_commas;
use crate::usecase::grid::{ActionClick, PageChange};
use crate::usecase::ports::source::RowSource;

const DIRECTORY_SIZE: usize = 24;

fn tenure_years(value: &CellValue) -> String {
    match value.as_f64() {
        Some(years) => format!("{} yrs", format_number_with_commas(years, 1)),
        None => value.to_plain_string(),
    }
}

/// Client-mode configuration: the grid filters and slices everything it is handed.
pub fn directory_grid_config() -> GridConfig {
    let columns = vec![
        ColumnDef::new("name", "Name").min_width("160px").sortable().sticky(),
        ColumnDef::new("department", "Department").sortable(),
        ColumnDef::new("role", "Role"),
        ColumnDef::new("status", "Status")
            .sortable()
            .badge("active", BadgeStyle::new("status-active"))
            .badge("inactive", BadgeStyle::new("status-inactive")),
        ColumnDef::new("joinDate", "Joined").date().sortable(),
        ColumnDef::new("tenure", "Tenure")
            .kind(ColumnKind::custom(tenure_years))
            .not_searchable(),
        ColumnDef::new("salary", "Salary").currency().sortable(),
    ];
    let actions = vec![RowAction::new("remove", "Remove", "✕")
        .color("#f44336")
        .visible_when(|row| row.get("status").as_str() == Some("inactive"))];

    GridConfig {
        columns,
        actions,
        search_enabled: true,
        search_placeholder: Some("Filter the directory...".to_string()),
        default_page_size: Some(10),
        create_button_enabled: true,
        create_button_label: Some("Add hire".to_string()),
        max_height: Some("480px".to_string()),
        ..GridConfig::default()
    }
}

fn with_tenure(mut row: Row) -> Row {
    let tenure = match row.get("joinDate") {
        CellValue::Date(joined) => {
            let days = (chrono::Local::now().naive_local() - *joined).num_days();
            CellValue::Number((days.max(0) as f64 / 365.25 * 10.0).round() / 10.0)
        }
        _ => CellValue::Null,
    };
    row.set("tenure", tenure);
    row
}

fn new_hire(count: usize) -> Row {
    let number = count + 1;
    Row::new()
        .with("name", format!("New Hire {number}"))
        .with("email", format!("new.hire{number}@example.com"))
        .with("department", "Sales")
        .with("role", "Account Executive")
        .with("status", "active")
        .with("joinDate", chrono::Local::now().naive_local())
        .with("salary", 48_000.0)
}

fn load_directory(source: &MemorySource) -> Vec<Row> {
    match source.snapshot() {
        Ok(rows) => rows.into_iter().map(with_tenure).collect(),
        Err(err) => {
            warn!(error = %err, "failed to read the in-memory directory");
            Vec::new()
        }
    }
}

#[component]
pub fn DirectoryPage() -> Element {
    let source = use_hook(|| Arc::new(MemorySource::new(demo_rows(DIRECTORY_SIZE))));
    let config = use_hook(directory_grid_config);
    let initial = source.clone();
    let mut rows = use_signal(move || load_directory(&initial));
    let mut status = use_signal(|| "Client-side filtering and paging".to_string());

    let source_for_action = source.clone();
    let on_action = move |click: ActionClick| {
        let name = click.row.get("name").to_plain_string();
        let Some(id) = click.row.id() else {
            return;
        };
        match source_for_action.delete_row(id) {
            Ok(()) => {
                rows.set(load_directory(&source_for_action));
                status.set(format!("Removed {name}"));
            }
            Err(err) => status.set(format!("Remove failed: {err}")),
        }
    };
    let source_for_create = source.clone();
    let on_create = move |_: ()| {
        let hire = new_hire(source_for_create.len());
        match source_for_create.create_row(hire) {
            Ok(id) => {
                rows.set(load_directory(&source_for_create));
                status.set(format!("Added employee #{id}"));
            }
            Err(err) => status.set(format!("Add failed: {err}")),
        }
    };
    let on_page = move |change: PageChange| {
        debug!(?change, "directory page changed");
        status.set(format!(
            "Page {} ({} per page, {} matches)",
            change.page_index + 1,
            change.page_size,
            change.length
        ));
    };
    let on_row = move |row: Row| {
        status.set(format!("Selected {}", row.get("name").to_plain_string()));
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 12px; padding: 16px;",
            h2 { style: "margin: 0;", "Directory" }
            DataGrid {
                config: config,
                rows: rows(),
                on_action: on_action,
                on_create: on_create,
                on_row: on_row,
                on_page: on_page,
                on_search: move |_: String| {},
            }
            div { style: "color: #555; font-size: 13px;", "{status}" }
        }
    }
}
