use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::{debug, error, info};

use crate::defaults::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, DEFAULT_SEARCH_DEBOUNCE};
use crate::domain::entities::column::{BadgeStyle, ColumnDef, RowAction};
use crate::domain::entities::config::GridConfig;
use crate::domain::entities::row::Row;
use crate::infra::seed::EmployeeRecord;
use crate::infra::sqlite::repo::SqliteSource;
use crate::ui::components::DataGrid;
use crate::ui::state::app_state::AppState;
use crate::usecase::grid::{ActionClick, PageChange};
use crate::usecase::services::employee_service::EmployeeService;

const SEED_EMPLOYEES: usize = 37;

/// Server-mode grid configuration for the employee directory.
pub fn employee_grid_config() -> GridConfig {
    let columns = vec![
        ColumnDef::new("id", "ID").width("60px").min_width("60px").sortable().sticky(),
        ColumnDef::new("name", "Name").width("150px").min_width("150px").sortable(),
        ColumnDef::new("email", "Email").width("200px").min_width("200px").sortable(),
        ColumnDef::new("department", "Department")
            .width("120px")
            .min_width("120px")
            .sortable(),
        ColumnDef::new("role", "Role").width("150px").min_width("150px").sortable(),
        ColumnDef::new("status", "Status")
            .width("100px")
            .min_width("100px")
            .sortable()
            .badge("active", BadgeStyle::new("status-active").label("ACTIVE"))
            .badge("inactive", BadgeStyle::new("status-inactive").label("INACTIVE")),
        ColumnDef::new("joinDate", "Join Date")
            .date()
            .width("120px")
            .min_width("120px")
            .sortable(),
        ColumnDef::new("salary", "Salary")
            .currency()
            .width("120px")
            .min_width("120px")
            .sortable(),
    ];
    let actions = vec![
        RowAction::new("view", "View", "👁").color("#2196f3"),
        RowAction::new("edit", "Edit", "✎").color("#ff9800"),
        RowAction::new("delete", "Delete", "🗑").color("#f44336"),
    ];

    GridConfig {
        columns,
        actions,
        search_enabled: true,
        search_placeholder: Some("Search by name, email, department...".to_string()),
        pagination_enabled: true,
        page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        default_page_size: Some(DEFAULT_PAGE_SIZE),
        create_button_enabled: true,
        create_button_label: Some("Create New".to_string()),
        table_min_width: Some("1200px".to_string()),
        max_height: Some("600px".to_string()),
        total_items: Some(0),
        current_page: Some(0),
        server_side_pagination: true,
        server_side_search: true,
        search_debounce: Some(DEFAULT_SEARCH_DEBOUNCE),
    }
}

fn row_label(row: &Row) -> String {
    let name = row.get("name").to_plain_string();
    if name.is_empty() {
        row.id().map(|id| format!("#{id}")).unwrap_or_default()
    } else {
        name
    }
}

fn new_employee(total: usize) -> EmployeeRecord {
    let number = total + 1;
    EmployeeRecord {
        name: format!("New Employee {number}"),
        email: format!("new.employee{number}@example.com"),
        department: "Engineering".to_string(),
        role: "Software Engineer".to_string(),
        status: "active".to_string(),
        join_date: chrono::Local::now().date_naive(),
        salary: 50_000.0,
    }
}

/// Pulls the service's current page into the page signals.
fn publish(service: &EmployeeService, mut state: AppState) {
    state.rows.set(service.rows().to_vec());
    state.total.set(service.total());
    state.page.set(service.filters().page);
    state.page_size.set(service.filters().page_size);
    state.keyword.set(service.filters().search.clone());
    state.error.set(service.error().map(str::to_string));
}

fn load(
    mut service: CopyValue<EmployeeService>,
    mut state: AppState,
    page: Option<usize>,
    page_size: Option<usize>,
    search: Option<String>,
) {
    state.loading.set(true);
    let result = service.write().load(page, page_size, search);
    publish(&service.read(), state);
    match result {
        Ok(loaded) => {
            state.status.set(format!(
                "Page {} of {} ({} employees)",
                loaded.page + 1,
                service.read().total_pages().max(1),
                loaded.total
            ));
        }
        Err(err) => {
            state.status.set(format!("Load failed: {err}"));
        }
    }
    state.loading.set(false);
}

fn confirm_delete(label: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Delete employee")
        .set_description(format!("Are you sure you want to delete {label}?"))
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

#[component]
pub fn EmployeesPage(db_path: PathBuf) -> Element {
    let opened = use_hook(|| {
        SqliteSource::open(db_path.clone())
            .and_then(|source| {
                source.seed_if_empty(SEED_EMPLOYEES)?;
                Ok(source)
            })
            .map(|source| CopyValue::new(EmployeeService::new(Arc::new(source))))
            .map_err(|err| {
                error!(error = %err, db = %db_path.display(), "failed to open employee database");
                format!("{err:#}")
            })
    });
    let state = AppState::new();

    let service = match opened {
        Ok(service) => service,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to open the employee database: {err}" }
                }
            };
        }
    };

    use_effect(move || load(service, state, Some(0), Some(DEFAULT_PAGE_SIZE), Some(String::new())));

    let AppState {
        rows,
        total,
        page,
        page_size,
        loading,
        error,
        mut status,
        ..
    } = state;

    let config = employee_grid_config().with_server_state(total(), page(), page_size());

    let on_page = move |change: PageChange| {
        debug!(?change, "pagination changed");
        load(service, state, Some(change.page_index), Some(change.page_size), None);
    };
    let on_search = move |term: String| {
        debug!(search = %term, "search changed");
        load(service, state, Some(0), None, Some(term));
    };
    let on_action = move |click: ActionClick| {
        let label = row_label(&click.row);
        match click.action.as_str() {
            "view" => status.set(format!("Viewing {label}")),
            "edit" => status.set(format!("Editing {label}")),
            "delete" => {
                let Some(id) = click.row.id() else {
                    status.set(format!("{label} has no id"));
                    return;
                };
                if !confirm_delete(&label) {
                    return;
                }
                let mut service = service;
                let result = service.write().delete(id);
                publish(&service.read(), state);
                match result {
                    Ok(()) => status.set(format!("Deleted {label}")),
                    Err(err) => status.set(format!("Delete failed: {err}")),
                }
            }
            other => debug!(action = other, "unhandled row action"),
        }
    };
    let on_create = move |_: ()| {
        let record = new_employee(total());
        let mut service = service;
        let result = service.write().create(record.to_row(0));
        publish(&service.read(), state);
        match result {
            Ok(id) => {
                info!(id = id.0, "created employee from grid");
                status.set(format!("Created {}", record.name));
            }
            Err(err) => status.set(format!("Create failed: {err}")),
        }
    };
    let on_row = move |row: Row| status.set(format!("Selected {}", row_label(&row)));

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 12px; padding: 16px;",
            h2 { style: "margin: 0;", "Employees" }
            if let Some(message) = error() {
                div {
                    style: "display: flex; align-items: center; gap: 12px; padding: 8px 12px; background: #fdecec; color: #a12622; border-radius: 6px;",
                    span { "{message}" }
                    button {
                        onclick: move |_| {
                            load(service, state, None, None, None);
                        },
                        "Retry"
                    }
                }
            }
            DataGrid {
                config: config,
                rows: rows(),
                loading: loading(),
                on_action: on_action,
                on_create: on_create,
                on_row: on_row,
                on_page: on_page,
                on_search: on_search,
            }
            div { style: "color: #555; font-size: 13px;", "{status}" }
        }
    }
}
