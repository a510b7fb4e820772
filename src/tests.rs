use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::defaults::ACTIONS_COLUMN;
use crate::domain::entities::column::{BadgeStyle, ColumnDef, ColumnKind, RowAction};
use crate::domain::entities::config::{ConfigError, GridConfig};
use crate::domain::entities::page::{PageQuery, PageResult, SortDirection};
use crate::domain::entities::row::{CellValue, Row, RowId};
use crate::infra::import::csv::import_employees_csv;
use crate::infra::memory::source::MemorySource;
use crate::infra::seed::demo_rows;
use crate::infra::sqlite::queries::count_employees;
use crate::infra::sqlite::repo::SqliteSource;
use crate::infra::sqlite::schema::init_db;
use crate::usecase::grid::projector::{badge_class, badge_label, format_cell_value, project_row};
use crate::usecase::grid::sort::compare_cells;
use crate::usecase::grid::{
    ActionClick, EventLog, GridController, GridEvent, PageChange, PaginationStrategy, SortState,
};
use crate::usecase::ports::source::{RowSource, SourceError};
use crate::usecase::services::employee_service::{EmployeeService, LOAD_FAILED_MESSAGE};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("dashgrid-{prefix}-{nanos}"))
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn person(id: i64, name: &str, department: &str, status: &str, salary: f64) -> Row {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    Row::new()
        .with("id", id)
        .with("name", name)
        .with("email", email)
        .with("department", department)
        .with("status", status)
        .with("joinDate", date(2023, 1, 15))
        .with("salary", salary)
}

/// Twelve rows; only the first mentions "john" anywhere.
fn staff() -> Vec<Row> {
    let mut rows = vec![person(1, "John Doe", "Engineering", "active", 1234.56)];
    for id in 2..=12 {
        rows.push(person(
            id,
            &format!("Person {id}"),
            if id % 2 == 0 { "Sales" } else { "Marketing" },
            if id % 3 == 0 { "inactive" } else { "active" },
            40_000.0 + id as f64 * 1_000.0,
        ));
    }
    rows
}

fn staff_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("id", "ID").sortable(),
        ColumnDef::new("name", "Name").sortable(),
        ColumnDef::new("email", "Email"),
        ColumnDef::new("department", "Department").sortable(),
        ColumnDef::new("status", "Status")
            .badge("active", BadgeStyle::new("status-active").label("ACTIVE"))
            .badge("inactive", BadgeStyle::new("status-inactive").label("INACTIVE")),
        ColumnDef::new("joinDate", "Join Date").date(),
        ColumnDef::new("salary", "Salary").currency().sortable(),
    ]
}

fn client_config() -> GridConfig {
    GridConfig {
        actions: vec![
            RowAction::new("view", "View", "visibility"),
            RowAction::new("delete", "Delete", "delete").color("#f44336"),
        ],
        search_enabled: true,
        create_button_enabled: true,
        ..GridConfig::new(staff_columns())
    }
}

fn server_config(total_items: usize) -> GridConfig {
    GridConfig {
        default_page_size: Some(5),
        total_items: Some(total_items),
        current_page: Some(0),
        server_side_pagination: true,
        server_side_search: true,
        search_debounce: Some(Duration::from_millis(300)),
        ..client_config()
    }
}

fn recorded(grid: &mut GridController) -> EventLog {
    let log = EventLog::new();
    log.attach(grid.events_mut());
    log
}

fn ids(rows: &[&Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.id())
        .map(i64::from)
        .collect()
}

#[test]
fn actions_column_is_appended_only_when_actions_exist() {
    let with_actions = GridController::new(client_config(), Vec::new());
    let columns = with_actions.displayed_columns();
    assert_eq!(columns.last().map(String::as_str), Some(ACTIONS_COLUMN));
    assert_eq!(columns.len(), staff_columns().len() + 1);

    let without_actions = GridController::new(GridConfig::new(staff_columns()), Vec::new());
    assert!(!without_actions
        .displayed_columns()
        .iter()
        .any(|key| key == ACTIONS_COLUMN));
    assert!(!without_actions.view().has_actions);
}

#[test]
fn currency_cells_render_usd_layout() {
    let column = ColumnDef::new("salary", "Salary").currency();
    assert_eq!(
        format_cell_value(&column, &CellValue::Number(1234.56)),
        "$1,234.56"
    );
    assert_eq!(format_cell_value(&column, &CellValue::Number(0.0)), "$0.00");
    assert_eq!(format_cell_value(&column, &CellValue::Null), "");
}

#[test]
fn badge_lookup_is_case_insensitive_and_falls_back_to_raw_value() {
    let column = ColumnDef::new("status", "Status")
        .badge("active", BadgeStyle::new("status-active").label("ACTIVE"));

    let active = CellValue::from("ACTIVE");
    assert_eq!(badge_label(&column, &active), "ACTIVE");
    assert_eq!(badge_class(&column, &active), "status-active");

    let unknown = CellValue::from("unknown");
    assert_eq!(badge_label(&column, &unknown), "unknown");
    assert_eq!(badge_class(&column, &unknown), "");
}

#[test]
fn custom_formatter_and_date_cells_project_through_row_view() {
    let config = GridConfig::new(vec![
        ColumnDef::new("joinDate", "Joined").date(),
        ColumnDef::new("name", "Name").format_with(|value| value.to_plain_string().to_uppercase()),
        ColumnDef::new("note", "Note").kind(ColumnKind::Custom(None)),
    ]);
    let row = Row::new()
        .with("joinDate", date(2023, 1, 15))
        .with("name", "John Doe");

    let view = project_row(&config, &row, 7);

    assert_eq!(view.index, 7);
    let texts: Vec<&str> = view.cells.iter().map(|cell| cell.text.as_str()).collect();
    assert_eq!(texts, vec!["1/15/2023", "JOHN DOE", ""]);
    assert!(view.cells.iter().all(|cell| cell.badge_class.is_none()));
}

#[test]
fn action_visibility_predicate_filters_per_row() {
    let config = GridConfig {
        actions: vec![
            RowAction::new("view", "View", "visibility"),
            RowAction::new("reactivate", "Reactivate", "undo")
                .visible_when(|row| row.get("status").as_str() == Some("inactive")),
        ],
        ..GridConfig::new(staff_columns())
    };
    let active = person(1, "John Doe", "Engineering", "active", 1.0);
    let inactive = person(2, "Jane Roe", "Engineering", "inactive", 1.0);

    let keys = |row: &Row| {
        project_row(&config, row, 0)
            .actions
            .into_iter()
            .map(|action| action.key)
            .collect::<Vec<_>>()
    };

    assert_eq!(keys(&active), vec!["view"]);
    assert_eq!(keys(&inactive), vec!["view", "reactivate"]);
}

#[test]
fn client_search_filters_rows_and_returns_to_first_page() {
    let mut grid = GridController::new(client_config(), staff());
    let log = recorded(&mut grid);

    grid.go_to_page(1);
    assert_eq!(grid.page_index(), 1);
    log.drain();

    let deadline = grid.search_input("  JOHN ", Instant::now());

    assert!(deadline.is_none(), "client search should apply immediately");
    assert_eq!(grid.query(), "  JOHN ");
    assert_eq!(grid.page_index(), 0);
    assert_eq!(ids(&grid.page_rows()), vec![1]);
    assert_eq!(grid.total_count(), 1);
    assert_eq!(
        log.drain(),
        vec![GridEvent::PaginationChanged(PageChange {
            page_index: 0,
            page_size: 5,
            length: 1,
        })]
    );
}

#[test]
fn client_search_on_first_page_emits_nothing() {
    let mut grid = GridController::new(client_config(), staff());
    let log = recorded(&mut grid);

    grid.search_input("sales", Instant::now());

    assert!(log.is_empty());
    assert_eq!(grid.total_count(), 6);
}

#[test]
fn whitespace_query_means_no_filter_in_client_mode() {
    let mut grid = GridController::new(client_config(), staff());

    grid.search_input("   ", Instant::now());

    assert_eq!(grid.total_count(), 12);
}

#[test]
fn client_pagination_shows_partial_last_page() {
    let mut grid = GridController::new(client_config(), staff());
    let log = recorded(&mut grid);

    grid.last_page();

    let view = grid.view();
    assert_eq!(grid.page_index(), 2);
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.page.total_count, 12);
    assert_eq!(view.page.page_count, 3);
    assert_eq!(view.page.range_label, "11 – 12 of 12");
    assert!(!view.page.has_next);
    assert!(view.page.has_previous);
    assert_eq!(
        log.drain(),
        vec![GridEvent::PaginationChanged(PageChange {
            page_index: 2,
            page_size: 5,
            length: 12,
        })]
    );

    grid.next_page();
    assert!(log.is_empty(), "next past the end is a no-op");
}

#[test]
fn page_size_change_returns_to_first_page() {
    let mut grid = GridController::new(client_config(), staff());
    let log = recorded(&mut grid);
    grid.go_to_page(2);
    log.drain();

    grid.set_page_size(10);

    assert_eq!(grid.page_index(), 0);
    assert_eq!(grid.page_rows().len(), 10);
    assert_eq!(
        log.drain(),
        vec![GridEvent::PaginationChanged(PageChange {
            page_index: 0,
            page_size: 10,
            length: 12,
        })]
    );
}

#[test]
fn shrinking_rows_clamps_stranded_client_page() {
    let mut grid = GridController::new(client_config(), staff());
    grid.go_to_page(2);

    grid.set_rows(staff().into_iter().take(3).collect());

    assert_eq!(grid.page_index(), 0);
    assert_eq!(grid.page_rows().len(), 3);
}

#[test]
fn server_mode_trusts_configuration_and_skips_slicing() {
    let config = server_config(42).with_server_state(42, 3, 10);
    let rows: Vec<Row> = staff().into_iter().take(10).collect();
    let grid = GridController::new(config, rows);

    assert_eq!(
        grid.pagination().strategy(),
        PaginationStrategy::Server { total_items: 42 }
    );
    assert_eq!(grid.page_index(), 3);
    assert_eq!(grid.page_size(), 10);
    assert_eq!(grid.total_count(), 42);
    assert_eq!(grid.page_rows().len(), 10);
    assert_eq!(grid.view().page.range_label, "31 – 40 of 42");
}

#[test]
fn server_search_burst_emits_exactly_once() {
    let mut grid = GridController::new(server_config(40), Vec::new());
    let log = recorded(&mut grid);
    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);

    grid.search_input("j", at(0));
    grid.search_input("jo", at(100));
    grid.search_input("joh", at(200));
    let deadline = grid.search_input("john", at(250));

    assert_eq!(deadline, Some(at(550)));
    assert_eq!(grid.next_deadline(), Some(at(550)));
    assert!(!grid.tick(at(400)));
    assert!(!grid.tick(at(549)));
    assert!(grid.tick(at(550)));
    assert!(!grid.tick(at(900)), "nothing left to release");

    assert_eq!(log.drain(), vec![GridEvent::SearchChanged("john".to_string())]);
}

#[test]
fn server_search_suppresses_repeated_term() {
    let mut grid = GridController::new(server_config(40), Vec::new());
    let log = recorded(&mut grid);
    let start = Instant::now();

    grid.search_input("john", start);
    grid.tick(start + Duration::from_millis(300));
    grid.search_input("john ", start + Duration::from_millis(400));
    grid.tick(start + Duration::from_millis(800));

    assert_eq!(log.drain(), vec![GridEvent::SearchChanged("john".to_string())]);
}

#[test]
fn server_search_emits_empty_term_to_clear_remote_filter() {
    let mut grid = GridController::new(server_config(40), Vec::new());
    let log = recorded(&mut grid);
    let start = Instant::now();

    grid.search_input("john", start);
    grid.tick(start + Duration::from_millis(300));
    grid.search_input("   ", start + Duration::from_millis(400));
    grid.tick(start + Duration::from_millis(700));

    assert_eq!(
        log.drain(),
        vec![
            GridEvent::SearchChanged("john".to_string()),
            GridEvent::SearchChanged(String::new()),
        ]
    );
}

#[test]
fn server_clear_resets_query_page_and_page_size() {
    let mut grid = GridController::new(server_config(40), Vec::new());
    let log = recorded(&mut grid);
    let start = Instant::now();

    grid.set_page_size(20);
    grid.go_to_page(1);
    grid.search_input("pending", start);
    log.drain();

    grid.clear_search();

    assert_eq!(grid.query(), "");
    assert_eq!(grid.page_index(), 0);
    assert_eq!(grid.page_size(), 5);
    assert_eq!(log.drain(), vec![GridEvent::SearchChanged(String::new())]);
    assert!(
        !grid.tick(start + Duration::from_secs(1)),
        "pending term should be cancelled by clear"
    );
}

#[test]
fn client_clear_restores_rows_and_keeps_page_size() {
    let mut grid = GridController::new(client_config(), staff());
    let log = recorded(&mut grid);
    grid.set_page_size(10);
    grid.search_input("john", Instant::now());
    log.drain();

    grid.clear_search();

    assert_eq!(grid.query(), "");
    assert_eq!(grid.total_count(), 12);
    assert_eq!(grid.page_size(), 10);
    assert!(log.is_empty());
}

#[test]
fn resupplying_identical_inputs_is_idempotent() {
    let config = client_config();
    let rows = staff();
    let mut grid = GridController::new(config.clone(), rows.clone());
    let log = recorded(&mut grid);
    grid.go_to_page(1);
    grid.toggle_sort("salary");
    log.drain();
    let before = grid.view();

    grid.set_config(config.clone());
    grid.set_rows(rows.clone());
    grid.update(config, rows);

    assert_eq!(grid.view(), before);
    assert!(log.is_empty());
}

#[test]
fn resupplying_client_config_keeps_user_page_size() {
    let config = GridConfig {
        default_page_size: Some(5),
        ..client_config()
    };
    let mut grid = GridController::new(config.clone(), staff());
    let log = recorded(&mut grid);
    grid.set_page_size(10);
    grid.go_to_page(1);
    log.drain();
    let before = grid.view();
    assert_eq!(before.page.page_size, 10);
    assert_eq!(before.page.page_index, 1);

    grid.set_config(config.clone());
    grid.update(config, staff());

    assert_eq!(grid.view(), before);
    assert!(log.is_empty());
}

#[test]
fn server_page_controls_emit_changes_without_slicing() {
    let rows: Vec<Row> = staff().into_iter().take(5).collect();
    let mut grid = GridController::new(server_config(40), rows.clone());
    let log = recorded(&mut grid);

    grid.next_page();
    grid.set_page_size(20);

    assert_eq!(
        log.drain(),
        vec![
            GridEvent::PaginationChanged(PageChange {
                page_index: 1,
                page_size: 5,
                length: 40,
            }),
            GridEvent::PaginationChanged(PageChange {
                page_index: 0,
                page_size: 20,
                length: 40,
            }),
        ]
    );
    assert_eq!(ids(&grid.page_rows()), vec![1, 2, 3, 4, 5]);
    let view = grid.view();
    assert_eq!(
        view.rows.iter().map(|row| row.index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
    assert_eq!(grid.rows(), rows.as_slice());
}

#[test]
fn out_of_range_server_page_still_renders() {
    let config = server_config(40).with_server_state(40, usize::MAX / 2, 5);
    let grid = GridController::new(config, Vec::new());

    let page = grid.view().page;
    assert_eq!(page.total_count, 40);
    assert!(!page.has_next);
    assert!(page.range_label.ends_with("of 40"));
}

#[test]
fn configuration_after_empty_start_renders_empty_body() {
    let mut grid = GridController::default();
    assert!(grid.view().headers.is_empty());

    grid.set_config(client_config());

    let view = grid.view();
    assert_eq!(view.headers.len(), staff_columns().len());
    assert!(view.rows.is_empty());
    assert_eq!(view.page.range_label, "0 of 0");
}

#[test]
fn invalid_configuration_renders_inert_grid() {
    let mut duplicate = client_config();
    duplicate.columns.push(ColumnDef::new("name", "Again"));
    assert_eq!(
        duplicate.validate(),
        Err(ConfigError::DuplicateColumn("name".to_string()))
    );

    let mut grid = GridController::new(duplicate, staff());
    let log = recorded(&mut grid);
    let view = grid.view();

    assert!(view.displayed_columns.is_empty());
    assert!(view.headers.is_empty());
    assert!(!view.search_enabled);
    assert!(view.create_label.is_none());
    grid.toggle_sort("name");
    assert!(grid.sort().is_none());
    assert!(log.is_empty());
}

#[test]
fn reserved_and_duplicate_action_keys_are_rejected() {
    let reserved = GridConfig {
        actions: vec![RowAction::new("view", "View", "visibility")],
        ..GridConfig::new(vec![ColumnDef::new(ACTIONS_COLUMN, "Actions")])
    };
    assert_eq!(
        reserved.validate(),
        Err(ConfigError::ReservedColumnKey(ACTIONS_COLUMN.to_string()))
    );

    let plain = GridConfig::new(vec![ColumnDef::new(ACTIONS_COLUMN, "Actions")]);
    assert_eq!(plain.validate(), Ok(()));

    let duplicate = GridConfig {
        actions: vec![
            RowAction::new("view", "View", "visibility"),
            RowAction::new("view", "Open", "open"),
        ],
        ..GridConfig::new(staff_columns())
    };
    assert_eq!(
        duplicate.validate(),
        Err(ConfigError::DuplicateAction("view".to_string()))
    );
}

#[test]
fn dispose_suppresses_every_later_emission() {
    let mut grid = GridController::new(server_config(40), staff());
    let log = recorded(&mut grid);
    let start = Instant::now();
    grid.search_input("john", start);

    grid.dispose();
    grid.click_create();
    grid.click_row_at(0);
    grid.click_action_at("view", 0);
    grid.next_page();
    grid.clear_search();

    assert!(grid.is_disposed());
    assert!(!grid.tick(start + Duration::from_secs(1)));
    assert!(log.is_empty());
    assert_eq!(grid.events_mut().subscriber_count(), 0);
}

#[test]
fn clicks_emit_action_row_and_create_events() {
    let rows = staff();
    let mut grid = GridController::new(client_config(), rows.clone());
    let log = recorded(&mut grid);

    grid.click_action_at("delete", 0);
    grid.click_row_at(1);
    grid.click_create();
    grid.click_row_at(99);

    assert_eq!(
        log.drain(),
        vec![
            GridEvent::ActionClicked(ActionClick {
                action: "delete".to_string(),
                row: rows[0].clone(),
            }),
            GridEvent::RowClicked(rows[1].clone()),
            GridEvent::CreateClicked,
        ]
    );
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let mut grid = GridController::new(client_config(), staff());
    let kept = recorded(&mut grid);
    let dropped = EventLog::new();
    let id = dropped.attach(grid.events_mut());

    assert!(grid.unsubscribe(id));
    grid.click_create();

    assert_eq!(kept.len(), 1);
    assert!(dropped.is_empty());
}

#[test]
fn header_toggle_cycles_sort_and_ignores_unsortable_columns() {
    let mut grid = GridController::new(client_config(), staff());
    grid.set_page_size(20);
    let unsorted = ids(&grid.page_rows());

    grid.toggle_sort("salary");
    assert_eq!(
        grid.sort(),
        Some(&SortState {
            column: "salary".to_string(),
            direction: SortDirection::Asc,
        })
    );
    let ascending = ids(&grid.page_rows());
    assert_eq!(ascending.first(), Some(&1));
    assert_eq!(ascending.last(), Some(&12));

    grid.toggle_sort("salary");
    let descending = ids(&grid.page_rows());
    assert_eq!(descending.first(), Some(&12));
    assert_eq!(
        grid.view()
            .headers
            .iter()
            .find(|header| header.key == "salary")
            .and_then(|header| header.sort),
        Some(SortDirection::Desc)
    );

    grid.toggle_sort("salary");
    assert!(grid.sort().is_none());
    assert_eq!(ids(&grid.page_rows()), unsorted);

    grid.toggle_sort("email");
    assert!(grid.sort().is_none());
}

#[test]
fn cell_ordering_puts_nulls_first_and_ignores_text_case() {
    use std::cmp::Ordering as Cmp;

    assert_eq!(
        compare_cells(&CellValue::Null, &CellValue::Number(-5.0)),
        Cmp::Less
    );
    assert_eq!(
        compare_cells(&CellValue::from("apple"), &CellValue::from("Banana")),
        Cmp::Less
    );
    assert_eq!(
        compare_cells(&CellValue::Number(10.0), &CellValue::Number(9.5)),
        Cmp::Greater
    );
}

#[test]
fn loading_flag_is_reflected_in_view() {
    let mut grid = GridController::new(server_config(0), Vec::new());
    grid.set_loading(true);
    assert!(grid.view().loading);
    grid.set_loading(false);
    assert!(!grid.view().loading);
}

#[test]
fn page_size_options_include_the_active_size() {
    let config = server_config(100).with_server_state(100, 0, 25);
    let grid = GridController::new(config, Vec::new());

    assert_eq!(grid.view().page.page_size_options, vec![5, 10, 20, 25, 50]);
}

#[test]
fn memory_source_searches_sorts_and_pages() {
    let source = MemorySource::new(demo_rows(12));

    let page = source
        .load_page(PageQuery::new(0, 2).search("ENGINEERING"))
        .expect("search should succeed");
    assert_eq!(page.total, 3);
    assert_eq!(page.rows.len(), 2);

    let sorted = source
        .load_page(PageQuery::new(0, 12).sort("salary", SortDirection::Desc))
        .expect("sort should succeed");
    let salaries: Vec<f64> = sorted
        .rows
        .iter()
        .filter_map(|row| row.get("salary").as_f64())
        .collect();
    assert!(salaries.windows(2).all(|pair| pair[0] >= pair[1]));

    let past_end = source
        .load_page(PageQuery::new(5, 5))
        .expect("page past the end should be empty, not an error");
    assert!(past_end.rows.is_empty());
    assert_eq!(past_end.total, 12);

    assert!(matches!(
        source.load_page(PageQuery::new(0, 0)),
        Err(SourceError::Query(_))
    ));
}

#[test]
fn memory_source_creates_and_deletes_rows() {
    let source = MemorySource::new(demo_rows(3));

    let id = source
        .create_row(Row::new().with("name", "New Hire"))
        .expect("create should succeed");
    assert_eq!(id, RowId(4));
    assert_eq!(source.len(), 4);

    source.delete_row(RowId(2)).expect("delete should succeed");
    assert_eq!(source.len(), 3);
    assert_eq!(
        source.delete_row(RowId(2)),
        Err(SourceError::NotFound(RowId(2)))
    );
}

#[test]
fn init_db_creates_employee_table() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let result = init_db(&db_path);
    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'employee'",
            [],
            |row| row.get(0),
        )
        .expect("table count query should succeed");
    assert_eq!(table_count, 1, "employee table should exist");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn sqlite_source_pages_searches_and_sorts() {
    let temp_dir = unique_test_dir("sqlite-source");
    let db_path = temp_dir.join("app.sqlite");
    let source = SqliteSource::open(db_path.clone()).expect("should open source");

    assert_eq!(source.seed_if_empty(12).expect("seed should succeed"), 12);
    assert_eq!(source.seed_if_empty(12).expect("reseed should be a no-op"), 0);

    let second = source
        .load_page(PageQuery::new(1, 5))
        .expect("page query should succeed");
    assert_eq!(second.total, 12);
    assert_eq!(second.rows.len(), 5);
    assert_eq!(second.rows[0].id(), Some(RowId(6)));
    assert!(matches!(second.rows[0].get("joinDate"), CellValue::Date(_)));

    let last = source
        .load_page(PageQuery::new(2, 5))
        .expect("last page should load");
    assert_eq!(last.rows.len(), 2);

    let inactive = source
        .load_page(PageQuery::new(0, 10).search("inactive"))
        .expect("search should succeed");
    assert_eq!(inactive.total, 2);

    let by_salary = source
        .load_page(PageQuery::new(0, 12).sort("salary", SortDirection::Desc))
        .expect("sorted query should succeed");
    let salaries: Vec<f64> = by_salary
        .rows
        .iter()
        .filter_map(|row| row.get("salary").as_f64())
        .collect();
    assert!(salaries.windows(2).all(|pair| pair[0] >= pair[1]));

    assert!(matches!(
        source.load_page(PageQuery::new(0, 5).sort("password", SortDirection::Asc)),
        Err(SourceError::Query(_))
    ));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn sqlite_source_creates_and_deletes_employees() {
    let temp_dir = unique_test_dir("sqlite-write");
    let db_path = temp_dir.join("app.sqlite");
    let source = SqliteSource::open(db_path.clone()).expect("should open source");

    let row = Row::new()
        .with("name", "Ada Lovelace")
        .with("email", "ada@example.com")
        .with("department", "Engineering")
        .with("role", "Tech Lead")
        .with("joinDate", "2024-02-01")
        .with("salary", 99_000.0);
    let id = source.create_row(row).expect("create should succeed");

    let loaded = source
        .load_page(PageQuery::new(0, 5).search("lovelace"))
        .expect("search should succeed");
    assert_eq!(loaded.total, 1);
    assert_eq!(loaded.rows[0].get("status"), &CellValue::from("active"));

    source.delete_row(id).expect("delete should succeed");
    assert_eq!(source.delete_row(id), Err(SourceError::NotFound(id)));

    let missing_field = source.create_row(Row::new().with("name", "Nobody"));
    assert!(matches!(missing_field, Err(SourceError::Query(_))));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn sqlite_search_treats_wildcards_literally() {
    let temp_dir = unique_test_dir("sqlite-like");
    let db_path = temp_dir.join("app.sqlite");
    let source = SqliteSource::open(db_path.clone()).expect("should open source");

    let employee = |name: &str, email: &str, role: &str| {
        Row::new()
            .with("name", name)
            .with("email", email)
            .with("department", "Operations")
            .with("role", role)
            .with("joinDate", "2024-02-01")
            .with("salary", 60_000.0)
    };
    for row in [
        employee("Pat Quinn", "pat@example.com", "Lead (100% remote)"),
        employee("Bo Smith", "b_smith@example.com", "Analyst"),
        employee("Cy Young", "cy@example.com", "Analyst"),
    ] {
        source.create_row(row).expect("create should succeed");
    }

    let search = |term: &str| {
        source
            .load_page(PageQuery::new(0, 10).search(term))
            .expect("search should succeed")
    };
    let percent = search("%");
    assert_eq!(percent.total, 1);
    assert_eq!(percent.rows[0].get("name"), &CellValue::from("Pat Quinn"));
    let underscore = search("_");
    assert_eq!(underscore.total, 1);
    assert_eq!(underscore.rows[0].get("name"), &CellValue::from("Bo Smith"));
    assert_eq!(search("\\").total, 0);
    assert_eq!(search("analyst").total, 2);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_import_reads_employees_with_optional_status() {
    let temp_dir = unique_test_dir("csv-import");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    let csv_path = temp_dir.join("employees.csv");
    fs::write(
        &csv_path,
        "Name,Email,Department,Role,Join_Date,Salary\n\
         John Doe,john@example.com,Engineering,Tech Lead,2023-01-15,\"1,234.56\"\n\
         Jane Roe,jane@example.com,Sales,Account Executive,2022-06-01,52000\n",
    )
    .expect("should write csv");

    let imported = import_employees_csv(&db_path, &csv_path).expect("import should succeed");

    assert_eq!(imported.row_count, 2);
    assert_eq!(count_employees(&db_path).expect("count should succeed"), 2);

    let source = SqliteSource::open(db_path.clone()).expect("should open source");
    let page = source
        .load_page(PageQuery::new(0, 5))
        .expect("page should load");
    assert_eq!(page.rows[0].get("salary"), &CellValue::Number(1234.56));
    assert!(page
        .rows
        .iter()
        .all(|row| row.get("status") == &CellValue::from("active")));

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_import_requires_every_mandatory_header() {
    let temp_dir = unique_test_dir("csv-headers");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");
    let csv_path = temp_dir.join("employees.csv");
    fs::write(&csv_path, "name,email\nJohn,john@example.com\n").expect("should write csv");

    let result = import_employees_csv(&db_path, &csv_path);

    let message = format!("{:#}", result.expect_err("import should fail"));
    assert!(message.contains("department"), "unexpected error: {message}");
    assert_eq!(count_employees(&db_path).expect("count should succeed"), 0);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

struct FlakySource {
    inner: MemorySource,
    failing: AtomicBool,
}

impl FlakySource {
    fn new(rows: Vec<Row>) -> Self {
        Self {
            inner: MemorySource::new(rows),
            failing: AtomicBool::new(false),
        }
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl RowSource for FlakySource {
    fn load_page(&self, query: PageQuery) -> Result<PageResult, SourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Storage("connection reset".to_string()));
        }
        self.inner.load_page(query)
    }

    fn create_row(&self, row: Row) -> Result<RowId, SourceError> {
        self.inner.create_row(row)
    }

    fn delete_row(&self, id: RowId) -> Result<(), SourceError> {
        self.inner.delete_row(id)
    }
}

#[test]
fn employee_service_keeps_last_rows_when_a_load_fails() {
    let source = Arc::new(FlakySource::new(demo_rows(12)));
    let mut service = EmployeeService::new(source.clone());

    service
        .load(Some(0), Some(5), Some(String::new()))
        .expect("first load should succeed");
    assert_eq!(service.rows().len(), 5);
    assert_eq!(service.total(), 12);
    assert_eq!(service.total_pages(), 3);

    source.fail(true);
    let result = service.load(Some(1), None, None);

    assert!(result.is_err());
    assert!(!service.loading());
    assert_eq!(service.error(), Some(LOAD_FAILED_MESSAGE));
    assert_eq!(service.rows().len(), 5);
    assert_eq!(service.rows()[0].id(), Some(RowId(1)));

    source.fail(false);
    service.clear_error();
    assert!(service.error().is_none());
    service.reload().expect("reload should succeed");
    assert_eq!(service.rows()[0].id(), Some(RowId(6)));
}

#[test]
fn employee_service_keeps_filters_between_loads() {
    let source = Arc::new(MemorySource::new(demo_rows(12)));
    let mut service = EmployeeService::new(source);

    service
        .load(Some(0), Some(2), Some("engineering".to_string()))
        .expect("search should succeed");
    service.load(Some(1), None, None).expect("next page should load");

    assert_eq!(service.filters().search, "engineering");
    assert_eq!(service.filters().page_size, 2);
    assert_eq!(service.total(), 3);
    assert_eq!(service.rows().len(), 1);

    service.reset();
    assert_eq!(service.filters(), &PageQuery::new(0, 5));
    assert!(service.rows().is_empty());
}

#[test]
fn employee_service_delete_steps_back_from_emptied_page() {
    let source = Arc::new(MemorySource::new(demo_rows(6)));
    let mut service = EmployeeService::new(source.clone());
    service
        .load(Some(1), Some(5), None)
        .expect("second page should load");
    assert_eq!(service.rows().len(), 1);

    service.delete(RowId(6)).expect("delete should succeed");

    assert_eq!(service.filters().page, 0);
    assert_eq!(service.rows().len(), 5);
    assert_eq!(service.total(), 5);
    assert_eq!(source.len(), 5);

    assert_eq!(
        service.delete(RowId(6)),
        Err(SourceError::NotFound(RowId(6)))
    );
    assert!(service.error().is_some());
}

#[test]
fn employee_service_create_reloads_current_page() {
    let source = Arc::new(MemorySource::new(demo_rows(2)));
    let mut service = EmployeeService::new(source);
    service.load(None, None, None).expect("load should succeed");

    let id = service
        .create(Row::new().with("name", "New Hire"))
        .expect("create should succeed");

    assert_eq!(id, RowId(3));
    assert_eq!(service.total(), 3);
    assert_eq!(service.rows().len(), 3);
}
