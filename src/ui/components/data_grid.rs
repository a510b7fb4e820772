use std::time::Instant;

use dioxus::core::Task;
use dioxus::prelude::*;

use crate::domain::entities::config::GridConfig;
use crate::domain::entities::page::SortDirection;
use crate::domain::entities::row::Row;
use crate::usecase::grid::{ActionClick, EventLog, GridController, GridEvent, PageChange};

const GRID_CSS: &str = "
.data-grid table { border-collapse: collapse; }
.data-grid th { position: sticky; top: 0; background: #f6f7f9; z-index: 2; }
.data-grid .sticky-column { position: sticky; left: 0; background: #fff; z-index: 1; }
.data-grid th.sticky-column { z-index: 3; background: #f6f7f9; }
.data-grid tbody tr:hover { background: #f3f7ff; cursor: pointer; }
.data-grid .badge { display: inline-block; padding: 2px 8px; border-radius: 10px; font-size: 12px; background: #eceff3; }
.data-grid .status-active { background: #e3f6e8; color: #1e7b34; }
.data-grid .status-inactive { background: #fdecec; color: #a12622; }
.data-grid .status-pending { background: #fff5db; color: #8a6100; }
";

const CELL_STYLE: &str = "border-bottom: 1px solid #e3e5e8; padding: 8px 10px; text-align: left;";
const BUTTON_STYLE: &str =
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";

/// Controller plus the recorder its events land in, owned by one mounted grid.
struct GridState {
    grid: GridController,
    log: EventLog,
    config: GridConfig,
    rows: Vec<Row>,
}

impl GridState {
    fn new(config: GridConfig, rows: Vec<Row>) -> Self {
        let mut grid = GridController::new(config.clone(), rows.clone());
        let log = EventLog::new();
        log.attach(grid.events_mut());
        Self {
            grid,
            log,
            config,
            rows,
        }
    }

    /// Re-feeds props. Identical inputs are skipped so a re-render never resets state.
    fn sync(&mut self, config: &GridConfig, rows: &[Row], loading: bool) {
        let config_changed = self.config != *config;
        let rows_changed = self.rows.as_slice() != rows;
        if config_changed && rows_changed {
            self.config = config.clone();
            self.rows = rows.to_vec();
            self.grid.update(config.clone(), rows.to_vec());
        } else if config_changed {
            self.config = config.clone();
            self.grid.set_config(config.clone());
        } else if rows_changed {
            self.rows = rows.to_vec();
            self.grid.set_rows(rows.to_vec());
        }
        self.grid.set_loading(loading);
    }
}

#[derive(Clone, Copy)]
struct GridHandlers {
    on_action: EventHandler<ActionClick>,
    on_create: EventHandler<()>,
    on_row: EventHandler<Row>,
    on_page: EventHandler<PageChange>,
    on_search: EventHandler<String>,
}

impl GridHandlers {
    fn dispatch(&self, events: Vec<GridEvent>) {
        for event in events {
            match event {
                GridEvent::ActionClicked(click) => self.on_action.call(click),
                GridEvent::CreateClicked => self.on_create.call(()),
                GridEvent::RowClicked(row) => self.on_row.call(row),
                GridEvent::PaginationChanged(change) => self.on_page.call(change),
                GridEvent::SearchChanged(term) => self.on_search.call(term),
            }
        }
    }
}

#[derive(Clone, Copy)]
struct GridHandle {
    state: CopyValue<GridState>,
    revision: Signal<u64>,
    handlers: GridHandlers,
}

impl GridHandle {
    /// Runs one interaction against the controller, then forwards what it emitted once the
    /// borrow is released.
    fn apply<R>(mut self, interaction: impl FnOnce(&mut GridController) -> R) -> R {
        let (result, events) = {
            let mut state = self.state.write();
            let result = interaction(&mut state.grid);
            (result, state.log.drain())
        };
        *self.revision.write() += 1;
        self.handlers.dispatch(events);
        result
    }
}

fn sort_indicator(sort: Option<SortDirection>) -> &'static str {
    match sort {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => "",
    }
}

#[component]
pub fn DataGrid(
    config: GridConfig,
    rows: Vec<Row>,
    #[props(default)] loading: bool,
    on_action: EventHandler<ActionClick>,
    on_create: EventHandler<()>,
    on_row: EventHandler<Row>,
    on_page: EventHandler<PageChange>,
    on_search: EventHandler<String>,
) -> Element {
    let initial_config = config.clone();
    let initial_rows = rows.clone();
    let mut state = use_hook(move || CopyValue::new(GridState::new(initial_config, initial_rows)));
    let revision = use_signal(|| 0_u64);
    let mut pending = use_hook(|| CopyValue::new(None::<Task>));

    let handle = GridHandle {
        state,
        revision,
        handlers: GridHandlers {
            on_action,
            on_create,
            on_row,
            on_page,
            on_search,
        },
    };

    use_drop(move || {
        if let Ok(mut task) = pending.try_write() {
            if let Some(task) = task.take() {
                task.cancel();
            }
        }
        if let Ok(mut state) = state.try_write() {
            state.grid.dispose();
        }
    });

    let _ = revision();
    state.write().sync(&config, &rows, loading);
    let view = state.read().grid.view();

    let column_count = view.headers.len() + usize::from(view.has_actions);
    let page = view.page.clone();
    let show_toolbar = view.search_enabled || view.create_label.is_some();
    let has_query = !view.query.is_empty();

    rsx! {
        style { "{GRID_CSS}" }
        div {
            class: "data-grid",
            style: "display: flex; flex-direction: column; gap: 10px; font-family: sans-serif;",

            if show_toolbar {
                div {
                    style: "display: flex; align-items: center; justify-content: space-between; gap: 12px;",
                    if view.search_enabled {
                        div {
                            style: "display: inline-flex; align-items: center; gap: 6px;",
                            input {
                                r#type: "search",
                                style: "padding: 6px 10px; min-width: 260px; border: 1px solid #bbb; border-radius: 6px;",
                                placeholder: "{view.search_placeholder}",
                                value: "{view.query}",
                                oninput: move |event| {
                                    let value = event.value();
                                    let deadline =
                                        handle.apply(|grid| grid.search_input(&value, Instant::now()));
                                    if let Some(task) = pending.write().take() {
                                        task.cancel();
                                    }
                                    if let Some(deadline) = deadline {
                                        let task = spawn(async move {
                                            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
                                            handle.apply(|grid| grid.tick(Instant::now()));
                                        });
                                        pending.set(Some(task));
                                    }
                                },
                            }
                            if has_query {
                                button {
                                    style: "{BUTTON_STYLE}",
                                    title: "Clear search",
                                    onclick: move |_| {
                                        if let Some(task) = pending.write().take() {
                                            task.cancel();
                                        }
                                        handle.apply(|grid| grid.clear_search());
                                    },
                                    "✕"
                                }
                            }
                        }
                    }
                    if let Some(label) = view.create_label.clone() {
                        button {
                            style: "border: 1px solid #2f6fed; background: #2f6fed; color: #fff; padding: 6px 14px; border-radius: 6px; cursor: pointer;",
                            onclick: move |_| handle.apply(|grid| grid.click_create()),
                            "{label}"
                        }
                    }
                }
            }

            div {
                style: "position: relative; {view.container_style}",
                if view.loading {
                    div {
                        style: "position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(255,255,255,0.7); z-index: 10;",
                        "Loading..."
                    }
                }
                table {
                    style: "{view.table_style}",
                    thead {
                        tr {
                            {view.headers.iter().map(|header| {
                                let key = header.key.clone();
                                let sortable = header.sortable;
                                let indicator = sort_indicator(header.sort);
                                let cursor = if sortable { "pointer" } else { "default" };
                                rsx!(
                                    th {
                                        key: "{header.key}",
                                        class: "{header.class}",
                                        style: "{CELL_STYLE} cursor: {cursor}; {header.style}",
                                        onclick: move |_| {
                                            if sortable {
                                                handle.apply(|grid| grid.toggle_sort(&key));
                                            }
                                        },
                                        "{header.label}{indicator}"
                                    }
                                )
                            })}
                            if view.has_actions {
                                th { style: "{CELL_STYLE}", "Actions" }
                            }
                        }
                    }
                    tbody {
                        if view.rows.is_empty() {
                            tr {
                                td {
                                    colspan: "{column_count}",
                                    style: "{CELL_STYLE} text-align: center; color: #777;",
                                    if view.loading { "" } else { "No data" }
                                }
                            }
                        }
                        {view.rows.iter().map(|row| {
                            let index = row.index;
                            let has_actions = view.has_actions;
                            rsx!(
                                tr {
                                    key: "{index}",
                                    onclick: move |_| handle.apply(|grid| grid.click_row_at(index)),
                                    {row.cells.iter().map(|cell| {
                                        rsx!(
                                            td {
                                                key: "{cell.key}",
                                                class: "{cell.class}",
                                                style: "{CELL_STYLE} {cell.style}",
                                                if let Some(badge) = cell.badge_class.clone() {
                                                    span { class: "badge {badge}", "{cell.text}" }
                                                } else {
                                                    "{cell.text}"
                                                }
                                            }
                                        )
                                    })}
                                    if has_actions {
                                        td {
                                            style: "{CELL_STYLE} white-space: nowrap;",
                                            {row.actions.iter().map(|action| {
                                                let key = action.key.clone();
                                                let color = action.color.clone().unwrap_or_else(|| "#333".to_string());
                                                rsx!(
                                                    button {
                                                        key: "{action.key}",
                                                        title: "{action.label}",
                                                        style: "{BUTTON_STYLE} color: {color}; margin-right: 4px;",
                                                        onclick: move |event| {
                                                            event.stop_propagation();
                                                            handle.apply(|grid| grid.click_action_at(&key, index));
                                                        },
                                                        "{action.icon}"
                                                    }
                                                )
                                            })}
                                        }
                                    }
                                }
                            )
                        })}
                    }
                }
            }

            if page.enabled {
                div {
                    style: "display: flex; align-items: center; justify-content: flex-end; gap: 10px;",
                    span { "Items per page:" }
                    select {
                        value: "{page.page_size}",
                        onchange: move |event| {
                            if let Ok(size) = event.value().parse::<usize>() {
                                handle.apply(|grid| grid.set_page_size(size));
                            }
                        },
                        {page.page_size_options.iter().map(|size| {
                            let selected = *size == page.page_size;
                            rsx!(
                                option { key: "{size}", value: "{size}", selected: selected, "{size}" }
                            )
                        })}
                    }
                    span { "{page.range_label}" }
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: !page.has_previous,
                        onclick: move |_| handle.apply(|grid| grid.first_page()),
                        "«"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: !page.has_previous,
                        onclick: move |_| handle.apply(|grid| grid.previous_page()),
                        "‹"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: !page.has_next,
                        onclick: move |_| handle.apply(|grid| grid.next_page()),
                        "›"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: !page.has_next,
                        onclick: move |_| handle.apply(|grid| grid.last_page()),
                        "»"
                    }
                }
            }
        }
    }
}
