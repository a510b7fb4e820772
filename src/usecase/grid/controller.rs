use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::entities::config::GridConfig;
use crate::domain::entities::row::Row;
use crate::usecase::grid::events::{ActionClick, EventBus, GridEvent, SubscriptionId};
use crate::usecase::grid::pagination::PaginationController;
use crate::usecase::grid::projector::{
    container_style, displayed_columns, header_views, project_row, table_style, HeaderView,
    RowView,
};
use crate::usecase::grid::search::{row_matches, SearchController, SearchMode, SearchStep};
use crate::usecase::grid::sort::{next_sort, sort_indices, SortState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub enabled: bool,
    pub page_index: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub page_count: usize,
    pub range_label: String,
    pub has_previous: bool,
    pub has_next: bool,
    pub page_size_options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub displayed_columns: Vec<String>,
    pub headers: Vec<HeaderView>,
    pub has_actions: bool,
    pub rows: Vec<RowView>,
    pub page: PageView,
    pub query: String,
    pub search_enabled: bool,
    pub search_placeholder: String,
    pub create_label: Option<String>,
    pub loading: bool,
    pub table_style: String,
    pub container_style: String,
    pub sort: Option<SortState>,
}

fn search_mode(config: &GridConfig) -> SearchMode {
    if config.server_side_search {
        SearchMode::Remote
    } else {
        SearchMode::Local
    }
}

fn checked(config: GridConfig) -> GridConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            warn!(error = %err, "invalid grid configuration, rendering an empty grid");
            GridConfig::default()
        }
    }
}

/// The data grid state container.
///
/// Owns the pagination and search controllers for one grid instance and is the only place
/// that emits [`GridEvent`]s. Rows and configuration are only ever replaced by the caller;
/// user interactions either re-derive the visible rows (client mode) or emit events the
/// caller answers with a fresh page (server mode).
#[derive(Debug)]
pub struct GridController {
    config: GridConfig,
    rows: Vec<Row>,
    loading: bool,
    pagination: PaginationController,
    search: SearchController,
    sort: Option<SortState>,
    visible: Vec<usize>,
    events: EventBus,
    disposed: bool,
}

impl Default for GridController {
    fn default() -> Self {
        Self::new(GridConfig::default(), Vec::new())
    }
}

impl GridController {
    pub fn new(config: GridConfig, rows: Vec<Row>) -> Self {
        let config = checked(config);
        let pagination = PaginationController::from_config(&config);
        let search = SearchController::new(search_mode(&config), config.debounce_window());
        let mut grid = Self {
            config,
            rows,
            loading: false,
            pagination,
            search,
            sort: None,
            visible: Vec::new(),
            events: EventBus::new(),
            disposed: false,
        };
        grid.refresh();
        grid
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn page_index(&self) -> usize {
        self.pagination.page_index()
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    pub fn total_count(&self) -> usize {
        self.pagination.total_count(self.visible.len())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn displayed_columns(&self) -> Vec<String> {
        displayed_columns(&self.config)
    }

    /// Replaces the configuration wholesale. An invalid configuration degrades to an inert
    /// empty grid.
    pub fn set_config(&mut self, config: GridConfig) {
        if self.disposed {
            return;
        }
        let config = checked(config);
        self.pagination.reconcile(&config);
        self.search
            .reconfigure(search_mode(&config), config.debounce_window());
        if let Some(sort) = &self.sort {
            let still_sortable = config
                .column(&sort.column)
                .is_some_and(|column| column.sortable);
            if !still_sortable {
                self.sort = None;
            }
        }
        self.config = config;
        debug!(
            columns = self.config.columns.len(),
            server_pagination = self.config.server_side_pagination,
            server_search = self.config.server_side_search,
            page_index = self.pagination.page_index(),
            page_size = self.pagination.page_size(),
            "grid configuration replaced"
        );
        self.refresh();
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        if self.disposed {
            return;
        }
        self.rows = rows;
        self.refresh();
    }

    pub fn update(&mut self, config: GridConfig, rows: Vec<Row>) {
        if self.disposed {
            return;
        }
        self.rows = rows;
        self.set_config(config);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn refresh(&mut self) {
        let filter = self.search.filter();
        let mut visible: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row_matches(&self.config.columns, row, filter))
            .map(|(idx, _)| idx)
            .collect();
        if let Some(sort) = &self.sort {
            sort_indices(&self.rows, &mut visible, sort);
        }
        self.visible = visible;
        self.pagination.clamp(self.visible.len());
    }

    fn emit(&mut self, event: GridEvent) {
        if self.disposed {
            return;
        }
        self.events.emit(event);
    }

    fn emit_page_change(&mut self) {
        let change = self.pagination.change(self.total_count());
        self.emit(GridEvent::PaginationChanged(change));
    }

    /// Feeds one search-box mutation. Returns the debounce deadline when the term is
    /// deferred for server-side search.
    pub fn search_input(&mut self, value: &str, now: Instant) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        match self.search.input(value, now) {
            SearchStep::Filtered(filter) => {
                let moved = self.pagination.reset_index();
                self.refresh();
                debug!(filter = %filter, matches = self.visible.len(), "local filter applied");
                if moved {
                    self.emit_page_change();
                }
                None
            }
            SearchStep::Scheduled(deadline) => Some(deadline),
        }
    }

    /// Releases a debounced server-side search term once its window has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let Some(term) = self.search.poll(now) else {
            return false;
        };
        self.pagination.reset_index();
        info!(query = %term, "search committed");
        self.emit(GridEvent::SearchChanged(term));
        true
    }

    pub fn clear_search(&mut self) {
        if self.disposed {
            return;
        }
        self.search.clear();
        match self.search.mode() {
            SearchMode::Local => {
                let moved = self.pagination.reset_index();
                self.refresh();
                if moved {
                    self.emit_page_change();
                }
            }
            SearchMode::Remote => {
                self.pagination.reset_to_defaults();
                self.refresh();
                info!("search cleared");
                self.emit(GridEvent::SearchChanged(String::new()));
            }
        }
    }

    pub fn go_to_page(&mut self, page_index: usize) {
        if self.disposed || !self.pagination.is_enabled() {
            return;
        }
        let total = self.total_count();
        if let Some(change) = self.pagination.go_to(page_index, total) {
            debug!(page_index = change.page_index, "page changed");
            self.emit(GridEvent::PaginationChanged(change));
        }
    }

    pub fn first_page(&mut self) {
        self.go_to_page(0);
    }

    pub fn previous_page(&mut self) {
        if self.pagination.has_previous() {
            self.go_to_page(self.pagination.page_index() - 1);
        }
    }

    pub fn next_page(&mut self) {
        if self.pagination.has_next(self.total_count()) {
            self.go_to_page(self.pagination.page_index() + 1);
        }
    }

    pub fn last_page(&mut self) {
        let last = self
            .pagination
            .page_count(self.total_count())
            .saturating_sub(1);
        self.go_to_page(last);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if self.disposed || !self.pagination.is_enabled() {
            return;
        }
        let total = self.total_count();
        if let Some(change) = self.pagination.set_page_size(page_size, total) {
            debug!(page_size = change.page_size, "page size changed");
            self.emit(GridEvent::PaginationChanged(change));
        }
    }

    /// Cycles the sort on a sortable column; other keys are ignored.
    pub fn toggle_sort(&mut self, key: &str) {
        if self.disposed {
            return;
        }
        let sortable = self
            .config
            .column(key)
            .is_some_and(|column| column.sortable);
        if !sortable {
            return;
        }
        self.sort = next_sort(self.sort.as_ref(), key);
        self.refresh();
    }

    pub fn click_action(&mut self, action: &str, row: Row) {
        self.emit(GridEvent::ActionClicked(ActionClick {
            action: action.to_string(),
            row,
        }));
    }

    /// Action click for the held row at `index`; unknown indices are ignored.
    pub fn click_action_at(&mut self, action: &str, index: usize) {
        if let Some(row) = self.rows.get(index).cloned() {
            self.click_action(action, row);
        }
    }

    pub fn click_create(&mut self) {
        self.emit(GridEvent::CreateClicked);
    }

    pub fn click_row(&mut self, row: Row) {
        self.emit(GridEvent::RowClicked(row));
    }

    pub fn click_row_at(&mut self, index: usize) {
        if let Some(row) = self.rows.get(index).cloned() {
            self.click_row(row);
        }
    }

    pub fn page_rows(&self) -> Vec<&Row> {
        self.pagination
            .slice(&self.visible)
            .iter()
            .map(|idx| &self.rows[*idx])
            .collect()
    }

    fn page_size_options(&self) -> Vec<usize> {
        let mut options = self.config.page_size_options.clone();
        if !options.contains(&self.pagination.page_size()) {
            options.push(self.pagination.page_size());
        }
        options.sort_unstable();
        options
    }

    pub fn view(&self) -> GridView {
        let total = self.total_count();
        let rows = self
            .pagination
            .slice(&self.visible)
            .iter()
            .map(|idx| project_row(&self.config, &self.rows[*idx], *idx))
            .collect();

        GridView {
            displayed_columns: displayed_columns(&self.config),
            headers: header_views(&self.config, self.sort.as_ref()),
            has_actions: !self.config.actions.is_empty(),
            rows,
            page: PageView {
                enabled: self.pagination.is_enabled(),
                page_index: self.pagination.page_index(),
                page_size: self.pagination.page_size(),
                total_count: total,
                page_count: self.pagination.page_count(total),
                range_label: self.pagination.range_label(total),
                has_previous: self.pagination.has_previous(),
                has_next: self.pagination.has_next(total),
                page_size_options: self.page_size_options(),
            },
            query: self.search.query().to_string(),
            search_enabled: self.config.search_enabled,
            search_placeholder: self.config.placeholder().to_string(),
            create_label: self
                .config
                .create_button_enabled
                .then(|| self.config.create_label().to_string()),
            loading: self.loading,
            table_style: table_style(&self.config),
            container_style: container_style(&self.config),
            sort: self.sort.clone(),
        }
    }

    /// Tears the grid down: pending debounce cancelled, subscribers released, and every
    /// later emission suppressed.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.search.cancel();
        self.events.close();
        self.disposed = true;
        info!("grid disposed");
    }
}
