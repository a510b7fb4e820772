use crate::domain::entities::config::GridConfig;
use crate::usecase::grid::events::PageChange;

/// Where the authoritative row count comes from. Chosen once per configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// Rows are held locally and sliced in memory.
    Client,
    /// Rows are one externally fetched page; totals come from configuration.
    Server { total_items: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationController {
    strategy: PaginationStrategy,
    enabled: bool,
    page_index: usize,
    page_size: usize,
    default_page_size: usize,
}

impl PaginationController {
    pub fn from_config(config: &GridConfig) -> Self {
        let mut controller = Self {
            strategy: PaginationStrategy::Client,
            enabled: true,
            page_index: config.current_page.unwrap_or(0),
            page_size: config.effective_page_size(),
            default_page_size: config.effective_page_size(),
        };
        controller.reconcile(config);
        controller
    }

    /// Applies a replacement configuration.
    ///
    /// Server mode trusts whatever page state the configuration carries and keeps the local
    /// mirror for values it leaves out. Client mode owns its page state: a re-supplied
    /// configuration only takes effect when its default page size actually changed, and
    /// then restarts from the first page.
    pub fn reconcile(&mut self, config: &GridConfig) {
        self.enabled = config.pagination_enabled;
        let default_page_size = config.effective_page_size();

        if config.server_side_pagination {
            if let Some(size) = config.default_page_size.filter(|size| *size > 0) {
                self.page_size = size;
            }
            if let Some(page) = config.current_page {
                self.page_index = page;
            }
            let total_items = match self.strategy {
                PaginationStrategy::Server { total_items } => total_items,
                PaginationStrategy::Client => 0,
            };
            self.strategy = PaginationStrategy::Server {
                total_items: config.total_items.unwrap_or(total_items),
            };
        } else {
            if default_page_size != self.default_page_size {
                self.page_size = default_page_size;
                self.page_index = 0;
            }
            self.strategy = PaginationStrategy::Client;
        }
        self.default_page_size = default_page_size;
    }

    pub fn strategy(&self) -> PaginationStrategy {
        self.strategy
    }

    pub fn is_server(&self) -> bool {
        matches!(self.strategy, PaginationStrategy::Server { .. })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Row count the paginator reports. Client mode counts the filtered local rows.
    pub fn total_count(&self, local_rows: usize) -> usize {
        match self.strategy {
            PaginationStrategy::Client => local_rows,
            PaginationStrategy::Server { total_items } => total_items,
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        total.div_ceil(self.page_size)
    }

    fn last_page(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    pub fn has_previous(&self) -> bool {
        self.enabled && self.page_index > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.enabled && self.page_index.saturating_add(1) < self.page_count(total)
    }

    /// Client mode only: a page left stranded past the end goes back to the first page.
    /// Returns whether the index moved.
    pub fn clamp(&mut self, local_rows: usize) -> bool {
        if self.is_server() {
            return false;
        }
        let out_of_range = if local_rows == 0 {
            self.page_index > 0
        } else {
            self.page_index.saturating_mul(self.page_size) >= local_rows
        };
        if out_of_range {
            self.page_index = 0;
        }
        out_of_range
    }

    /// Client mode with pagination enabled slices; otherwise every row passes through.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.is_server() || !self.enabled {
            return items;
        }
        let start = self.page_index.saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }

    pub fn go_to(&mut self, page_index: usize, total: usize) -> Option<PageChange> {
        let target = page_index.min(self.last_page(total));
        if target == self.page_index {
            return None;
        }
        self.page_index = target;
        Some(self.change(total))
    }

    /// New page size; the page index always returns to zero.
    pub fn set_page_size(&mut self, page_size: usize, total: usize) -> Option<PageChange> {
        let page_size = if page_size == 0 {
            self.default_page_size
        } else {
            page_size
        };
        if page_size == self.page_size && self.page_index == 0 {
            return None;
        }
        self.page_size = page_size;
        self.page_index = 0;
        Some(self.change(total))
    }

    /// Silent reset used by search commits.
    pub fn reset_index(&mut self) -> bool {
        let moved = self.page_index != 0;
        self.page_index = 0;
        moved
    }

    pub fn reset_to_defaults(&mut self) {
        self.page_index = 0;
        self.page_size = self.default_page_size;
    }

    pub fn change(&self, total: usize) -> PageChange {
        PageChange {
            page_index: self.page_index,
            page_size: self.page_size,
            length: total,
        }
    }

    pub fn range_label(&self, total: usize) -> String {
        if total == 0 || self.page_size == 0 {
            return format!("0 of {total}");
        }
        let start = self.page_index.saturating_mul(self.page_size);
        let end = if start < total {
            start.saturating_add(self.page_size).min(total)
        } else {
            start.saturating_add(self.page_size)
        };
        format!("{} – {} of {}", start.saturating_add(1), end, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_config(page_size: usize) -> GridConfig {
        GridConfig {
            default_page_size: Some(page_size),
            ..GridConfig::default()
        }
    }

    fn server_config(total: usize, page: usize, page_size: usize) -> GridConfig {
        GridConfig {
            server_side_pagination: true,
            total_items: Some(total),
            current_page: Some(page),
            default_page_size: Some(page_size),
            ..GridConfig::default()
        }
    }

    #[test]
    fn missing_page_size_falls_back_to_default() {
        let controller = PaginationController::from_config(&GridConfig::default());
        assert_eq!(controller.page_size(), 5);
        assert_eq!(controller.page_index(), 0);

        let zero = PaginationController::from_config(&client_config(0));
        assert_eq!(zero.page_size(), 5);
    }

    #[test]
    fn client_slice_handles_partial_last_page() {
        let rows: Vec<usize> = (1..=12).collect();
        let mut controller = PaginationController::from_config(&client_config(5));

        assert_eq!(controller.slice(&rows), &[1, 2, 3, 4, 5]);
        controller.go_to(2, rows.len());
        assert_eq!(controller.slice(&rows), &[11, 12]);
        assert_eq!(controller.total_count(rows.len()), 12);
        assert_eq!(controller.range_label(rows.len()), "11 – 12 of 12");
    }

    #[test]
    fn go_to_clamps_to_last_page_and_skips_noop() {
        let mut controller = PaginationController::from_config(&client_config(5));
        let change = controller.go_to(9, 12).expect("page should move");
        assert_eq!(change.page_index, 2);
        assert_eq!(change.length, 12);
        assert!(controller.go_to(2, 12).is_none());
    }

    #[test]
    fn clamp_returns_stranded_page_to_first() {
        let mut controller = PaginationController::from_config(&client_config(5));
        controller.go_to(2, 12);
        assert!(controller.clamp(4));
        assert_eq!(controller.page_index(), 0);
        assert!(!controller.clamp(4));
    }

    #[test]
    fn page_size_change_resets_index() {
        let mut controller = PaginationController::from_config(&client_config(5));
        controller.go_to(1, 12);
        let change = controller.set_page_size(10, 12).expect("size should change");
        assert_eq!(change.page_index, 0);
        assert_eq!(change.page_size, 10);
    }

    #[test]
    fn server_strategy_trusts_configuration() {
        let mut controller = PaginationController::from_config(&server_config(120, 3, 10));
        assert!(controller.is_server());
        assert_eq!(controller.total_count(10), 120);
        assert_eq!(controller.page_index(), 3);
        assert!(!controller.clamp(0));

        let rows: Vec<usize> = (0..10).collect();
        assert_eq!(controller.slice(&rows).len(), 10);

        controller.reconcile(&server_config(40, 1, 20));
        assert_eq!(controller.total_count(10), 40);
        assert_eq!(controller.page_index(), 1);
        assert_eq!(controller.page_size(), 20);
    }

    #[test]
    fn server_reconcile_keeps_values_the_config_omits() {
        let mut controller = PaginationController::from_config(&server_config(50, 2, 10));
        let partial = GridConfig {
            server_side_pagination: true,
            ..GridConfig::default()
        };
        controller.reconcile(&partial);
        assert_eq!(controller.total_count(0), 50);
        assert_eq!(controller.page_index(), 2);
        assert_eq!(controller.page_size(), 10);
    }

    #[test]
    fn client_reconcile_keeps_user_page_state() {
        let config = client_config(5);
        let mut controller = PaginationController::from_config(&config);
        controller.set_page_size(10, 30);
        controller.go_to(1, 30);

        controller.reconcile(&config);
        assert_eq!(controller.page_size(), 10);
        assert_eq!(controller.page_index(), 1);

        controller.reconcile(&client_config(20));
        assert_eq!(controller.page_size(), 20);
        assert_eq!(controller.page_index(), 0);
    }

    #[test]
    fn huge_server_page_index_never_overflows() {
        let controller = PaginationController::from_config(&server_config(40, usize::MAX / 2, 5));
        assert!(!controller.has_next(40));
        assert!(controller.has_previous());
        assert!(controller.range_label(40).ends_with("of 40"));

        let last = PaginationController::from_config(&server_config(40, usize::MAX, 1));
        assert!(!last.has_next(40));
        assert_eq!(
            last.range_label(40),
            format!("{} – {} of 40", usize::MAX, usize::MAX)
        );
    }

    #[test]
    fn range_label_matches_paginator_layout() {
        let controller = PaginationController::from_config(&client_config(5));
        assert_eq!(controller.range_label(0), "0 of 0");
        assert_eq!(controller.range_label(12), "1 – 5 of 12");
    }
}
