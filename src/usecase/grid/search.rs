use std::time::{Duration, Instant};

use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::row::Row;
use crate::usecase::grid::projector::search_text;

/// Deadline-based debounce with distinct-until-changed.
///
/// Each `push` replaces the pending value and re-arms the deadline; `poll` releases the
/// pending value only once the window has elapsed uninterrupted and the value differs from
/// the last one released.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    pub fn push(&mut self, value: T, now: Instant) -> Instant {
        let deadline = now + self.window;
        self.pending = Some((value, deadline));
        deadline
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Records a value released outside the debounce path so it is not repeated.
    pub fn mark_emitted(&mut self, value: T) {
        self.last_emitted = Some(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep {
    /// Local filter changed; holds the normalized filter.
    Filtered(String),
    /// Remote term scheduled for release at the deadline.
    Scheduled(Instant),
}

#[derive(Debug, Clone)]
pub struct SearchController {
    mode: SearchMode,
    query: String,
    filter: String,
    debouncer: Debouncer<String>,
}

pub fn normalize_filter(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Searchable columns concatenated, lower-cased, then tested for `filter`.
/// An empty filter matches every row.
pub fn row_matches(columns: &[ColumnDef], row: &Row, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let haystack = columns
        .iter()
        .filter(|column| column.searchable)
        .map(|column| search_text(row.get(&column.key)))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    haystack.contains(filter)
}

impl SearchController {
    pub fn new(mode: SearchMode, window: Duration) -> Self {
        Self {
            mode,
            query: String::new(),
            filter: String::new(),
            debouncer: Debouncer::new(window),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Switching modes drops anything pending; the typed query survives.
    pub fn reconfigure(&mut self, mode: SearchMode, window: Duration) {
        if mode != self.mode {
            self.debouncer.cancel();
            self.mode = mode;
            self.filter = match mode {
                SearchMode::Local => normalize_filter(&self.query),
                SearchMode::Remote => String::new(),
            };
        }
        self.debouncer.set_window(window);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Normalized local filter; always empty in remote mode.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn input(&mut self, value: &str, now: Instant) -> SearchStep {
        self.query = value.to_string();
        match self.mode {
            SearchMode::Local => {
                self.filter = normalize_filter(value);
                SearchStep::Filtered(self.filter.clone())
            }
            SearchMode::Remote => {
                SearchStep::Scheduled(self.debouncer.push(value.trim().to_string(), now))
            }
        }
    }

    /// Remote term whose debounce window has elapsed, deduplicated.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.mode {
            SearchMode::Local => None,
            SearchMode::Remote => self.debouncer.poll(now),
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.filter.clear();
        if self.mode == SearchMode::Remote {
            self.debouncer.cancel();
            self.debouncer.mark_emitted(String::new());
        }
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
