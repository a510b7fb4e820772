use dioxus::prelude::{use_signal, Signal};

use crate::defaults::DEFAULT_PAGE_SIZE;
use crate::domain::entities::row::Row;

/// Host-side signals for a server-backed listing. The grid reads them through its props
/// and only ever reports changes back as events.
#[derive(Clone, Copy)]
pub struct AppState {
    pub rows: Signal<Vec<Row>>,
    pub total: Signal<usize>,
    pub page: Signal<usize>,
    pub page_size: Signal<usize>,
    pub keyword: Signal<String>,
    pub loading: Signal<bool>,
    pub error: Signal<Option<String>>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            rows: use_signal(Vec::<Row>::new),
            total: use_signal(|| 0_usize),
            page: use_signal(|| 0_usize),
            page_size: use_signal(|| DEFAULT_PAGE_SIZE),
            keyword: use_signal(String::new),
            loading: use_signal(|| false),
            error: use_signal(|| None::<String>),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
