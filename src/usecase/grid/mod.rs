pub mod controller;
pub mod events;
pub mod format;
pub mod pagination;
pub mod projector;
pub mod search;
pub mod sort;

pub use controller::{GridController, GridView, PageView};
pub use events::{ActionClick, EventBus, EventLog, GridEvent, PageChange, SubscriptionId};
pub use pagination::{PaginationController, PaginationStrategy};
pub use search::{Debouncer, SearchController, SearchMode};
pub use sort::SortState;
