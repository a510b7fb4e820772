use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::entities::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub page_index: usize,
    pub page_size: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionClick {
    pub action: String,
    pub row: Row,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    ActionClicked(ActionClick),
    CreateClicked,
    RowClicked(Row),
    PaginationChanged(PageChange),
    SearchChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&GridEvent)>;

/// Synchronous fan-out to subscribers. Nothing is buffered; once closed, emissions are
/// dropped.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    closed: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        if !self.closed {
            self.subscribers.push((id, Box::new(subscriber)));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: GridEvent) {
        if self.closed {
            return;
        }
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("closed", &self.closed)
            .finish()
    }
}

/// Shared recorder: subscribe it to a bus and drain what it collected.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GridEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, bus: &mut EventBus) -> SubscriptionId {
        let events = Rc::clone(&self.events);
        bus.subscribe(move |event| events.borrow_mut().push(event.clone()))
    }

    pub fn drain(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn snapshot(&self) -> Vec<GridEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
