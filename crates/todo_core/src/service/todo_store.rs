//! In-memory to-do store with change notifications.
//!
//! # Responsibility
//! - Own the ordered item sequence for one session.
//! - Apply add/toggle/delete intents and mirror the result to the snapshot.
//! - Notify subscribers after every successful mutation.
//!
//! # Invariants
//! - Order is insertion order; only append and explicit removal change it.
//! - Rejected or no-op intents neither persist nor notify.
//! - Persistence happens before subscribers are notified.

use crate::config::{RecordShape, StoreConfig};
use crate::model::todo_item::{TodoId, TodoItem};
use crate::repo::slot_repo::{Ephemeral, SlotRepository};
use crate::service::clock::{Clock, SystemClock};
use crate::service::snapshot::TodoSnapshot;
use log::{debug, info};
use std::collections::BTreeSet;

/// User request to mutate the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoIntent {
    Add(String),
    ToggleDone(TodoId),
    /// Positions in the sequence as it was before the deletion.
    Delete(Vec<usize>),
}

/// Notification emitted after a mutation has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Loaded { count: usize },
    Added { id: TodoId },
    Toggled { id: TodoId, is_done: bool },
    Deleted { ids: Vec<TodoId> },
}

/// Receives store changes together with the full current sequence.
pub trait StoreListener {
    fn on_change(&mut self, change: &StoreChange, items: &[TodoItem]);
}

impl<F> StoreListener for F
where
    F: FnMut(&StoreChange, &[TodoItem]),
{
    fn on_change(&mut self, change: &StoreChange, items: &[TodoItem]) {
        self(change, items)
    }
}

/// Handle returned by [`TodoStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered to-do list plus its persistence side channel.
pub struct TodoStore<R: SlotRepository, C: Clock = SystemClock> {
    items: Vec<TodoItem>,
    shape: RecordShape,
    snapshot: TodoSnapshot<R>,
    clock: C,
    listeners: Vec<(SubscriptionId, Box<dyn StoreListener>)>,
    next_subscription: u64,
}

impl TodoStore<Ephemeral> {
    /// Creates a non-persistent store holding `items` as-is.
    pub fn ephemeral(items: Vec<TodoItem>) -> Self {
        let mut store = Self::open(Ephemeral, StoreConfig::with_shape(RecordShape::Minimal));
        store.items = items;
        store
    }
}

impl<R: SlotRepository> TodoStore<R> {
    /// Opens a store on `repo` using the wall clock.
    pub fn open(repo: R, config: StoreConfig) -> Self {
        Self::open_with_clock(repo, config, SystemClock)
    }
}

impl<R: SlotRepository, C: Clock> TodoStore<R, C> {
    /// Opens a store and loads the persisted sequence when the shape persists.
    ///
    /// No notification is emitted; there are no subscribers yet.
    pub fn open_with_clock(repo: R, config: StoreConfig, clock: C) -> Self {
        let snapshot = TodoSnapshot::new(repo, config.slot_name);
        let items = if config.shape.persists() {
            fit_to_shape(snapshot.load(), config.shape)
        } else {
            Vec::new()
        };
        info!(
            "event=store_open module=service status=ok shape={} slot={} count={}",
            config.shape,
            snapshot.slot_name(),
            items.len()
        );

        Self {
            items,
            shape: config.shape,
            snapshot,
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn shape(&self) -> RecordShape {
        self.shape
    }

    pub fn snapshot(&self) -> &TodoSnapshot<R> {
        &self.snapshot
    }

    /// Registers a listener called after every applied mutation.
    pub fn subscribe(&mut self, listener: impl StoreListener + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Applies one intent. Returns whether the store changed.
    pub fn dispatch(&mut self, intent: TodoIntent) -> bool {
        match intent {
            TodoIntent::Add(text) => self.add(&text).is_some(),
            TodoIntent::ToggleDone(id) => self.toggle_done(id).is_some(),
            TodoIntent::Delete(positions) => !self.delete(positions).is_empty(),
        }
    }

    /// Appends a new open item built from `text`.
    ///
    /// Blank text is silently ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<TodoId> {
        let created_at = self.shape.has_timestamps().then(|| self.clock.now());
        let Some(item) = TodoItem::from_input(text, created_at) else {
            debug!("event=todo_add module=service status=skipped reason=blank_input");
            return None;
        };

        let id = item.id;
        self.items.push(item);
        debug!(
            "event=todo_add module=service status=ok id={id} count={}",
            self.items.len()
        );
        self.commit(StoreChange::Added { id });
        Some(id)
    }

    /// Flips `is_done` for `id` and returns the new flag.
    ///
    /// Unknown ids are ignored and return `None`.
    pub fn toggle_done(&mut self, id: TodoId) -> Option<bool> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!("event=todo_toggle module=service status=skipped reason=unknown_id id={id}");
            return None;
        };

        let is_done = item.toggle_done();
        debug!("event=todo_toggle module=service status=ok id={id} is_done={is_done}");
        self.commit(StoreChange::Toggled { id, is_done });
        Some(is_done)
    }

    /// Removes the items at `positions` in one batch.
    ///
    /// Positions index the sequence before removal; duplicates count once and
    /// out-of-range positions are ignored. Returns the removed items in their
    /// original order.
    pub fn delete(&mut self, positions: impl IntoIterator<Item = usize>) -> Vec<TodoItem> {
        let len = self.items.len();
        let targets: BTreeSet<usize> = positions
            .into_iter()
            .filter(|position| *position < len)
            .collect();
        if targets.is_empty() {
            debug!("event=todo_delete module=service status=skipped reason=no_valid_positions");
            return Vec::new();
        }

        let mut removed: Vec<TodoItem> = targets
            .iter()
            .rev()
            .map(|position| self.items.remove(*position))
            .collect();
        removed.reverse();

        let ids: Vec<TodoId> = removed.iter().map(|item| item.id).collect();
        debug!(
            "event=todo_delete module=service status=ok removed={} count={}",
            ids.len(),
            self.items.len()
        );
        self.commit(StoreChange::Deleted { ids });
        removed
    }

    /// Replaces the sequence with the persisted snapshot and notifies.
    ///
    /// Stores whose shape does not persist are left untouched. Returns the
    /// number of items held afterwards.
    pub fn load(&mut self) -> usize {
        if !self.shape.persists() {
            return self.items.len();
        }

        self.items = fit_to_shape(self.snapshot.load(), self.shape);
        let count = self.items.len();
        self.notify(&StoreChange::Loaded { count });
        count
    }

    /// Writes the current sequence to the slot when the shape persists.
    pub fn save(&self) {
        if self.shape.persists() {
            self.snapshot.save(&self.items);
        }
    }

    fn commit(&mut self, change: StoreChange) {
        self.save();
        self.notify(&change);
    }

    fn notify(&mut self, change: &StoreChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_change(change, &self.items);
        }
    }
}

/// Drops fields the active shape does not carry so re-saved slots stay
/// single-shaped.
fn fit_to_shape(mut items: Vec<TodoItem>, shape: RecordShape) -> Vec<TodoItem> {
    if !shape.has_timestamps() {
        for item in &mut items {
            item.created_at = None;
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::{StoreChange, TodoIntent, TodoStore};
    use crate::model::todo_item::{sample_todos, TodoItem};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn ephemeral_store_keeps_seed_items_in_order() {
        let store = TodoStore::ephemeral(sample_todos());
        let contents: Vec<&str> = store.items().iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["밥 먹기", "산책하기", "커피 사기"]);
    }

    #[test]
    fn minimal_shape_never_stamps_items() {
        let mut store = TodoStore::ephemeral(Vec::new());
        let id = store.add("nap").unwrap();
        assert!(store.get(id).unwrap().created_at.is_none());
    }

    #[test]
    fn unsubscribed_listener_stops_receiving_changes() {
        let mut store = TodoStore::ephemeral(Vec::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = store.subscribe(move |change: &StoreChange, _: &[TodoItem]| {
            sink.borrow_mut().push(change.clone());
        });

        assert!(store.dispatch(TodoIntent::Add("one".to_string())));
        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        assert!(store.dispatch(TodoIntent::Add("two".to_string())));

        assert_eq!(seen.borrow().len(), 1);
    }
}
