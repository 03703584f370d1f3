//! Core logic for the to-do list: item store, snapshot persistence and
//! the SQLite-backed key-value slots it writes to.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{RecordShape, StoreConfig, DEFAULT_SLOT_NAME};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo_item::{sample_todos, TodoId, TodoItem, TodoValidationError};
pub use repo::slot_repo::{
    Ephemeral, MemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::snapshot::{decode_items, encode_items, CodecError, TodoSnapshot};
pub use service::todo_store::{StoreChange, StoreListener, SubscriptionId, TodoIntent, TodoStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
