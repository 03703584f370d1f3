//! Repository layer for key-value slot persistence.
//!
//! # Responsibility
//! - Define the slot access contract used by the snapshot service.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repositories treat slot values as opaque bytes.

pub mod slot_repo;
