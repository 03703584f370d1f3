//! To-do domain model.
//!
//! # Responsibility
//! - Define the record shared by the store, the snapshot codec and views.
//!
//! # Invariants
//! - Every item is identified by a stable `TodoId`.
//! - Deletion is a hard removal from the sequence; there are no tombstones.

pub mod todo_item;
