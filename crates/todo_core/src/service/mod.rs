//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate item mutations and snapshot persistence.
//! - Keep presentation layers decoupled from storage details.

pub mod clock;
pub mod snapshot;
pub mod todo_store;
