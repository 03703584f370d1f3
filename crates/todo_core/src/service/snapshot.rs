//! Whole-list snapshot persistence through one key-value slot.
//!
//! # Responsibility
//! - Encode/decode the full item sequence as one JSON blob.
//! - Load and save with best-effort semantics: failures never reach callers.
//!
//! # Invariants
//! - `load` returns an empty list for an absent, unreadable or invalid blob.
//! - `save` either replaces the whole blob or leaves it untouched.
//! - Log events carry sizes and error text only, never item content.

use crate::model::todo_item::{validate_items, TodoItem, TodoValidationError};
use crate::repo::slot_repo::SlotRepository;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure while converting between items and a slot blob.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    Invalid(TodoValidationError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "todo snapshot is not valid json: {err}"),
            Self::Invalid(err) => write!(f, "todo snapshot failed validation: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<TodoValidationError> for CodecError {
    fn from(value: TodoValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Serializes the full sequence in order.
pub fn encode_items(items: &[TodoItem]) -> Result<Vec<u8>, CodecError> {
    validate_items(items)?;
    Ok(serde_json::to_vec(items)?)
}

/// Deserializes and validates a full sequence.
///
/// Records written by older shapes decode with defaults for missing fields.
pub fn decode_items(bytes: &[u8]) -> Result<Vec<TodoItem>, CodecError> {
    let items: Vec<TodoItem> = serde_json::from_slice(bytes)?;
    validate_items(&items)?;
    Ok(items)
}

/// Snapshot side channel bound to one slot.
pub struct TodoSnapshot<R: SlotRepository> {
    repo: R,
    slot_name: String,
}

impl<R: SlotRepository> TodoSnapshot<R> {
    pub fn new(repo: R, slot_name: impl Into<String>) -> Self {
        Self {
            repo,
            slot_name: slot_name.into(),
        }
    }

    pub fn slot_name(&self) -> &str {
        &self.slot_name
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Reads the slot; any failure yields an empty list.
    pub fn load(&self) -> Vec<TodoItem> {
        let bytes = match self.repo.read_slot(&self.slot_name) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(
                    "event=snapshot_load module=service status=empty slot={}",
                    self.slot_name
                );
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=service status=error error_code=slot_read_failed slot={} error={}",
                    self.slot_name, err
                );
                return Vec::new();
            }
        };

        match decode_items(&bytes) {
            Ok(items) => {
                debug!(
                    "event=snapshot_load module=service status=ok slot={} count={}",
                    self.slot_name,
                    items.len()
                );
                items
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=service status=error error_code=decode_failed slot={} bytes={} error={}",
                    self.slot_name,
                    bytes.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the slot with `items`; failures discard the write.
    pub fn save(&self, items: &[TodoItem]) {
        let bytes = match encode_items(items) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    "event=snapshot_save module=service status=error error_code=encode_failed slot={} error={}",
                    self.slot_name, err
                );
                return;
            }
        };

        if let Err(err) = self.repo.write_slot(&self.slot_name, &bytes) {
            warn!(
                "event=snapshot_save module=service status=error error_code=slot_write_failed slot={} error={}",
                self.slot_name, err
            );
            return;
        }

        debug!(
            "event=snapshot_save module=service status=ok slot={} count={} bytes={}",
            self.slot_name,
            items.len(),
            bytes.len()
        );
    }
}
