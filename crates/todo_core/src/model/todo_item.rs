//! To-do item domain model.
//!
//! # Responsibility
//! - Define the single record held by the item store.
//! - Validate records accepted from user input or decoded from storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `content` is trimmed and non-empty.
//! - `created_at` is display-only and never drives ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable row identity for one to-do item.
pub type TodoId = Uuid;

const CREATED_AT_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Validation failures for a single item or an item sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyContent,
    UntrimmedContent,
    DuplicateId(TodoId),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "todo content cannot be empty"),
            Self::UntrimmedContent => {
                write!(f, "todo content must not have leading or trailing whitespace")
            }
            Self::DuplicateId(id) => write!(f, "duplicate todo id: {id}"),
        }
    }
}

impl Error for TodoValidationError {}

/// One entry of the to-do list.
///
/// Field names on the wire follow the persisted record layout
/// (`id`, `content`, `createdAt`, `isDone`). Missing `id`, `createdAt` and
/// `isDone` are filled with defaults so older record shapes still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: TodoId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_done: bool,
}

impl TodoItem {
    /// Creates a new open item with a generated id and no timestamp.
    ///
    /// The caller is responsible for passing already-trimmed content; use
    /// [`TodoItem::from_input`] for raw user text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            created_at: None,
            is_done: false,
        }
    }

    /// Builds an item from raw input text.
    ///
    /// Returns `None` when the text is empty after trimming.
    pub fn from_input(text: &str, created_at: Option<DateTime<Utc>>) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            created_at,
            ..Self::new(trimmed)
        })
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle_done(&mut self) -> bool {
        self.is_done = !self.is_done;
        self.is_done
    }

    /// Checks the content invariants of this record.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return Err(TodoValidationError::EmptyContent);
        }
        if trimmed.len() != self.content.len() {
            return Err(TodoValidationError::UntrimmedContent);
        }
        Ok(())
    }

    /// Creation time formatted for list rows, `None` for untimestamped records.
    pub fn created_at_label(&self) -> Option<String> {
        self.created_at
            .map(|at| at.format(CREATED_AT_LABEL_FORMAT).to_string())
    }
}

/// Validates every record and rejects duplicate ids.
pub fn validate_items(items: &[TodoItem]) -> Result<(), TodoValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        item.validate()?;
        if !seen.insert(item.id) {
            return Err(TodoValidationError::DuplicateId(item.id));
        }
    }
    Ok(())
}

/// Seed list shown by the first, non-persistent revision of the app.
pub fn sample_todos() -> Vec<TodoItem> {
    let mut first = TodoItem::new("밥 먹기");
    first.is_done = true;
    vec![first, TodoItem::new("산책하기"), TodoItem::new("커피 사기")]
}
