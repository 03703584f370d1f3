//! Store configuration.
//!
//! # Responsibility
//! - Name the persistence slot and select the record shape.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Slot name used when the host does not provide one.
pub const DEFAULT_SLOT_NAME: &str = "todos";

/// Record revision produced and persisted by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordShape {
    /// Content and flag only, kept in memory.
    Minimal,
    /// `{id, content, isDone}`, persisted.
    Tracked,
    /// `{id, content, createdAt, isDone}`, persisted.
    #[default]
    Timestamped,
}

impl RecordShape {
    /// Whether mutations are mirrored to the slot.
    pub fn persists(self) -> bool {
        !matches!(self, Self::Minimal)
    }

    /// Whether new items carry a creation timestamp.
    pub fn has_timestamps(self) -> bool {
        matches!(self, Self::Timestamped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Tracked => "tracked",
            Self::Timestamped => "timestamped",
        }
    }
}

impl Display for RecordShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordShape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "tracked" => Ok(Self::Tracked),
            "timestamped" => Ok(Self::Timestamped),
            other => Err(format!(
                "unsupported record shape `{other}`; expected minimal|tracked|timestamped"
            )),
        }
    }
}

/// Configuration for one `TodoStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub slot_name: String,
    pub shape: RecordShape,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            slot_name: DEFAULT_SLOT_NAME.to_string(),
            shape: RecordShape::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_shape(shape: RecordShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }
}
