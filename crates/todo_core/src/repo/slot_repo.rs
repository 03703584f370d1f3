//! Key-value slot contracts and implementations.
//!
//! # Responsibility
//! - Store one opaque blob per named slot.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A write replaces the whole blob of a slot in one statement.
//! - Slot names are non-empty after trimming.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for slot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidSlotName(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidSlotName(name) => write!(f, "invalid slot name `{name}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidSlotName(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for named blob slots.
pub trait SlotRepository {
    fn read_slot(&self, name: &str) -> RepoResult<Option<Vec<u8>>>;
    fn write_slot(&self, name: &str, value: &[u8]) -> RepoResult<()>;
    fn clear_slot(&self, name: &str) -> RepoResult<()>;
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn read_slot(&self, name: &str) -> RepoResult<Option<Vec<u8>>> {
        (**self).read_slot(name)
    }

    fn write_slot(&self, name: &str, value: &[u8]) -> RepoResult<()> {
        (**self).write_slot(name, value)
    }

    fn clear_slot(&self, name: &str) -> RepoResult<()> {
        (**self).clear_slot(name)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, name: &str) -> RepoResult<Option<Vec<u8>>> {
        let name = normalize_slot_name(name)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE name = ?1;",
                [name],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, name: &str, value: &[u8]) -> RepoResult<()> {
        let name = normalize_slot_name(name)?;
        self.conn.execute(
            "INSERT INTO kv_slots (name, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![name, value],
        )?;
        debug!(
            "event=slot_write module=repo status=ok slot={name} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn clear_slot(&self, name: &str) -> RepoResult<()> {
        let name = normalize_slot_name(name)?;
        self.conn
            .execute("DELETE FROM kv_slots WHERE name = ?1;", [name])?;
        Ok(())
    }
}

/// Process-local slot repository.
#[derive(Debug, Default)]
pub struct MemorySlotRepository {
    slots: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotRepository for MemorySlotRepository {
    fn read_slot(&self, name: &str) -> RepoResult<Option<Vec<u8>>> {
        let name = normalize_slot_name(name)?;
        Ok(self.slots.borrow().get(name).cloned())
    }

    fn write_slot(&self, name: &str, value: &[u8]) -> RepoResult<()> {
        let name = normalize_slot_name(name)?;
        self.slots
            .borrow_mut()
            .insert(name.to_string(), value.to_vec());
        Ok(())
    }

    fn clear_slot(&self, name: &str) -> RepoResult<()> {
        let name = normalize_slot_name(name)?;
        self.slots.borrow_mut().remove(name);
        Ok(())
    }
}

/// Slot repository that keeps nothing: reads are always empty and writes
/// are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ephemeral;

impl SlotRepository for Ephemeral {
    fn read_slot(&self, _name: &str) -> RepoResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn write_slot(&self, _name: &str, _value: &[u8]) -> RepoResult<()> {
        Ok(())
    }

    fn clear_slot(&self, _name: &str) -> RepoResult<()> {
        Ok(())
    }
}

fn normalize_slot_name(name: &str) -> RepoResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidSlotName(name.to_string()));
    }
    Ok(trimmed)
}
