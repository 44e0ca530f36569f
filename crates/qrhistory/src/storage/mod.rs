//! Persistent key-value media for the history.
//!
//! The history store never touches files or databases directly. It is handed
//! a [`Medium`] at construction and keeps its whole state as one JSON string
//! under a single key. Three media are provided:
//!
//! - [`MemoryMedium`]: an in-process map, used as a fake in tests.
//! - [`FileMedium`]: one JSON file per key inside a data directory.
//! - [`SqliteMedium`]: a key-value table in a `SQLite` database.

mod file;
mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use file::FileMedium;
pub use memory::MemoryMedium;
pub use sqlite::SqliteMedium;

/// Default key under which the history is stored.
pub const DEFAULT_KEY: &str = "qr-history";

/// A synchronous key-value storage substrate.
///
/// Implementations are single-process and owned exclusively by one history
/// store; no locking or conflict resolution is expected of them.
pub trait Medium: fmt::Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be modified.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Human-readable location of the medium, for status output.
    fn location(&self) -> String;
}

impl<M: Medium + ?Sized> Medium for Box<M> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Which medium backs the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// One JSON file per key.
    #[default]
    File,
    /// A `SQLite` key-value table.
    Sqlite,
    /// Process memory only; nothing survives the process.
    Memory,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Check that a key can be used by every medium.
///
/// Keys double as file names for [`FileMedium`], so they are limited to
/// ASCII letters, digits, `-` and `_`.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] if the key is empty or has other characters.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_key(key))
    }
}
