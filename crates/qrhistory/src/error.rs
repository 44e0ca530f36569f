//! Error types for qrhistory.
//!
//! This module defines all error types used throughout the qrhistory crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::entry::EntryId;

/// The main error type for qrhistory operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A storage key contains characters the medium cannot hold.
    #[error("invalid storage key '{key}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === History Errors ===
    /// No entry carries the given id.
    #[error("no history entry with id {id}")]
    EntryNotFound {
        /// The id that was looked up.
        id: EntryId,
    },

    /// The text to commit is empty or whitespace only.
    #[error("text must not be empty")]
    EmptyText,

    /// The text is longer than a QR code can carry.
    #[error("text is {len} bytes, the maximum is {max}")]
    TextTooLong {
        /// Length of the rejected text in bytes.
        len: usize,
        /// Configured maximum in bytes.
        max: usize,
    },

    /// An edit operation was requested while no entry is being edited.
    #[error("no entry is being edited")]
    NotEditing,

    // === Render Errors ===
    /// The QR encoder rejected the input.
    #[error("failed to render QR code: {0}")]
    Render(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for qrhistory operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(err: qrcode::types::QrError) -> Self {
        Self::Render(err.to_string())
    }
}

impl Error {
    /// Create an invalid key error.
    #[must_use]
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Check if this error means the addressed entry does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntryNotFound { .. })
    }
}
