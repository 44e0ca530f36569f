use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{migrations, Medium};

/// Path reported for in-memory databases.
const MEMORY_PATH: &str = ":memory:";

/// Medium backed by a `kv_store` table in a `SQLite` database.
#[derive(Debug)]
pub struct SqliteMedium {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteMedium {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(MEMORY_PATH),
            conn,
        })
    }

    /// Path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Medium for SqliteMedium {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, now],
        )?;
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        debug!("Removed {} row(s) for {}", affected, key);
        Ok(())
    }

    fn location(&self) -> String {
        self.path().display().to_string()
    }
}
