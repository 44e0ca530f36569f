use std::collections::HashMap;

use crate::error::{Error, Result};

use super::Medium;

/// In-memory medium.
///
/// Counts successful writes and can be told to fail them, which lets tests
/// observe when the history store persists and how it degrades when it
/// cannot.
#[derive(Debug, Default, Clone)]
pub struct MemoryMedium {
    values: HashMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryMedium {
    /// Create an empty medium.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a medium that already holds `value` under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut medium = Self::new();
        medium.values.insert(key.to_string(), value.to_string());
        medium
    }

    /// Number of successful `set` and `remove` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw value stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "memory medium is refusing writes",
            )));
        }
        Ok(())
    }
}

impl Medium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.values.remove(key);
        self.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }
}
