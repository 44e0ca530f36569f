//! The history store.
//!
//! [`HistoryStore`] owns the ordered list of generated entries (newest
//! first), keeps it in a [`Medium`] as one JSON array under a single key, and
//! writes through to the medium after every mutation.
//!
//! Loading never fails: a missing key, unreadable medium or malformed value
//! all yield an empty history. Writing may fail; the in-memory history then
//! stays authoritative and the failure is kept in [`HistoryStore::persist_error`].

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::entry::{Entry, EntryId};
use crate::error::Error;
use crate::storage::{Medium, DEFAULT_KEY};

/// Ordered entries, newest first, persisted through a [`Medium`].
#[derive(Debug)]
pub struct HistoryStore<M: Medium> {
    medium: M,
    key: String,
    entries: Vec<Entry>,
    next_id: EntryId,
    persist_error: Option<Error>,
}

impl<M: Medium> HistoryStore<M> {
    /// Open the history stored under the default key.
    #[must_use]
    pub fn open(medium: M) -> Self {
        Self::open_with_key(medium, DEFAULT_KEY)
    }

    /// Open the history stored under `key`.
    #[must_use]
    pub fn open_with_key(medium: M, key: impl Into<String>) -> Self {
        let mut store = Self {
            medium,
            key: key.into(),
            entries: Vec::new(),
            next_id: EntryId::new(1),
            persist_error: None,
        };
        store.load();
        store
    }

    /// Re-read the history from the medium, replacing the in-memory copy.
    pub fn load(&mut self) -> &[Entry] {
        self.entries = read_entries(&self.medium, &self.key);
        self.next_id = assign_missing_ids(&mut self.entries);
        debug!("Loaded {} history entries", self.entries.len());
        &self.entries
    }

    /// Add a new entry for `raw_text`.
    ///
    /// The text is trimmed. Blank text is ignored: nothing changes, nothing
    /// is written, and `None` is returned.
    pub fn add(&mut self, raw_text: &str) -> Option<&Entry> {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("Ignoring blank input");
            return None;
        }

        let id = self.allocate_id();
        self.entries.insert(0, Entry::new(id, text.to_string()));
        debug!("Added entry {}", id);

        self.persist();
        self.entries.first()
    }

    /// Replace the text of the entry at `index` and refresh its timestamp.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or `text` is blank. Callers resolve
    /// user-facing ids with [`HistoryStore::position`] and validate text first.
    pub fn edit(&mut self, index: usize, text: &str) -> &Entry {
        assert!(
            index < self.entries.len(),
            "edit index {index} out of range for history of length {}",
            self.entries.len()
        );
        assert!(!text.trim().is_empty(), "edit text must not be blank");

        self.entries[index].replace_text(text.to_string());
        debug!("Edited entry {}", self.entries[index].id);

        self.persist();
        &self.entries[index]
    }

    /// Remove and return the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn delete(&mut self, index: usize) -> Entry {
        assert!(
            index < self.entries.len(),
            "delete index {index} out of range for history of length {}",
            self.entries.len()
        );

        let removed = self.entries.remove(index);
        debug!("Deleted entry {}", removed.id);

        self.persist();
        removed
    }

    /// Remove every entry and drop the stored key.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!("Cleared {} entries", count);

        match self.medium.remove(&self.key) {
            Ok(()) => self.persist_error = None,
            Err(e) => self.record_failure(e),
        }
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The most recently added entry.
    #[must_use]
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.first()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current position of the entry with `id`.
    #[must_use]
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// The entry with `id`.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Key the history is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying medium.
    #[must_use]
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Mutable access to the underlying medium.
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// The error from the most recent failed write, cleared by the next
    /// successful one.
    #[must_use]
    pub fn persist_error(&self) -> Option<&Error> {
        self.persist_error.as_ref()
    }

    /// Whether the medium may lag behind the in-memory history.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.persist_error.is_some()
    }

    /// Take the most recent write error, if any.
    pub fn take_persist_error(&mut self) -> Option<Error> {
        self.persist_error.take()
    }

    /// Consume the store and return its medium.
    pub fn into_medium(self) -> M {
        self.medium
    }

    /// Hand out the next id, renumbering the history once the id range is
    /// exhausted.
    fn allocate_id(&mut self) -> EntryId {
        if self.next_id.checked_next().is_none() {
            warn!(
                "History ids exhausted; renumbering {} entries",
                self.entries.len()
            );
            self.next_id = renumber(&mut self.entries);
        }
        let id = self.next_id;
        self.next_id = id.checked_next().unwrap_or(id);
        id
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(Error::from)
            .and_then(|json| self.medium.set(&self.key, &json));
        match result {
            Ok(()) => self.persist_error = None,
            Err(e) => self.record_failure(e),
        }
    }

    fn record_failure(&mut self, error: Error) {
        warn!(
            "Failed to persist history under '{}': {}; keeping in-memory state",
            self.key, error
        );
        self.persist_error = Some(error);
    }
}

fn read_entries<M: Medium>(medium: &M, key: &str) -> Vec<Entry> {
    let raw = match medium.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read history under '{}': {}; starting empty", key, e);
            return Vec::new();
        }
    };

    let entries: Vec<Entry> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Ignoring malformed history under '{}': {}", key, e);
            return Vec::new();
        }
    };

    let before = entries.len();
    let entries: Vec<Entry> = entries.into_iter().filter(|e| !e.is_blank()).collect();
    if entries.len() < before {
        warn!("Dropped {} blank history entries", before - entries.len());
    }
    entries
}

/// Give every unassigned entry an id above the highest existing one, oldest
/// first, and return the next free id.
///
/// Duplicate ids are also reassigned so that ids stay unique. If the id range
/// runs out the whole history is renumbered from 1.
fn assign_missing_ids(entries: &mut [Entry]) -> EntryId {
    let mut next = entries
        .iter()
        .map(|entry| entry.id)
        .max()
        .unwrap_or_default()
        .checked_next();

    let mut seen = HashSet::new();
    for entry in entries.iter_mut().rev() {
        if entry.id.is_assigned() && seen.insert(entry.id) {
            continue;
        }
        let Some(id) = next else {
            break;
        };
        entry.id = id;
        seen.insert(id);
        next = id.checked_next();
    }

    match next {
        Some(next) => next,
        None => {
            warn!(
                "Stored history ids reach the top of the id range; renumbering {} entries",
                entries.len()
            );
            renumber(entries)
        }
    }
}

/// Number entries 1, 2, ... oldest first and return the next free id.
fn renumber(entries: &mut [Entry]) -> EntryId {
    let mut next = EntryId::new(1);
    for entry in entries.iter_mut().rev() {
        entry.id = next;
        next = EntryId::new(next.get() + 1);
    }
    next
}
