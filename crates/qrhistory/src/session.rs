//! Interactive state on top of the history store.
//!
//! A [`Session`] holds what the user is typing and which entry, if any, is
//! being edited along with its draft text. None of this is persisted: the
//! store only sees the result when the user generates a code or saves an
//! edit. User-supplied ids are resolved here, so the store's index contract
//! is never violated.

use tracing::debug;

use crate::entry::{Entry, EntryId};
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::render::MAX_ENCODABLE_BYTES;
use crate::storage::Medium;

/// Edit mode: the entry being edited and the text typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    /// Entry being edited.
    pub id: EntryId,
    /// Uncommitted replacement text.
    pub text: String,
}

/// The user's view of a history: input, edit mode and the store itself.
#[derive(Debug)]
pub struct Session<M: Medium> {
    store: HistoryStore<M>,
    input: String,
    editing: Option<EditDraft>,
    max_text_length: usize,
}

impl<M: Medium> Session<M> {
    /// Start a session over `store`.
    #[must_use]
    pub fn new(store: HistoryStore<M>) -> Self {
        Self {
            store,
            input: String::new(),
            editing: None,
            max_text_length: MAX_ENCODABLE_BYTES,
        }
    }

    /// Limit accepted text to `max` bytes.
    #[must_use]
    pub fn with_max_text_length(mut self, max: usize) -> Self {
        self.max_text_length = max;
        self
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &HistoryStore<M> {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut HistoryStore<M> {
        &mut self.store
    }

    /// Consume the session and return the store.
    pub fn into_store(self) -> HistoryStore<M> {
        self.store
    }

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Commit the input as a new entry.
    ///
    /// Blank input is ignored and kept as is, returning `Ok(None)`. On success
    /// the input is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLong`] if the trimmed input cannot fit in a QR
    /// code; the input is kept so it can be corrected.
    pub fn generate(&mut self) -> Result<Option<&Entry>> {
        let trimmed_len = self.input.trim().len();
        if trimmed_len == 0 {
            return Ok(None);
        }
        self.check_length(trimmed_len)?;

        let input = std::mem::take(&mut self.input);
        Ok(self.store.add(&input))
    }

    /// Enter edit mode for `id`, starting the draft from its current text.
    ///
    /// Any draft for another entry is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if no entry has that id.
    pub fn begin_edit(&mut self, id: EntryId) -> Result<&EditDraft> {
        let entry = self.store.get(id).ok_or(Error::EntryNotFound { id })?;
        debug!("Editing entry {}", id);
        let draft = EditDraft {
            id,
            text: entry.text.clone(),
        };
        Ok(&*self.editing.insert(draft))
    }

    /// Replace the draft text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEditing`] outside edit mode.
    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<()> {
        let draft = self.editing.as_mut().ok_or(Error::NotEditing)?;
        draft.text = text.into();
        Ok(())
    }

    /// The current edit draft, if in edit mode.
    #[must_use]
    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    /// Commit the draft to the entry being edited and leave edit mode.
    ///
    /// # Errors
    ///
    /// - [`Error::NotEditing`] outside edit mode.
    /// - [`Error::EmptyText`] or [`Error::TextTooLong`] if the draft is
    ///   rejected; edit mode is kept so the draft can be fixed.
    /// - [`Error::EntryNotFound`] if the entry disappeared; edit mode is left.
    pub fn save_edit(&mut self) -> Result<&Entry> {
        let draft = self.editing.as_ref().ok_or(Error::NotEditing)?;
        if draft.text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        self.check_length(draft.text.len())?;

        let Some(draft) = self.editing.take() else {
            return Err(Error::NotEditing);
        };
        let index = self
            .store
            .position(draft.id)
            .ok_or(Error::EntryNotFound { id: draft.id })?;
        Ok(self.store.edit(index, &draft.text))
    }

    /// Leave edit mode without touching the history.
    ///
    /// Returns the discarded draft, if any.
    pub fn cancel_edit(&mut self) -> Option<EditDraft> {
        self.editing.take()
    }

    /// Delete the entry with `id`.
    ///
    /// Leaves edit mode if that entry was being edited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] if no entry has that id.
    pub fn delete(&mut self, id: EntryId) -> Result<Entry> {
        let index = self.store.position(id).ok_or(Error::EntryNotFound { id })?;
        if self.editing.as_ref().is_some_and(|draft| draft.id == id) {
            self.editing = None;
        }
        Ok(self.store.delete(index))
    }

    /// Delete every entry and leave edit mode.
    pub fn clear(&mut self) {
        self.editing = None;
        self.store.clear();
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&Entry> {
        self.store.latest()
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        self.store.entries()
    }

    fn check_length(&self, len: usize) -> Result<()> {
        if len > self.max_text_length {
            return Err(Error::TextTooLong {
                len,
                max: self.max_text_length,
            });
        }
        Ok(())
    }
}
