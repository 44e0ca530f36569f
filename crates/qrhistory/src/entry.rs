//! Core history entry types.
//!
//! An [`Entry`] pairs the text that was encoded into a QR code with the
//! instant it was generated or last edited.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a history entry.
///
/// Ids are assigned by the history store when an entry is created and never
/// change afterwards, so they stay valid while other entries are added,
/// edited or deleted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` at the top of the range.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Whether this id has been assigned. Zero marks records written
    /// before ids existed.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// One generated QR code in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier (assigned by the history store).
    #[serde(default, skip_serializing_if = "is_unassigned")]
    pub id: EntryId,

    /// The text encoded into the QR code.
    pub text: String,

    /// When the entry was created or last edited.
    pub timestamp: DateTime<Utc>,

    /// When the entry was first created. Not touched by edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_unassigned(id: &EntryId) -> bool {
    !id.is_assigned()
}

impl Entry {
    /// Create a new entry stamped with the current time.
    #[must_use]
    pub fn new(id: EntryId, text: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            text,
            timestamp: now,
            created: Some(now),
        }
    }

    /// Replace the text and refresh the timestamp.
    ///
    /// The creation time is kept.
    pub fn replace_text(&mut self, text: String) {
        if self.created.is_none() {
            self.created = Some(self.timestamp);
        }
        self.text = text;
        self.timestamp = Utc::now();
    }

    /// When the entry was first created, falling back to the last-edit time
    /// for records that predate the `created` field.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created.unwrap_or(self.timestamp)
    }

    /// Whether the entry has been edited since it was created.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.created.is_some_and(|created| created != self.timestamp)
    }

    /// Whether the text would be rejected as blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
