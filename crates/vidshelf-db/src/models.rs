//! Internal Rust models matching the database schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vidshelf_common::{size::human_readable_size, EntryId};

/// A cataloged video file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaEntry {
    pub id: EntryId,
    pub title: String,
    pub size_bytes: i64,
    /// Absolute path; the natural key used by reconciliation.
    pub path: String,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MediaEntry {
    /// Size formatted for display ("5.00 MB").
    pub fn human_size(&self) -> String {
        human_readable_size(self.size_bytes)
    }
}

/// A media entry that has not been assigned an id yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMediaEntry {
    pub title: String,
    pub size_bytes: i64,
    pub path: String,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

impl NewMediaEntry {
    /// Whether the file behind `stored` changed since it was cataloged.
    pub fn differs_from(&self, stored: &MediaEntry) -> bool {
        self.size_bytes != stored.size_bytes
            || self.last_modified != stored.last_modified
            || self.title != stored.title
            || self.content_type != stored.content_type
    }
}
