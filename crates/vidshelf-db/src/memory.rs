//! In-memory catalog.
//!
//! Mirrors the SQLite semantics: monotonic ids that are never reused, unique
//! paths, and ordering by id.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use vidshelf_common::{EntryId, Error, Result};

use crate::models::{MediaEntry, NewMediaEntry};
use crate::store::CatalogStore;

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<EntryId, MediaEntry>,
    last_id: i64,
}

/// A [`CatalogStore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: RwLock<Inner>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for MemoryCatalog {
    fn find_all(&self) -> Result<Vec<MediaEntry>> {
        Ok(self.inner.read().entries.values().cloned().collect())
    }

    fn find_one(&self, id: EntryId) -> Result<MediaEntry> {
        self.inner
            .read()
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("entry {}", id)))
    }

    fn find_by_path(&self, path: &str) -> Result<MediaEntry> {
        self.inner
            .read()
            .entries
            .values()
            .find(|e| e.path == path)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("entry at {}", path)))
    }

    fn insert(&self, entry: &NewMediaEntry) -> Result<EntryId> {
        let mut inner = self.inner.write();
        if inner.entries.values().any(|e| e.path == entry.path) {
            return Err(Error::conflict(format!(
                "path already cataloged: {}",
                entry.path
            )));
        }

        inner.last_id += 1;
        let id = EntryId::from(inner.last_id);
        inner.entries.insert(
            id,
            MediaEntry {
                id,
                title: entry.title.clone(),
                size_bytes: entry.size_bytes,
                path: entry.path.clone(),
                content_type: entry.content_type.clone(),
                last_modified: entry.last_modified,
                created_at: chrono::Utc::now(),
            },
        );
        Ok(id)
    }

    fn update_metadata(&self, id: EntryId, entry: &NewMediaEntry) -> Result<()> {
        let mut inner = self.inner.write();
        if inner
            .entries
            .values()
            .any(|e| e.path == entry.path && e.id != id)
        {
            return Err(Error::conflict(format!(
                "path already cataloged: {}",
                entry.path
            )));
        }

        let stored = inner
            .entries
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("entry {}", id)))?;
        stored.title = entry.title.clone();
        stored.size_bytes = entry.size_bytes;
        stored.path = entry.path.clone();
        stored.content_type = entry.content_type.clone();
        stored.last_modified = entry.last_modified;
        Ok(())
    }

    fn delete_hard(&self, id: EntryId) -> Result<()> {
        self.inner
            .write()
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("entry {}", id)))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.inner.read().entries.len())
    }

    fn next_after(&self, id: EntryId) -> Result<MediaEntry> {
        let inner = self.inner.read();
        inner
            .entries
            .range((std::ops::Bound::Excluded(id), std::ops::Bound::Unbounded))
            .next()
            .map(|(_, e)| e.clone())
            .ok_or_else(|| Error::not_found(format!("entry after {}", id)))
    }

    fn prev_before(&self, id: EntryId) -> Result<MediaEntry> {
        let inner = self.inner.read();
        inner
            .entries
            .range(..id)
            .next_back()
            .map(|(_, e)| e.clone())
            .ok_or_else(|| Error::not_found(format!("entry before {}", id)))
    }
}
