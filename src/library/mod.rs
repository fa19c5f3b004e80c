//! Library service.
//!
//! The facade the CLI and HTTP layers talk to: it owns the catalog store and
//! the scan policy, runs crawl + reconcile passes, and answers browse,
//! search and detail queries.

pub mod pagination;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use vidshelf_common::{EntryId, Error, Result};
use vidshelf_db::{CatalogStore, MediaEntry};

use crate::scanner::{Crawler, PolicyHandle, Reconciler, SyncError, SyncReport};

pub use pagination::{filter_by_title, paginate, PaginatedView, DEFAULT_PAGE_SIZE};

/// An entry together with the ids of its neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub entry: MediaEntry,
    pub next: Option<EntryId>,
    pub prev: Option<EntryId>,
}

pub struct LibraryService {
    store: Arc<dyn CatalogStore>,
    policy: PolicyHandle,
    reconciler: Reconciler,
    /// Held across a crawl and its reconcile, and by user deletes.
    sync_lock: Mutex<()>,
}

impl LibraryService {
    pub fn new(store: Arc<dyn CatalogStore>, policy: PolicyHandle) -> Self {
        Self {
            reconciler: Reconciler::new(store.clone()),
            store,
            policy,
            sync_lock: Mutex::new(()),
        }
    }

    /// Whether a refresh updates entries whose file changed on disk.
    pub fn with_update_changed(mut self, update_changed: bool) -> Self {
        self.reconciler = self.reconciler.with_update_changed(update_changed);
        self
    }

    pub fn policy(&self) -> &PolicyHandle {
        &self.policy
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Make sure the catalog reflects `root`.
    ///
    /// With `force_refresh` the tree is crawled and reconciled against the
    /// catalog; otherwise only the stored count is reported. A missing root
    /// is an error rather than an empty crawl, so an unmounted drive does not
    /// wipe the catalog. Refreshes and deletes never interleave.
    pub fn ensure_catalog(
        &self,
        root: &Path,
        force_refresh: bool,
    ) -> std::result::Result<SyncReport, SyncError> {
        if !force_refresh {
            return self.reconciler.sync(Vec::new(), false);
        }

        if !root.is_dir() {
            return Err(SyncError::InvalidRoot(root.to_path_buf()));
        }
        let root = absolute_root(root);

        let _guard = self.sync_lock.lock();
        let crawler = Crawler::new(self.policy.clone());
        let discovered = crawler.crawl(&root);
        self.reconciler.sync(discovered, true)
    }

    /// Delete an entry at the user's request: the file first, then the record.
    ///
    /// A file that is already gone is not an error.
    pub fn delete_entry(&self, id: EntryId) -> Result<MediaEntry> {
        let _guard = self.sync_lock.lock();
        let entry = self.store.find_one(id)?;

        match std::fs::remove_file(&entry.path) {
            Ok(()) => info!("Deleted file {}", entry.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("File {} was already gone", entry.path);
            }
            Err(e) => return Err(e.into()),
        }

        self.store.delete_hard(id)?;
        info!("Removed entry {} ({}) from catalog", id, entry.title);
        Ok(entry)
    }

    pub fn get(&self, id: EntryId) -> Result<MediaEntry> {
        self.store.find_one(id)
    }

    /// All entries ordered by id, optionally filtered by title.
    pub fn list(&self, query: Option<&str>) -> Result<Vec<MediaEntry>> {
        let entries = self.store.find_all()?;
        Ok(match query {
            Some(q) => filter_by_title(entries, q),
            None => entries,
        })
    }

    pub fn page(&self, query: Option<&str>, page: usize, page_size: usize) -> Result<PaginatedView> {
        Ok(paginate(self.list(query)?, page, page_size))
    }

    pub fn detail(&self, id: EntryId) -> Result<EntryDetail> {
        let entry = self.store.find_one(id)?;
        let next = neighbor(self.store.next_after(id))?;
        let prev = neighbor(self.store.prev_before(id))?;
        Ok(EntryDetail { entry, next, prev })
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }
}

impl std::fmt::Debug for LibraryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryService")
            .field("policy", &self.policy)
            .field("reconciler", &self.reconciler)
            .finish()
    }
}

fn neighbor(result: Result<MediaEntry>) -> Result<Option<EntryId>> {
    match result {
        Ok(entry) => Ok(Some(entry.id)),
        Err(Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
