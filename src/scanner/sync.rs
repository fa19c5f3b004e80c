//! Catalog reconciliation.
//!
//! Aligns the catalog with the result of a crawl, keyed by file path.
//! Deletions are applied before insertions. Each store call is atomic, but a
//! pass as a whole is not: when a step fails the pass stops, the changes
//! already applied stay applied, and the error reports the failing step
//! together with what had been done so far.
//!
//! The reconciler does not serialize passes itself. Callers that crawl and
//! then sync hold their own lock across both steps.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use vidshelf_common::{EntryId, Error};
use vidshelf_db::{CatalogStore, MediaEntry, NewMediaEntry};

/// Outcome of a sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Entries in the catalog after the pass.
    pub count: usize,
    pub inserted: usize,
    pub deleted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// False when the pass short-circuited to a count.
    pub crawled: bool,
}

/// A sync pass that stopped early.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("crawl root {0:?} is not a directory")]
    InvalidRoot(std::path::PathBuf),

    #[error("failed to load catalog: {0}")]
    Load(#[source] Error),

    #[error("failed to count catalog entries: {0}")]
    Count(#[source] Error),

    #[error("failed to delete entry {id} ({path}): {source}")]
    Delete {
        id: EntryId,
        path: String,
        #[source]
        source: Error,
        applied: SyncReport,
    },

    #[error("failed to insert {path}: {source}")]
    Insert {
        path: String,
        #[source]
        source: Error,
        applied: SyncReport,
    },

    #[error("failed to update entry {id} ({path}): {source}")]
    Update {
        id: EntryId,
        path: String,
        #[source]
        source: Error,
        applied: SyncReport,
    },
}

impl SyncError {
    /// Changes committed before the failure.
    pub fn applied(&self) -> Option<SyncReport> {
        match self {
            Self::Delete { applied, .. }
            | Self::Insert { applied, .. }
            | Self::Update { applied, .. } => Some(*applied),
            _ => None,
        }
    }
}

/// Diff of a crawl against the stored catalog.
#[derive(Debug, Default)]
pub struct SyncPlan {
    pub to_delete: Vec<MediaEntry>,
    pub to_insert: Vec<NewMediaEntry>,
    pub to_update: Vec<(EntryId, NewMediaEntry)>,
    pub unchanged: usize,
}

impl SyncPlan {
    /// Compute the plan. Duplicate discovered paths collapse to the last one.
    pub fn compute(stored: Vec<MediaEntry>, discovered: Vec<NewMediaEntry>, update_changed: bool) -> Self {
        let discovered: HashMap<String, NewMediaEntry> = discovered
            .into_iter()
            .map(|entry| (entry.path.clone(), entry))
            .collect();
        let stored_paths: HashMap<&str, &MediaEntry> =
            stored.iter().map(|e| (e.path.as_str(), e)).collect();

        let mut plan = Self::default();
        for (path, entry) in &discovered {
            match stored_paths.get(path.as_str()) {
                None => plan.to_insert.push(entry.clone()),
                Some(existing) if update_changed && entry.differs_from(existing) => {
                    plan.to_update.push((existing.id, entry.clone()));
                }
                Some(_) => plan.unchanged += 1,
            }
        }
        plan.to_delete = stored
            .iter()
            .filter(|e| !discovered.contains_key(&e.path))
            .cloned()
            .collect();

        // Deterministic application order.
        plan.to_insert.sort_by(|a, b| a.path.cmp(&b.path));
        plan.to_update.sort_by_key(|(id, _)| *id);
        plan
    }
}

/// Applies crawl results to a [`CatalogStore`].
pub struct Reconciler {
    store: Arc<dyn CatalogStore>,
    update_changed: bool,
}

impl Reconciler {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            update_changed: true,
        }
    }

    /// Whether same-path entries whose size or mtime changed are refreshed in place.
    pub fn with_update_changed(mut self, update_changed: bool) -> Self {
        self.update_changed = update_changed;
        self
    }

    /// Reconcile the catalog with `discovered`.
    ///
    /// Without `force` nothing is diffed and the stored count is returned.
    /// An entry removed by someone else between the load and its own delete
    /// counts as deleted. One that vanished before its update is inserted
    /// again.
    pub fn sync(&self, discovered: Vec<NewMediaEntry>, force: bool) -> Result<SyncReport, SyncError> {
        if !force {
            let count = self.store.count().map_err(SyncError::Count)?;
            return Ok(SyncReport {
                count,
                ..SyncReport::default()
            });
        }

        let stored = self.store.find_all().map_err(SyncError::Load)?;
        let stored_count = stored.len();
        let plan = SyncPlan::compute(stored, discovered, self.update_changed);
        debug!(
            "Sync plan: {} to delete, {} to insert, {} to update, {} unchanged",
            plan.to_delete.len(),
            plan.to_insert.len(),
            plan.to_update.len(),
            plan.unchanged
        );

        let mut report = SyncReport {
            count: stored_count,
            unchanged: plan.unchanged,
            crawled: true,
            ..SyncReport::default()
        };

        for entry in plan.to_delete {
            match self.store.delete_hard(entry.id) {
                Ok(()) => debug!("Removed {} from catalog", entry.path),
                Err(e) if e.is_not_found() => debug!("{} was already removed", entry.path),
                Err(source) => {
                    return Err(SyncError::Delete {
                        id: entry.id,
                        path: entry.path,
                        source,
                        applied: report,
                    })
                }
            }
            report.deleted += 1;
            report.count -= 1;
        }

        let mut to_insert = plan.to_insert;
        for (id, entry) in plan.to_update {
            match self.store.update_metadata(id, &entry) {
                Ok(()) => {
                    debug!("Refreshed metadata of {}", entry.path);
                    report.updated += 1;
                }
                Err(e) if e.is_not_found() => {
                    debug!("{} vanished before its refresh, adding it back", entry.path);
                    report.count -= 1;
                    to_insert.push(entry);
                }
                Err(source) => {
                    return Err(SyncError::Update {
                        id,
                        path: entry.path,
                        source,
                        applied: report,
                    })
                }
            }
        }

        for entry in to_insert {
            self.store
                .insert(&entry)
                .map_err(|source| SyncError::Insert {
                    path: entry.path.clone(),
                    source,
                    applied: report,
                })?;
            debug!("Added {} to catalog", entry.path);
            report.inserted += 1;
            report.count += 1;
        }

        info!(
            "Catalog synced: {} entries ({} added, {} removed, {} refreshed)",
            report.count, report.inserted, report.deleted, report.updated
        );
        Ok(report)
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("update_changed", &self.update_changed)
            .finish()
    }
}
