//! Video library scanner.
//!
//! This module crawls a directory tree for supported video files, describes
//! each of them, and reconciles the result with the catalog.

pub mod metadata;
pub mod policy;
pub mod sync;
pub mod walker;

use std::path::Path;
use vidshelf_db::NewMediaEntry;

pub use metadata::MetadataExtractor;
pub use policy::{PolicyHandle, ScanPolicy, DEFAULT_EXTENSIONS, DEFAULT_IGNORED_DIRS};
pub use sync::{Reconciler, SyncError, SyncPlan, SyncReport};
pub use walker::{DiscoveredFile, TreeWalker, WalkStats, MIN_FILE_SIZE};

/// Walks a tree and turns every candidate file into a catalog entry.
#[derive(Debug, Clone)]
pub struct Crawler {
    walker: TreeWalker,
    extractor: MetadataExtractor,
}

impl Crawler {
    pub fn new(policy: PolicyHandle) -> Self {
        Self {
            walker: TreeWalker::new(policy),
            extractor: MetadataExtractor::new(),
        }
    }

    /// Crawl `root`. Entry paths are prefixed with `root` as given.
    pub fn crawl(&self, root: &Path) -> Vec<NewMediaEntry> {
        self.crawl_with_stats(root).0
    }

    pub fn crawl_with_stats(&self, root: &Path) -> (Vec<NewMediaEntry>, WalkStats) {
        let (files, stats) = self.walker.walk_with_stats(root);
        let entries = files.iter().map(|f| self.extractor.describe(f)).collect();
        (entries, stats)
    }
}
