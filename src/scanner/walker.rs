//! Directory tree walker.
//!
//! Produces the candidate set of a crawl: files whose extension is in the
//! scan policy and whose size is at least [`MIN_FILE_SIZE`], outside hidden
//! and ignored directories.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use vidshelf_common::paths::extension_of;
use walkdir::{DirEntry, WalkDir};

use super::policy::PolicyHandle;

/// Files smaller than this are never cataloged. Thumbnails, subtitle
/// sidecars and aborted downloads with a video extension fall below it.
pub const MIN_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// A file that passed every crawl filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<SystemTime>,
}

/// Counters collected during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files_seen: usize,
    pub dirs_pruned: usize,
    pub unsupported: usize,
    pub too_small: usize,
    pub errors: usize,
}

/// Recursive walker driven by a [`PolicyHandle`].
///
/// The policy is consulted live for every entry, so a change made while a
/// walk is running applies to the directories visited after it.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    policy: PolicyHandle,
}

impl TreeWalker {
    pub fn new(policy: PolicyHandle) -> Self {
        Self { policy }
    }

    /// Walk `root` and return every candidate file. Order is unspecified.
    pub fn walk(&self, root: &Path) -> Vec<DiscoveredFile> {
        self.walk_with_stats(root).0
    }

    pub fn walk_with_stats(&self, root: &Path) -> (Vec<DiscoveredFile>, WalkStats) {
        info!("Crawling {:?} for videos", root);
        debug!("Supported formats: {:?}", self.policy.extensions());

        let mut stats = WalkStats::default();
        let pruned = Cell::new(0usize);
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let keep = self.should_descend(entry);
                if !keep {
                    pruned.set(pruned.get() + 1);
                }
                keep
            });

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    // walkdir skips the contents of a directory it cannot read
                    warn!("Skipping unreadable path {:?}: {}", e.path(), e);
                    stats.errors += 1;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            stats.files_seen += 1;

            let supported = extension_of(entry.path())
                .map(|ext| self.policy.is_supported(ext))
                .unwrap_or(false);
            if !supported {
                stats.unsupported += 1;
                continue;
            }

            // Symlinked files are stat'ed through the link; directories are never followed.
            let metadata = if entry.path_is_symlink() {
                std::fs::metadata(entry.path())
            } else {
                entry.metadata().map_err(std::io::Error::from)
            };
            let metadata = match metadata {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Skipping {:?}: {}", entry.path(), e);
                    stats.errors += 1;
                    continue;
                }
            };

            if metadata.len() < MIN_FILE_SIZE {
                debug!(
                    "Skipping {:?}: {} bytes is below the minimum size",
                    entry.path(),
                    metadata.len()
                );
                stats.too_small += 1;
                continue;
            }

            files.push(DiscoveredFile {
                path: entry.into_path(),
                size_bytes: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }

        stats.dirs_pruned = pruned.get();
        debug!("Walk statistics for {:?}: {:?}", root, stats);
        info!("Found {} candidate videos under {:?}", files.len(), root);
        (files, stats)
    }

    /// Prune hidden and ignored directories. The root is always entered.
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            debug!("Pruning hidden directory {:?}", entry.path());
            return false;
        }
        if self.policy.is_ignored(&name) {
            debug!("Pruning ignored directory {:?}", entry.path());
            return false;
        }
        true
    }
}
