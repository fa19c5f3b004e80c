//! Extension and ignore-list policy for library scans.
//!
//! The policy is read once per filesystem entry during a crawl and changed
//! rarely (from the config file at startup or through the API), so the
//! shared handle sits behind a read-write lock. Changes only affect entries
//! visited after the change.

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Extensions cataloged by default (formats browsers play natively).
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4", "webm", "3gp"];

/// Directory names skipped by default: tool and VM trees that commonly
/// contain sample videos nobody wants in a library.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "AndroidStudioProjects",
    "Android",
    "NetBeansProjects",
    "node_modules",
    "Qt",
    "VirtualBoxVMs",
    "vmime",
    "venv",
    "env",
];

/// Which files a crawl considers and which directories it skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPolicy {
    extensions: BTreeSet<String>,
    ignored_dirs: BTreeSet<String>,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSIONS.iter().copied(),
            DEFAULT_IGNORED_DIRS.iter().copied(),
        )
    }
}

/// Extensions are stored without the leading dot.
fn normalize_extension(ext: &str) -> &str {
    let ext = ext.trim();
    ext.strip_prefix('.').unwrap_or(ext)
}

impl ScanPolicy {
    pub fn new<E, D>(extensions: E, ignored_dirs: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let mut policy = Self {
            extensions: BTreeSet::new(),
            ignored_dirs: BTreeSet::new(),
        };
        for ext in extensions {
            policy.add_extension(ext.as_ref());
        }
        for dir in ignored_dirs {
            policy.add_ignored_dir(dir.as_ref());
        }
        policy
    }

    /// Case-sensitive; a leading dot is accepted (`".mp4"` and `"mp4"` match alike).
    pub fn is_supported(&self, extension: &str) -> bool {
        self.extensions.contains(normalize_extension(extension))
    }

    pub fn add_extension(&mut self, extension: &str) {
        let ext = normalize_extension(extension);
        if !ext.is_empty() {
            self.extensions.insert(ext.to_string());
        }
    }

    /// Removing an unknown extension is a no-op.
    pub fn remove_extension(&mut self, extension: &str) {
        self.extensions.remove(normalize_extension(extension));
    }

    pub fn extensions(&self) -> Vec<String> {
        self.extensions.iter().cloned().collect()
    }

    pub fn is_ignored(&self, dir_name: &str) -> bool {
        self.ignored_dirs.contains(dir_name)
    }

    pub fn add_ignored_dir(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.ignored_dirs.insert(name.to_string());
        }
    }

    /// Removing an unknown name is a no-op.
    pub fn remove_ignored_dir(&mut self, name: &str) {
        self.ignored_dirs.remove(name.trim());
    }

    pub fn ignored_dirs(&self) -> Vec<String> {
        self.ignored_dirs.iter().cloned().collect()
    }
}

/// Shared, runtime-mutable handle to a [`ScanPolicy`].
#[derive(Debug, Clone, Default)]
pub struct PolicyHandle {
    inner: Arc<RwLock<ScanPolicy>>,
}

impl From<ScanPolicy> for PolicyHandle {
    fn from(policy: ScanPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(policy)),
        }
    }
}

impl PolicyHandle {
    pub fn is_supported(&self, extension: &str) -> bool {
        self.inner.read().is_supported(extension)
    }

    pub fn is_ignored(&self, dir_name: &str) -> bool {
        self.inner.read().is_ignored(dir_name)
    }

    pub fn add_extension(&self, extension: &str) {
        self.inner.write().add_extension(extension);
        tracing::debug!("Added supported extension {:?}", extension);
    }

    pub fn remove_extension(&self, extension: &str) {
        self.inner.write().remove_extension(extension);
        tracing::debug!("Removed supported extension {:?}", extension);
    }

    pub fn add_ignored_dir(&self, name: &str) {
        self.inner.write().add_ignored_dir(name);
        tracing::debug!("Added ignored directory {:?}", name);
    }

    pub fn remove_ignored_dir(&self, name: &str) {
        self.inner.write().remove_ignored_dir(name);
        tracing::debug!("Removed ignored directory {:?}", name);
    }

    pub fn extensions(&self) -> Vec<String> {
        self.inner.read().extensions()
    }

    pub fn ignored_dirs(&self) -> Vec<String> {
        self.inner.read().ignored_dirs()
    }

    /// Copy of the current policy.
    pub fn snapshot(&self) -> ScanPolicy {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = ScanPolicy::default();
        assert!(policy.is_supported("mp4"));
        assert!(policy.is_supported("webm"));
        assert!(policy.is_supported("3gp"));
        assert!(!policy.is_supported("mkv"));

        assert!(policy.is_ignored("node_modules"));
        assert!(policy.is_ignored("venv"));
        assert!(!policy.is_ignored("Movies"));
        assert_eq!(policy.ignored_dirs().len(), DEFAULT_IGNORED_DIRS.len());
    }

    #[test]
    fn test_extension_matching_is_case_sensitive() {
        let policy = ScanPolicy::default();
        assert!(!policy.is_supported("MP4"));
        assert!(policy.is_supported(".mp4"));
    }

    #[test]
    fn test_add_and_remove_extension() {
        let mut policy = ScanPolicy::default();
        policy.add_extension(".mkv");
        assert!(policy.is_supported("mkv"));
        assert!(policy.extensions().contains(&"mkv".to_string()));

        policy.remove_extension("mkv");
        assert!(!policy.is_supported("mkv"));

        // Removing something that was never there is fine.
        policy.remove_extension("avi");
        assert_eq!(policy.extensions(), vec!["3gp", "mp4", "webm"]);
    }

    #[test]
    fn test_empty_names_are_ignored() {
        let mut policy = ScanPolicy::new(Vec::<String>::new(), Vec::<String>::new());
        policy.add_extension(".");
        policy.add_ignored_dir("  ");
        assert!(policy.extensions().is_empty());
        assert!(policy.ignored_dirs().is_empty());
    }

    #[test]
    fn test_ignored_dir_names_match_exactly() {
        let mut policy = ScanPolicy::default();
        policy.add_ignored_dir("Samples");
        assert!(policy.is_ignored("Samples"));
        assert!(!policy.is_ignored("samples"));
        assert!(!policy.is_ignored("Samples2"));

        policy.remove_ignored_dir("Samples");
        policy.remove_ignored_dir("does-not-exist");
        assert!(!policy.is_ignored("Samples"));
    }

    #[test]
    fn test_handle_shares_state() {
        let handle = PolicyHandle::default();
        let clone = handle.clone();

        clone.add_extension("mkv");
        assert!(handle.is_supported("mkv"));

        let snapshot = handle.snapshot();
        handle.remove_extension("mkv");
        assert!(snapshot.is_supported("mkv"));
        assert!(!clone.is_supported("mkv"));
    }
}
