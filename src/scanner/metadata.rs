//! File metadata extraction.
//!
//! Turns a path on disk into a [`NewMediaEntry`]: display title, byte size,
//! modification time and content type.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::SystemTime;
use vidshelf_common::{paths, Error, Result};
use vidshelf_db::NewMediaEntry;

use super::walker::DiscoveredFile;

/// Builds catalog entries from files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Content type for a path, `application/octet-stream` if unknown.
    pub fn classify(&self, path: &Path) -> &'static str {
        paths::classify(path)
    }

    /// Stat a single file and describe it.
    ///
    /// Fails with [`Error::Io`] when the file vanished or cannot be read,
    /// which happens when files move while a crawl is running.
    pub fn extract(&self, path: &Path) -> Result<NewMediaEntry> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(Error::invalid_input(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        Ok(self.build(path, metadata.len(), metadata.modified().ok()))
    }

    /// Describe a file the walker already stat'ed.
    pub fn describe(&self, file: &DiscoveredFile) -> NewMediaEntry {
        self.build(&file.path, file.size_bytes, file.modified)
    }

    fn build(&self, path: &Path, size: u64, modified: Option<SystemTime>) -> NewMediaEntry {
        NewMediaEntry {
            title: title_for(path),
            size_bytes: i64::try_from(size).unwrap_or(i64::MAX),
            path: path.to_string_lossy().into_owned(),
            content_type: self.classify(path).to_string(),
            last_modified: DateTime::<Utc>::from(modified.unwrap_or(SystemTime::UNIX_EPOCH)),
        }
    }
}

/// Display title: the file's base name.
fn title_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extract_reads_size_and_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.mp4");
        fs::write(&path, vec![0u8; 4096]).unwrap();

        let entry = MetadataExtractor::new().extract(&path).unwrap();
        assert_eq!(entry.title, "holiday.mp4");
        assert_eq!(entry.size_bytes, 4096);
        assert_eq!(entry.content_type, "video/mp4");
        assert_eq!(entry.path, path.to_string_lossy());

        let mtime: DateTime<Utc> = fs::metadata(&path).unwrap().modified().unwrap().into();
        assert_eq!(entry.last_modified, mtime);
    }

    #[test]
    fn test_extract_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MetadataExtractor::new()
            .extract(&dir.path().join("gone.mp4"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_extract_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = MetadataExtractor::new().extract(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_classify_unknown_falls_back() {
        let extractor = MetadataExtractor::new();
        assert_eq!(extractor.classify(Path::new("a.webm")), "video/webm");
        assert_eq!(
            extractor.classify(Path::new("a.xyz")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_describe_uses_walker_metadata() {
        let file = DiscoveredFile {
            path: "/videos/trip.3gp".into(),
            size_bytes: 3 * 1024 * 1024,
            modified: None,
        };
        let entry = MetadataExtractor::new().describe(&file);
        assert_eq!(entry.title, "trip.3gp");
        assert_eq!(entry.content_type, "video/3gpp");
        assert_eq!(entry.size_bytes, 3 * 1024 * 1024);
        assert_eq!(entry.last_modified, DateTime::<Utc>::from(SystemTime::UNIX_EPOCH));
    }
}
