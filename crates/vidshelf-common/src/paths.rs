//! Path utilities for classifying media files by extension.
//!
//! The classification is coarse: it maps a file extension to the MIME type a
//! browser expects when the file is streamed. It is used both when a file is
//! cataloged and when it is served.

use std::path::Path;

/// Content type used for extensions we do not recognize.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Known video extensions and the content type served for each.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("flv", "video/x-flv"),
    ("wmv", "video/x-ms-wmv"),
    ("mpeg", "video/mpeg"),
    ("m4v", "video/x-m4v"),
    ("3gp", "video/3gpp"),
    ("ts", "video/mp2t"),
    ("webm", "video/webm"),
];

/// Classify a path by its extension.
///
/// Unrecognized or missing extensions fall back to
/// [`FALLBACK_CONTENT_TYPE`] rather than failing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vidshelf_common::paths::classify;
///
/// assert_eq!(classify(Path::new("/videos/movie.mp4")), "video/mp4");
/// assert_eq!(classify(Path::new("clip.3gp")), "video/3gpp");
/// assert_eq!(classify(Path::new("notes.txt")), "application/octet-stream");
/// ```
pub fn classify(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(content_type_for_extension)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Content type for a bare extension (without the leading dot).
///
/// # Examples
///
/// ```
/// use vidshelf_common::paths::content_type_for_extension;
///
/// assert_eq!(content_type_for_extension("mkv"), "video/x-matroska");
/// assert_eq!(content_type_for_extension("MKV"), "video/x-matroska");
/// ```
pub fn content_type_for_extension(ext: &str) -> &'static str {
    let ext = ext.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Extension of a path as UTF-8, without the leading dot.
///
/// Matching against the scan policy is case-sensitive, so the extension is
/// returned as-is.
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}
