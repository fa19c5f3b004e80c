//! Human readable byte sizes.

/// Format a byte count the way the catalog listing shows it.
///
/// Sizes under 1 KiB are printed as whole bytes, larger sizes with two
/// decimals in KB, MB or GB (binary multiples).
///
/// # Examples
///
/// ```
/// use vidshelf_common::size::human_readable_size;
///
/// assert_eq!(human_readable_size(512), "512 B");
/// assert_eq!(human_readable_size(5 * 1024 * 1024), "5.00 MB");
/// ```
pub fn human_readable_size(size: i64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let bytes = size as f64;
    if bytes < KB {
        format!("{} B", size)
    } else if bytes < MB {
        format!("{:.2} KB", bytes / KB)
    } else if bytes < GB {
        format!("{:.2} MB", bytes / MB)
    } else {
        format!("{:.2} GB", bytes / GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable_size(0), "0 B");
        assert_eq!(human_readable_size(1023), "1023 B");
        assert_eq!(human_readable_size(1024), "1.00 KB");
        assert_eq!(human_readable_size(1536), "1.50 KB");
        assert_eq!(human_readable_size(2 * 1024 * 1024), "2.00 MB");
        assert_eq!(human_readable_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
