//! Title search and page slicing over catalog listings.

use serde::{Deserialize, Serialize};
use vidshelf_db::MediaEntry;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a listing.
///
/// `next` and `prev` are the adjacent page numbers and are not clamped:
/// `prev` is 0 on the first page and `next` may point past the last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedView {
    pub entries: Vec<MediaEntry>,
    pub page: usize,
    pub next: usize,
    pub prev: usize,
    /// Entries in the listing before slicing.
    pub total: usize,
}

/// Keep entries whose title contains `query`, ignoring case.
///
/// An empty query keeps everything.
pub fn filter_by_title(entries: Vec<MediaEntry>, query: &str) -> Vec<MediaEntry> {
    if query.is_empty() {
        return entries;
    }
    let needle = query.to_lowercase();
    entries
        .into_iter()
        .filter(|e| e.title.to_lowercase().contains(&needle))
        .collect()
}

/// Slice out page `page` (1-based) of `entries`.
///
/// Page 0 and pages past the end fall back to page 1. A page size of 0
/// means "everything on one page".
pub fn paginate(entries: Vec<MediaEntry>, page: usize, page_size: usize) -> PaginatedView {
    let total = entries.len();
    let page_size = if page_size == 0 { total.max(1) } else { page_size };

    let mut index = page.saturating_sub(1);
    if index.saturating_mul(page_size) >= total {
        index = 0;
    }

    let entries: Vec<MediaEntry> = entries
        .into_iter()
        .skip(index * page_size)
        .take(page_size)
        .collect();

    PaginatedView {
        entries,
        page: index + 1,
        next: index + 2,
        prev: index,
        total,
    }
}
