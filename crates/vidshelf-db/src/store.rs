//! The catalog store capability.
//!
//! The sync engine and the service layer only ever talk to the catalog
//! through [`CatalogStore`]. [`SqliteCatalog`] is the production backend;
//! [`crate::memory::MemoryCatalog`] is an in-memory stand-in.

use vidshelf_common::{EntryId, Result};

use crate::models::{MediaEntry, NewMediaEntry};
use crate::pool::{get_conn, DbPool};
use crate::queries::entries;

/// Persistence operations required by the catalog.
///
/// Lookups that miss return [`vidshelf_common::Error::NotFound`]. Every
/// method is atomic on its own; there are no multi-call transactions.
pub trait CatalogStore: Send + Sync {
    /// All entries, ordered by id.
    fn find_all(&self) -> Result<Vec<MediaEntry>>;

    fn find_one(&self, id: EntryId) -> Result<MediaEntry>;

    fn find_by_path(&self, path: &str) -> Result<MediaEntry>;

    /// Insert a new entry. Paths are unique: a duplicate yields
    /// [`vidshelf_common::Error::Conflict`].
    fn insert(&self, entry: &NewMediaEntry) -> Result<EntryId>;

    /// Replace the metadata of an existing entry in place.
    fn update_metadata(&self, id: EntryId, entry: &NewMediaEntry) -> Result<()>;

    /// Permanently remove the record. Never touches the file on disk.
    fn delete_hard(&self, id: EntryId) -> Result<()>;

    fn count(&self) -> Result<usize>;

    /// The entry with the next larger id.
    fn next_after(&self, id: EntryId) -> Result<MediaEntry>;

    /// The entry with the next smaller id.
    fn prev_before(&self, id: EntryId) -> Result<MediaEntry>;
}

/// SQLite-backed catalog.
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: DbPool,
}

impl SqliteCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for SqliteCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCatalog")
            .field("max_connections", &self.pool.max_size())
            .finish()
    }
}

impl CatalogStore for SqliteCatalog {
    fn find_all(&self) -> Result<Vec<MediaEntry>> {
        let conn = get_conn(&self.pool)?;
        entries::list_entries(&conn)
    }

    fn find_one(&self, id: EntryId) -> Result<MediaEntry> {
        let conn = get_conn(&self.pool)?;
        entries::get_entry(&conn, id)
    }

    fn find_by_path(&self, path: &str) -> Result<MediaEntry> {
        let conn = get_conn(&self.pool)?;
        entries::get_entry_by_path(&conn, path)
    }

    fn insert(&self, entry: &NewMediaEntry) -> Result<EntryId> {
        let conn = get_conn(&self.pool)?;
        entries::create_entry(&conn, entry)
    }

    fn update_metadata(&self, id: EntryId, entry: &NewMediaEntry) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        entries::update_entry_metadata(&conn, id, entry)
    }

    fn delete_hard(&self, id: EntryId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        entries::delete_entry(&conn, id)
    }

    fn count(&self) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        entries::count_entries(&conn)
    }

    fn next_after(&self, id: EntryId) -> Result<MediaEntry> {
        let conn = get_conn(&self.pool)?;
        entries::next_entry(&conn, id)
    }

    fn prev_before(&self, id: EntryId) -> Result<MediaEntry> {
        let conn = get_conn(&self.pool)?;
        entries::prev_entry(&conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCatalog;
    use crate::pool::init_memory_pool;
    use chrono::Utc;
    use vidshelf_common::Error;

    fn new_entry(path: &str) -> NewMediaEntry {
        NewMediaEntry {
            title: path.rsplit('/').next().unwrap().to_string(),
            size_bytes: 3 * 1024 * 1024,
            path: path.to_string(),
            content_type: "video/mp4".to_string(),
            last_modified: Utc::now(),
        }
    }

    /// Both backends must behave identically.
    fn exercise(store: &dyn CatalogStore) {
        assert_eq!(store.count().unwrap(), 0);

        let a = store.insert(&new_entry("/v/a.mp4")).unwrap();
        let b = store.insert(&new_entry("/v/b.mp4")).unwrap();
        let c = store.insert(&new_entry("/v/c.mp4")).unwrap();
        assert!(a < b && b < c);
        assert_eq!(store.count().unwrap(), 3);

        assert!(matches!(
            store.insert(&new_entry("/v/a.mp4")).unwrap_err(),
            Error::Conflict(_)
        ));

        assert_eq!(store.find_by_path("/v/b.mp4").unwrap().id, b);
        assert_eq!(store.next_after(a).unwrap().id, b);
        assert_eq!(store.prev_before(c).unwrap().id, b);

        store.delete_hard(b).unwrap();
        assert!(store.find_one(b).unwrap_err().is_not_found());
        assert!(store.delete_hard(b).unwrap_err().is_not_found());
        assert_eq!(store.next_after(a).unwrap().id, c);

        // Deleted ids are not handed out again.
        let d = store.insert(&new_entry("/v/b.mp4")).unwrap();
        assert!(d > c);

        let mut grown = new_entry("/v/a.mp4");
        grown.size_bytes = 10;
        store.update_metadata(a, &grown).unwrap();
        assert_eq!(store.find_one(a).unwrap().size_bytes, 10);

        let paths: Vec<_> = store
            .find_all()
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        assert_eq!(paths, vec!["/v/a.mp4", "/v/c.mp4", "/v/b.mp4"]);
    }

    #[test]
    fn test_sqlite_catalog_contract() {
        let store = SqliteCatalog::new(init_memory_pool().unwrap());
        exercise(&store);
    }

    #[test]
    fn test_memory_catalog_contract() {
        let store = MemoryCatalog::new();
        exercise(&store);
    }
}
