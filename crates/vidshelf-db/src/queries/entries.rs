//! Media entry query operations.
//!
//! Plain functions over a [`rusqlite::Connection`]; each one is a single
//! statement and therefore atomic on its own.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use vidshelf_common::{EntryId, Error, Result};

use crate::models::{MediaEntry, NewMediaEntry};

const ENTRY_COLUMNS: &str =
    "id, title, size_bytes, path, content_type, last_modified, created_at";

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<MediaEntry> {
    Ok(MediaEntry {
        id: EntryId::from(row.get::<_, i64>(0)?),
        title: row.get(1)?,
        size_bytes: row.get(2)?,
        path: row.get(3)?,
        content_type: row.get(4)?,
        last_modified: parse_timestamp(5, row.get(5)?)?,
        created_at: parse_timestamp(6, row.get(6)?)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn query_one(conn: &Connection, sql: &str, param: &dyn rusqlite::ToSql, what: String) -> Result<MediaEntry> {
    conn.query_row(sql, [param], row_to_entry)
        .optional()
        .map_err(|e| Error::database(e.to_string()))?
        .ok_or_else(|| Error::not_found(what))
}

/// List every entry ordered by id.
pub fn list_entries(conn: &Connection) -> Result<Vec<MediaEntry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM media_entries ORDER BY id"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let entries = stmt
        .query_map([], row_to_entry)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(entries)
}

/// Get an entry by id.
pub fn get_entry(conn: &Connection, id: EntryId) -> Result<MediaEntry> {
    query_one(
        conn,
        &format!("SELECT {ENTRY_COLUMNS} FROM media_entries WHERE id = ?"),
        &id.get(),
        format!("entry {}", id),
    )
}

/// Get an entry by its absolute path.
pub fn get_entry_by_path(conn: &Connection, path: &str) -> Result<MediaEntry> {
    query_one(
        conn,
        &format!("SELECT {ENTRY_COLUMNS} FROM media_entries WHERE path = ?"),
        &path,
        format!("entry at {}", path),
    )
}

/// Insert a new entry and return the id assigned to it.
///
/// Fails with [`Error::Conflict`] when the path is already cataloged.
pub fn create_entry(conn: &Connection, entry: &NewMediaEntry) -> Result<EntryId> {
    conn.execute(
        "INSERT INTO media_entries (title, size_bytes, path, content_type, last_modified, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            entry.title,
            entry.size_bytes,
            entry.path,
            entry.content_type,
            entry.last_modified.to_rfc3339(),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            Error::conflict(format!("path already cataloged: {}", entry.path))
        } else {
            Error::database(e.to_string())
        }
    })?;

    Ok(EntryId::from(conn.last_insert_rowid()))
}

/// Overwrite the file metadata of an existing entry, keeping its id.
pub fn update_entry_metadata(conn: &Connection, id: EntryId, entry: &NewMediaEntry) -> Result<()> {
    let affected = conn
        .execute(
            "UPDATE media_entries
             SET title = ?, size_bytes = ?, path = ?, content_type = ?, last_modified = ?
             WHERE id = ?",
            params![
                entry.title,
                entry.size_bytes,
                entry.path,
                entry.content_type,
                entry.last_modified.to_rfc3339(),
                id.get(),
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::conflict(format!("path already cataloged: {}", entry.path))
            } else {
                Error::database(e.to_string())
            }
        })?;

    if affected == 0 {
        return Err(Error::not_found(format!("entry {}", id)));
    }
    Ok(())
}

/// Permanently delete an entry. The file on disk is not touched.
pub fn delete_entry(conn: &Connection, id: EntryId) -> Result<()> {
    let affected = conn
        .execute("DELETE FROM media_entries WHERE id = ?", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;

    if affected == 0 {
        return Err(Error::not_found(format!("entry {}", id)));
    }
    Ok(())
}

/// Number of cataloged entries.
pub fn count_entries(conn: &Connection) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM media_entries", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(count as usize)
}

/// The entry with the smallest id greater than `id`.
pub fn next_entry(conn: &Connection, id: EntryId) -> Result<MediaEntry> {
    query_one(
        conn,
        &format!("SELECT {ENTRY_COLUMNS} FROM media_entries WHERE id > ? ORDER BY id ASC LIMIT 1"),
        &id.get(),
        format!("entry after {}", id),
    )
}

/// The entry with the largest id smaller than `id`.
pub fn prev_entry(conn: &Connection, id: EntryId) -> Result<MediaEntry> {
    query_one(
        conn,
        &format!("SELECT {ENTRY_COLUMNS} FROM media_entries WHERE id < ? ORDER BY id DESC LIMIT 1"),
        &id.get(),
        format!("entry before {}", id),
    )
}
