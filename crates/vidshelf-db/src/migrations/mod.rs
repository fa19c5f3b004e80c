//! Database migrations module
//!
//! This module handles SQLite schema migrations for the vidshelf catalog.
//! Migrations are embedded in the binary and executed in order.

use rusqlite::{Connection, Result};
use thiserror::Error;

/// Migration error types
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {0} failed: {1}")]
    Failed(usize, String),
}

/// A single migration with its SQL content
struct Migration {
    version: usize,
    name: &'static str,
    sql: &'static str,
}

/// Catalog of media entries.
///
/// `AUTOINCREMENT` keeps ids monotonic: SQLite never hands out the id of a
/// deleted row again.
const INITIAL_SQL: &str = "
CREATE TABLE media_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    size_bytes INTEGER NOT NULL CHECK (size_bytes >= 0),
    path TEXT NOT NULL UNIQUE,
    content_type TEXT NOT NULL,
    last_modified TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE INDEX idx_media_entries_title ON media_entries (title COLLATE NOCASE);
";

/// All available migrations
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial",
    sql: INITIAL_SQL,
}];

/// Initialize the migrations table if it doesn't exist
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<usize> {
    match conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<usize>>(0)
    }) {
        Ok(Some(version)) => Ok(version),
        Ok(None) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Apply a single migration
fn apply_migration(conn: &Connection, migration: &Migration) -> Result<(), MigrationError> {
    conn.execute_batch(migration.sql)
        .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?, ?)",
        rusqlite::params![migration.version, migration.name],
    )
    .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

    Ok(())
}

/// Run all pending migrations
///
/// Each pending migration is applied in its own transaction, in version
/// order.
///
/// # Returns
///
/// * `Ok(usize)` - Number of migrations applied
/// * `Err(MigrationError)` - If any migration fails
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    init_migrations_table(conn).map_err(MigrationError::Database)?;

    let current_version = get_current_version(conn).map_err(MigrationError::Database)?;

    let pending_migrations: Vec<_> = MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
        .collect();

    let mut applied_count = 0;
    for migration in pending_migrations {
        let tx = conn
            .unchecked_transaction()
            .map_err(MigrationError::Database)?;

        apply_migration(&tx, migration)?;

        tx.commit()
            .map_err(|e| MigrationError::Failed(migration.version, e.to_string()))?;

        applied_count += 1;

        tracing::debug!(
            "Applied migration {}: {}",
            migration.version,
            migration.name
        );
    }

    Ok(applied_count)
}
