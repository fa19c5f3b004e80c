//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use vidshelf_common::{Error, Result};

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000;";

/// Initialize a new database pool with the given file path.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Set up connection pooling with r2d2 (4 connections)
/// - Set a busy timeout on every connection
/// - Run pending database migrations
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file
///
/// # Example
///
/// ```no_run
/// use vidshelf_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/vidshelf/videos.db").unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    migrate(&pool)?;
    Ok(pool)
}

/// Initialize an in-memory database pool for testing.
///
/// Every SQLite `:memory:` connection is a separate database, so the pool
/// holds exactly one connection. Callers must not hold a connection while
/// asking for another one.
///
/// # Example
///
/// ```
/// use vidshelf_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create in-memory pool: {}", e)))?;

    migrate(&pool)?;
    Ok(pool)
}

fn migrate(pool: &DbPool) -> Result<()> {
    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    let applied = migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;
    if applied > 0 {
        tracing::info!("Applied {} catalog migration(s)", applied);
    }
    Ok(())
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}
