//! Vidshelf-DB: Catalog schema, migrations, and query operations
//!
//! This crate provides the catalog store for vidshelf using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//! - `store` - The [`store::CatalogStore`] trait and its SQLite implementation
//! - `memory` - An in-memory [`store::CatalogStore`] for tests and tooling
//!
//! # Example
//!
//! ```no_run
//! use vidshelf_db::pool::init_pool;
//! use vidshelf_db::store::{CatalogStore, SqliteCatalog};
//!
//! let pool = init_pool("/var/lib/vidshelf/videos.db").unwrap();
//! let catalog = SqliteCatalog::new(pool);
//!
//! println!("{} videos cataloged", catalog.count().unwrap());
//! ```

pub mod memory;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;

pub use memory::MemoryCatalog;
pub use models::{MediaEntry, NewMediaEntry};
pub use store::{CatalogStore, SqliteCatalog};
