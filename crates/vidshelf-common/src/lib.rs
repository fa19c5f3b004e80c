//! Vidshelf-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across vidshelf:
//!
//! - **Typed IDs**: `EntryId`, the store-assigned catalog identifier
//! - **Path Utilities**: Content-type classification by extension
//! - **Formatting**: Human readable byte sizes
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use vidshelf_common::{EntryId, Error, Result};
//! use vidshelf_common::paths::classify;
//! use std::path::Path;
//!
//! let id = EntryId::from(42);
//! assert_eq!(id.get(), 42);
//!
//! assert_eq!(classify(Path::new("movie.mp4")), "video/mp4");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("entry"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod size;

pub use error::{Error, Result};
pub use ids::EntryId;
