//! Database query modules.
//!
//! - entries: Media entry CRUD and neighbor lookups

pub mod entries;
