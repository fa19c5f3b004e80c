//! Vidshelf - Local video catalog
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod library;
pub mod scanner;
pub mod server;
pub mod streaming;
