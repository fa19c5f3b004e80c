//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary library directory, an
//! in-memory SQLite catalog, and a full [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::fs::{self, File};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use vidshelf::config::Config;
use vidshelf::library::LibraryService;
use vidshelf::scanner::{PolicyHandle, SyncReport};
use vidshelf::server::{create_router, AppContext};
use vidshelf_db::pool::{init_memory_pool, DbPool};
use vidshelf_db::SqliteCatalog;

pub const MIB: u64 = 1024 * 1024;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temporary library root.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub library: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The library root is
    /// always replaced by a fresh temporary directory.
    pub fn with_config(mut config: Config) -> Self {
        let library = TempDir::new().expect("failed to create library dir");
        config.library.root = library.path().to_string_lossy().into_owned();

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let service = LibraryService::new(
            Arc::new(SqliteCatalog::new(db.clone())),
            PolicyHandle::from(config.scan.policy()),
        )
        .with_update_changed(config.scan.update_changed);

        let ctx = AppContext::new(Arc::new(service), config);
        Self { ctx, db, library }
    }

    pub fn root(&self) -> &Path {
        self.library.path()
    }

    pub fn service(&self) -> &LibraryService {
        &self.ctx.service
    }

    /// Create a sparse file of `size` bytes under the library root.
    pub fn add_file(&self, relative: &str, size: u64) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        File::create(&path)
            .and_then(|f| f.set_len(size))
            .expect("failed to create file");
        path
    }

    /// Write real bytes, for tests that read the content back.
    pub fn add_file_with_content(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(relative);
        fs::write(&path, content).expect("failed to write file");
        path
    }

    /// Forced crawl + reconcile of the library root.
    pub fn refresh(&self) -> SyncReport {
        self.service()
            .ensure_catalog(self.root(), true)
            .expect("refresh failed")
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    /// Start an Axum server on a random port and return the bound address.
    pub async fn serve(&self) -> SocketAddr {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    /// Create a harness and start its server.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let addr = harness.serve().await;
        (harness, addr)
    }
}
