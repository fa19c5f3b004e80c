use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::library::DEFAULT_PAGE_SIZE;
use crate::scanner::{ScanPolicy, DEFAULT_EXTENSIONS, DEFAULT_IGNORED_DIRS};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Entries per page on the paginated listing
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory crawled for videos (`~` is expanded)
    #[serde(default = "default_root")]
    pub root: String,

    /// SQLite catalog file. Relative paths are resolved next to the config
    /// file they were read from.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Crawl and reconcile before serving
    #[serde(default)]
    pub refresh_on_start: bool,
}

fn default_root() -> String {
    "~".to_string()
}
fn default_database() -> PathBuf {
    PathBuf::from("vidshelf.db")
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            database: default_database(),
            refresh_on_start: false,
        }
    }
}

impl LibraryConfig {
    /// Crawl root with `~` expanded.
    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.root).as_ref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// File extensions (without the dot) that are cataloged
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names that are never descended into
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// Refresh entries whose size or modification time changed
    #[serde(default = "default_update_changed")]
    pub update_changed: bool,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}
fn default_ignore_dirs() -> Vec<String> {
    DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect()
}
fn default_update_changed() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_dirs: default_ignore_dirs(),
            update_changed: default_update_changed(),
        }
    }
}

impl ScanConfig {
    /// Initial scan policy built from this section.
    pub fn policy(&self) -> ScanPolicy {
        ScanPolicy::new(
            self.extensions.iter().map(String::as_str),
            self.ignore_dirs.iter().map(String::as_str),
        )
    }
}
