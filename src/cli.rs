use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidshelf")]
#[command(author, version, about = "Local video catalog with browsing and streaming")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the catalog over HTTP
    Serve {
        /// Directory to crawl for videos
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Catalog database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Crawl the directory and refresh the catalog before serving
        #[arg(long)]
        refresh_db: bool,
    },

    /// Crawl the directory, reconcile the catalog, and exit
    Sync {
        /// Directory to crawl for videos
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Catalog database file
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Print cataloged videos
    List {
        /// Catalog database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Only show titles containing this text (case-insensitive)
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
