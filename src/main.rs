mod cli;

use vidshelf::{
    config::{self, Config},
    library::LibraryService,
    scanner::PolicyHandle,
    server::{self, AppContext},
};
use vidshelf_db::{pool::init_pool, SqliteCatalog};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open the catalog named by the config and wrap it in a service.
fn open_service(config: &Config) -> Result<LibraryService> {
    let db_path = config.library.database.to_string_lossy();
    tracing::info!("Opening catalog at {}", db_path);
    let pool = init_pool(&db_path)
        .with_context(|| format!("Failed to open catalog database {}", db_path))?;

    let policy = PolicyHandle::from(config.scan.policy());
    Ok(
        LibraryService::new(Arc::new(SqliteCatalog::new(pool)), policy)
            .with_update_changed(config.scan.update_changed),
    )
}

fn apply_overrides(config: &mut Config, dir: Option<PathBuf>, db: Option<PathBuf>) {
    if let Some(dir) = dir {
        config.library.root = dir.to_string_lossy().into_owned();
    }
    if let Some(db) = db {
        config.library.database = db;
    }
}

fn serve(
    config_path: Option<&Path>,
    dir: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db: Option<PathBuf>,
    refresh_db: bool,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    apply_overrides(&mut config, dir, db);
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting vidshelf server");

    let service = open_service(&config)?;
    let root = config.library.root_dir();
    let refresh = refresh_db || config.library.refresh_on_start;

    // The catalog is ready before the server binds.
    let report = service
        .ensure_catalog(&root, refresh)
        .context("Failed to prepare catalog")?;
    println!("Found {} videos in {}", report.count, root.display());

    let ctx = AppContext::new(Arc::new(service), config);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::start_server(ctx))
}

fn sync(config_path: Option<&Path>, dir: Option<PathBuf>, db: Option<PathBuf>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    apply_overrides(&mut config, dir, db);

    let service = open_service(&config)?;
    let root = config.library.root_dir();
    let report = service
        .ensure_catalog(&root, true)
        .context("Sync failed")?;

    println!(
        "Synced {}: {} added, {} removed, {} refreshed, {} unchanged",
        root.display(),
        report.inserted,
        report.deleted,
        report.updated,
        report.unchanged
    );
    println!("Found {} videos in {}", report.count, root.display());
    Ok(())
}

fn list(config_path: Option<&Path>, db: Option<PathBuf>, query: Option<String>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    apply_overrides(&mut config, None, db);

    let service = open_service(&config)?;
    let entries = service.list(query.as_deref())?;

    for entry in &entries {
        println!(
            "{:>6}  {:>10}  {}  {}",
            entry.id.get(),
            entry.human_size(),
            entry.title,
            entry.path
        );
    }
    println!("\n{} videos", entries.len());
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Page size: {}", config.server.page_size);
            println!("  Library root: {}", config.library.root_dir().display());
            println!("  Database: {}", config.library.database.display());
            println!("  Extensions: {}", config.scan.extensions.join(", "));
            println!("  Ignored directories: {}", config.scan.ignore_dirs.len());
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidshelf=trace,vidshelf_db=debug,tower_http=debug".to_string()
        } else {
            "vidshelf=info,vidshelf_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve {
            dir,
            host,
            port,
            db,
            refresh_db,
        } => serve(cli.config.as_deref(), dir, host, port, db, refresh_db),
        Commands::Sync { dir, db } => sync(cli.config.as_deref(), dir, db),
        Commands::List { db, query } => list(cli.config.as_deref(), db, query),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidshelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
