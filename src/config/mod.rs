mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Default locations searched when no `--config` is given, in order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./vidshelf.toml",
    "./config.toml",
    "~/.config/vidshelf/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    resolve_database(&mut config, path.parent());

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_CONFIG_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    let mut config = Config::default();
    resolve_database(&mut config, None);
    Ok(config)
}

/// Expand `~` in the database path and anchor relative paths at `base`.
fn resolve_database(config: &mut Config, base: Option<&Path>) {
    let raw = config.library.database.to_string_lossy().into_owned();
    let expanded = std::path::PathBuf::from(shellexpand::tilde(&raw).as_ref());
    config.library.database = match base {
        Some(base) if expanded.is_relative() && !base.as_os_str().is_empty() => {
            base.join(expanded)
        }
        _ => expanded,
    };
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.page_size == 0 {
        anyhow::bail!("Page size must be greater than 0");
    }

    if config.scan.extensions.is_empty() {
        tracing::warn!("No video extensions configured; crawls will find nothing");
    }

    let root = config.library.root_dir();
    if !root.is_dir() {
        tracing::warn!("Library root does not exist: {:?}", root);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.page_size, 10);
        assert_eq!(config.library.root, "~");
        assert!(!config.library.refresh_on_start);
        assert_eq!(config.scan.extensions, vec!["mp4", "webm", "3gp"]);
        assert!(config.scan.ignore_dirs.contains(&"node_modules".to_string()));
        assert!(config.scan.update_changed);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vidshelf.toml");
        fs::write(
            &path,
            r#"
[server]
port = 9000

[library]
root = "/srv/videos"
database = "catalog.db"

[scan]
extensions = ["mkv"]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.library.database, dir.path().join("catalog.db"));
        assert_eq!(config.library.root_dir(), Path::new("/srv/videos"));

        let policy = config.scan.policy();
        assert!(policy.is_supported("mkv"));
        assert!(!policy.is_supported("mp4"));
        assert!(policy.is_ignored("venv"));
    }

    #[test]
    fn test_absolute_database_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vidshelf.toml");
        fs::write(&path, "[library]\ndatabase = \"/var/lib/vidshelf.db\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.library.database, Path::new("/var/lib/vidshelf.db"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vidshelf.toml");

        fs::write(&path, "[server]\nport = 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("port"));

        fs::write(&path, "[server]\npage_size = 0\n").unwrap();
        assert!(load_config(&path).is_err());

        fs::write(&path, "not toml [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_tilde_root_expanded() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        let home = std::path::PathBuf::from(home);

        let config = LibraryConfig::default();
        assert_eq!(config.root_dir(), home);

        let nested = LibraryConfig {
            root: "~/Videos".to_string(),
            ..LibraryConfig::default()
        };
        assert_eq!(nested.root_dir(), home.join("Videos"));
    }
}
