//! Default paths for biblio components
//!
//! Provides centralized path defaults that all crates can use.
//! Paths are user-writable by default (no root required):
//! - Config: `$XDG_CONFIG_HOME/biblio/config.toml` or `~/.config/biblio/config.toml`
//! - Data: `$XDG_DATA_HOME/biblio` or `~/.local/share/biblio`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const BIBLIO_DATA_DIR_ENV: &str = "BIBLIO_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "biblio";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/biblio/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/biblio/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$BIBLIO_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/biblio` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/biblio` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(BIBLIO_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking BIBLIO_DATA_DIR env var.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
