//! Path resolution helpers for configuration values.
//!
//! Supports absolute paths, paths relative to the config file, and "~" home
//! directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{AmError, Result};

/// Application directory name under the platform data/config roots.
pub const APP_DIR: &str = "appliance-manager";

/// Database file name.
pub const DB_FILE: &str = "appliance_manager.db";

/// Identifier image directory name.
pub const QR_DIR: &str = "qr_codes";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve a path taken from a config file.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved relative to the config file's directory
pub fn resolve_path(path: &Path, config_dir: &Path) -> Result<PathBuf> {
    trace!(
        path = %path.display(),
        config_dir = %config_dir.display(),
        "Resolving path"
    );

    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    Ok(config_dir.join(path))
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| AmError::ConfigParse("Could not determine home directory".to_string()))
}

/// Returns the default data directory.
///
/// Location: `~/.local/share/appliance-manager/`
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().ok_or_else(|| {
        AmError::Other("Could not determine local data directory".to_string())
    })?;
    Ok(data_dir.join(APP_DIR))
}

/// Returns the default database path.
///
/// Location: `~/.local/share/appliance-manager/appliance_manager.db`
pub fn default_db_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(DB_FILE))
}

/// Returns the default identifier image directory.
///
/// Location: `~/.local/share/appliance-manager/qr_codes/`
pub fn default_qr_dir() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(QR_DIR))
}

/// Returns the default config file path, if the platform has a config root.
///
/// Location: `~/.config/appliance-manager/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
