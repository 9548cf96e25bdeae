//! Configuration for the inventory store.
//!
//! The store needs exactly two locations: the database file and the
//! identifier output directory. Each is resolved in order from:
//!
//! 1. command-line flags (or their `AM_DB` / `AM_QR_DIR` environment variables)
//! 2. an optional TOML config file
//! 3. platform defaults under the local data directory
//!
//! ```toml
//! # ~/.config/appliance-manager/config.toml
//! db_path = "~/inventory/appliance_manager.db"
//! qr_dir = "qr_codes"          # relative to this file
//! ```

mod path;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{AmError, Result, ResultExt};

pub use path::{
    APP_DIR, CONFIG_FILE, DB_FILE, QR_DIR, default_config_path, default_data_dir,
    default_db_path, default_qr_dir, home_dir, resolve_path,
};

/// Contents of the TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Parses config file contents.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AmError::ConfigParse(format!("TOML: {e}")))
    }

    /// Loads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        debug!(bytes = content.len(), "Read config file");
        Self::from_toml(&content)
    }
}

/// Where a resolved location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Flag,
    ConfigFile,
    Default,
}

/// Fully resolved locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub db_source: Source,
    pub qr_dir: PathBuf,
    pub qr_source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolves both locations.
    ///
    /// An explicitly named config file must exist; the default config file is
    /// optional.
    #[instrument]
    pub fn resolve(
        db_flag: Option<PathBuf>,
        qr_flag: Option<PathBuf>,
        config_flag: Option<PathBuf>,
    ) -> Result<Self> {
        let (file, config_file) = match config_flag {
            Some(path) => {
                if !path.is_file() {
                    return Err(AmError::ConfigParse(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                (FileConfig::load(&path)?, Some(path))
            }
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => (FileConfig::load(&path)?, Some(path)),
                None => (FileConfig::default(), None),
            },
        };

        let config_dir = config_file
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let (db_path, db_source) = match (db_flag, &file.db_path) {
            (Some(flag), _) => (flag, Source::Flag),
            (None, Some(from_file)) => (resolve_path(from_file, &config_dir)?, Source::ConfigFile),
            (None, None) => (default_db_path()?, Source::Default),
        };

        let (qr_dir, qr_source) = match (qr_flag, &file.qr_dir) {
            (Some(flag), _) => (flag, Source::Flag),
            (None, Some(from_file)) => (resolve_path(from_file, &config_dir)?, Source::ConfigFile),
            (None, None) => (default_qr_dir()?, Source::Default),
        };

        info!(
            db = %db_path.display(),
            qr = %qr_dir.display(),
            ?db_source,
            ?qr_source,
            "Configuration resolved"
        );

        Ok(Self {
            db_path,
            db_source,
            qr_dir,
            qr_source,
            config_file,
        })
    }
}
