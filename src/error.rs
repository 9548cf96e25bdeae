//! Error types for appliance manager operations.

use thiserror::Error;

/// Primary error type for appliance manager operations.
#[derive(Error, Debug)]
pub enum AmError {
    // Storage errors
    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    #[error("Storage unavailable during {operation}: {reason}")]
    StorageUnavailable { operation: String, reason: String },

    // Input errors
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    // Configuration errors
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AmError {
    /// Builds a `StorageUnavailable` error from any displayable cause.
    pub fn storage(operation: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds an `InvalidInput` error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKey { .. } | Self::InvalidInput { .. } | Self::ConfigParse(_)
        )
    }

    /// Stable machine-readable tag for robot output.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::StorageUnavailable { .. } => "storage_unavailable",
            Self::InvalidInput { .. } => "invalid_input",
            Self::ConfigParse(_) => "config_parse",
            Self::Io(_) => "io",
            Self::Other(_) => "other",
        }
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateKey { entity: "house", .. } => {
                Some("Choose a different house name")
            }
            Self::DuplicateKey { entity: "appliance", .. } => {
                Some("Use a different appliance name for this house")
            }
            Self::DuplicateKey { entity: "document", .. } => {
                Some("Each appliance holds a single document record: run: am document show <ID>")
            }
            Self::StorageUnavailable { .. } => {
                Some("Check that referenced ids exist and the database path is writable (am paths)")
            }
            Self::ConfigParse(_) => Some("Fix the config file or pass --db/--qr-dir explicitly"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using AmError.
pub type Result<T> = std::result::Result<T, AmError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| AmError::Other(format!("{}: {e}", f().into())))
    }
}
