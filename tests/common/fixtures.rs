//! Test fixture helpers for creating temporary inventories.

use std::path::{Path, PathBuf};

use am::storage::Storage;
use tempfile::TempDir;

/// A scratch directory holding a database file and a QR output directory.
///
/// Both are removed when the workspace is dropped.
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join("appliance_manager.db")
    }

    pub fn qr_dir(&self) -> PathBuf {
        self.dir.path().join("qr_codes")
    }

    /// Opens a storage handle on the workspace database.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be opened.
    pub fn open(&self) -> Storage {
        Storage::open(self.db_path(), self.qr_dir()).expect("Failed to open storage")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
