//! Platform-specific location for taskly's persisted files.
//!
//! Holds `config.json`, the encrypted `.session` credential and the last
//! `.location` of the task view. The directory is created lazily on first
//! access.
//!
//! - **Windows**: `%LOCALAPPDATA%\taskly\taskly`
//! - **macOS**: `~/Library/Application Support/taskly/taskly`
//! - **Linux**: `~/.local/share/taskly/taskly`
//!
//! `TASKLY_DATA_DIR` replaces the whole path when set.

use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};

pub const VENDOR_NAME: &str = "taskly";
pub const APP_NAME: &str = "taskly";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKLY_DATA_DIR";

#[derive(Clone, Debug)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        if let Ok(dir) = var(DATA_DIR_ENV) {
            return Self { base_path: PathBuf::from(dir) };
        }

        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        let base_path = Path::new(&base_path).join(VENDOR_NAME).join(APP_NAME);

        Self { base_path }
    }

    /// Uses `base_path` directly instead of the platform directory.
    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}
