//! Addressable location of the task view.
//!
//! The location is the query string (`page=2&search=milk`) that fully
//! describes what the task view shows. [`ViewState`](super::view_state::ViewState)
//! reads parameters from it and writes every change back to it, so the
//! view can always be rebuilt from the location alone.

use super::data_storage::DataStorage;
use anyhow::Result;
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// File holding the last location of the CLI task view.
pub const LOCATION_FILE: &str = ".location";

pub trait Location: Send + Sync {
    /// Current query string, without a leading `?`.
    fn query(&self) -> String;

    /// Replaces the query string.
    fn replace(&self, query: &str) -> Result<()>;
}

/// Location held in memory; every replacement is kept in `history`.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    query: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryLocation {
    pub fn new(query: &str) -> Self {
        Self {
            query: Mutex::new(query.trim_start_matches('?').to_string()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> String {
        self.query.lock().clone()
    }

    fn replace(&self, query: &str) -> Result<()> {
        *self.query.lock() = query.to_string();
        self.history.lock().push(query.to_string());
        Ok(())
    }
}

/// Location persisted to `.location` so consecutive CLI invocations share one view.
#[derive(Debug)]
pub struct FileLocation {
    path: PathBuf,
    cached: Mutex<String>,
}

impl FileLocation {
    pub fn open(storage: &DataStorage) -> Result<Self> {
        let path = storage.get_path(LOCATION_FILE)?;
        let cached = match fs::read_to_string(&path) {
            Ok(query) => query.trim().to_string(),
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            cached: Mutex::new(cached),
        })
    }
}

impl Location for FileLocation {
    fn query(&self) -> String {
        self.cached.lock().clone()
    }

    fn replace(&self, query: &str) -> Result<()> {
        fs::write(&self.path, query)?;
        *self.cached.lock() = query.to_string();
        Ok(())
    }
}
