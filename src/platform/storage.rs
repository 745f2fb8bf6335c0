//! Persisted "visited" flag
//!
//! The only state that outlives a tour session. When set, the start prompt
//! is not shown on the next visit.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access visited flag at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait VisitedStore {
    fn is_visited(&self) -> bool;
    fn mark_visited(&mut self) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Flag held in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryVisitedStore {
    visited: bool,
}

impl MemoryVisitedStore {
    pub fn new(visited: bool) -> Self {
        Self { visited }
    }
}

impl VisitedStore for MemoryVisitedStore {
    fn is_visited(&self) -> bool {
        self.visited
    }

    fn mark_visited(&mut self) -> Result<(), StorageError> {
        self.visited = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.visited = false;
        Ok(())
    }
}

/// Flag stored as a marker file containing `true`
#[derive(Debug, Clone)]
pub struct FileVisitedStore {
    path: PathBuf,
}

impl FileVisitedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl VisitedStore for FileVisitedStore {
    fn is_visited(&self) -> bool {
        fs::read_to_string(&self.path)
            .map(|text| text.trim() == "true")
            .unwrap_or(false)
    }

    fn mark_visited(&mut self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, "true").map_err(|e| self.io_error(e))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}
