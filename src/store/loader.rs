//! Background loading of the step document
//!
//! The fetch runs on its own thread and hands the parsed store to the event
//! loop through a channel. A failed fetch posts nothing: the tour then stays
//! in its not-ready state and keeps deferring renders.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::input::TourEvent;
use crate::store::steps::{StepStore, StoreError};

/// Where the step document comes from
pub trait StepSource: Send + 'static {
    /// Human-readable origin for log messages
    fn origin(&self) -> String;

    /// Fetches the raw document text
    fn fetch(&self) -> Result<String, StoreError>;
}

/// Reads the document from a file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StepSource for FileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, StoreError> {
        std::fs::read_to_string(&self.path).map_err(|source| StoreError::Unreachable {
            origin: self.origin(),
            source,
        })
    }
}

/// Serves a document held in memory
#[derive(Debug, Clone)]
pub struct InlineSource {
    text: String,
}

impl InlineSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl StepSource for InlineSource {
    fn origin(&self) -> String {
        "inline document".to_string()
    }

    fn fetch(&self) -> Result<String, StoreError> {
        Ok(self.text.clone())
    }
}

/// Fetches and parses synchronously
pub fn load<S: StepSource>(source: &S) -> Result<StepStore, StoreError> {
    let text = source.fetch()?;
    StepStore::parse(&text)
}

/// Spawns the loader thread
///
/// On success exactly one [`TourEvent::StepsLoaded`] is sent on `events`.
pub fn spawn_loader<S: StepSource>(source: S, events: Sender<TourEvent>) -> JoinHandle<()> {
    thread::spawn(move || match load(&source) {
        Ok(store) => {
            debug!(origin = %source.origin(), steps = store.len(), "step document loaded");
            if events.send(TourEvent::StepsLoaded(store)).is_err() {
                debug!("event loop gone before steps arrived");
            }
        }
        Err(err) => {
            warn!(origin = %source.origin(), error = %err, "step document unavailable; tour stays inactive");
        }
    })
}
