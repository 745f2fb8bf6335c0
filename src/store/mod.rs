//! Step store: loading and resolving step records

pub mod loader;
pub mod steps;

pub use loader::{FileSource, InlineSource, StepSource, spawn_loader};
pub use steps::{StepDocument, StepStore, StoreError};
