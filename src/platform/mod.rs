//! Page bindings
//!
//! This module encapsulates everything the tour reads from or writes to the
//! host page and the client-local storage, and provides a clean interface
//! to the rest of the application.

pub mod memory;
pub mod page;
pub mod storage;

pub use memory::{MemoryPage, PageElement, PageError};
pub use page::{ElementId, Page, Target, resolve_target};
pub use storage::{FileVisitedStore, MemoryVisitedStore, StorageError, VisitedStore};
