//! Domain logic and core data structures
//!
//! This module contains pure logic that is independent of any page
//! binding: geometry, step records and the completion predicate.

pub mod completion;
pub mod core;
pub mod step;
