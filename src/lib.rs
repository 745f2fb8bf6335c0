//! Guided onboarding tour over a host page
//!
//! A tour walks the user through a fixed list of steps. Each step dims the
//! page, cuts a hole around one target element and shows an explanation
//! panel; forward navigation is blocked until the step's task is done.
//! The host page is reached only through the [`platform::Page`] trait.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod store;
pub mod ui;

pub use app::TourController;
pub use config::TourConfig;
pub use input::{ClickTarget, TourEvent};
pub use platform::{MemoryPage, Page, VisitedStore};
pub use store::{StepStore, StoreError};
