//! Configuration module for tourguide
//!
//! Holds the overlay tunables and key bindings shared by the renderer, the
//! feedback animations and the input dispatcher.

pub mod tour;

pub use tour::{ConfigError, KeyBindings, TourConfig};
