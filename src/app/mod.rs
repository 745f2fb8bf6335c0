//! Application orchestration layer
//!
//! This module coordinates between input, domain, UI, and platform layers.
//! It owns the tour session state and routes every event through it.

pub mod controller;
pub mod script;
pub mod state;

pub use controller::{RenderKind, TourController};
pub use script::{ScriptError, ScriptOp, ScriptRunner, parse_script};
pub use state::{ShowingState, StateEvent, StateMachine, TourState, Transition};
