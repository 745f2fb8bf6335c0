pub mod dispatcher;
pub mod keyboard;

pub use dispatcher::{ClickTarget, Command, TourEvent, dispatch};
pub use keyboard::KeyCommand;
