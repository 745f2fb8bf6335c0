//! Keyboard shortcuts
//!
//! Key codes follow the DOM `keyCode` numbering (37 = left arrow, 39 = right
//! arrow, 71 = G, 27 = Escape, 67 = C) and can be rebound in the config.

use crate::config::KeyBindings;

/// Actions reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Previous,
    Next,
    /// Advance without checking the task ("godmode")
    SkipForward,
    Dismiss,
    /// Debug key: forget that the tour was seen
    ResetVisited,
}

impl KeyCommand {
    /// Maps a key code through `keys`; unbound keys yield `None`
    pub fn from_code(code: u32, keys: &KeyBindings) -> Option<Self> {
        let bindings = [
            (keys.previous, KeyCommand::Previous),
            (keys.next, KeyCommand::Next),
            (keys.skip_forward, KeyCommand::SkipForward),
            (keys.dismiss, KeyCommand::Dismiss),
            (keys.reset_visited, KeyCommand::ResetVisited),
        ];

        bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|&(_, command)| command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(KeyCommand::from_code(37, &keys), Some(KeyCommand::Previous));
        assert_eq!(KeyCommand::from_code(39, &keys), Some(KeyCommand::Next));
        assert_eq!(KeyCommand::from_code(71, &keys), Some(KeyCommand::SkipForward));
        assert_eq!(KeyCommand::from_code(27, &keys), Some(KeyCommand::Dismiss));
        assert_eq!(KeyCommand::from_code(67, &keys), Some(KeyCommand::ResetVisited));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let keys = KeyBindings::default();
        assert_eq!(KeyCommand::from_code(13, &keys), None);
        assert_eq!(KeyCommand::from_code(38, &keys), None);
    }

    #[test]
    fn rebinding_moves_the_command() {
        let keys = KeyBindings {
            next: 13,
            ..KeyBindings::default()
        };
        assert_eq!(KeyCommand::from_code(13, &keys), Some(KeyCommand::Next));
        assert_eq!(KeyCommand::from_code(39, &keys), None);
    }
}
