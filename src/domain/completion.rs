//! Completion predicate gating forward navigation
//!
//! The predicate only looks at the resolved step and the target's current
//! value. Click steps never pass here: the armed click listener forwards an
//! already-satisfied `Next` instead.

use crate::domain::step::{Interaction, ResolvedStep};

/// Returns true when the user has done what `step` asks for
///
/// `target_value` is the current value of the step's target element, or
/// `None` when the target is absent from the page.
pub fn is_step_complete(step: &ResolvedStep, target_value: Option<&str>) -> bool {
    match step.interaction {
        Interaction::None => match step.completion_value.as_deref() {
            Some(expected) => target_value == Some(expected),
            None => true,
        },
        Interaction::TextInput => target_value.is_some_and(|value| !value.is_empty()),
        Interaction::Click | Interaction::Conflicting => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::TextPosition;

    fn step(interaction: Interaction, completion_value: Option<&str>) -> ResolvedStep {
        ResolvedStep {
            index: 0,
            headline: None,
            explanation: None,
            task: None,
            target_selector: Some("#field".into()),
            text_position: TextPosition::default(),
            interaction,
            completion_value: completion_value.map(str::to_owned),
        }
    }

    #[test]
    fn no_requirement_without_value_passes() {
        assert!(is_step_complete(&step(Interaction::None, None), None));
        assert!(is_step_complete(&step(Interaction::None, None), Some("")));
    }

    #[test]
    fn no_requirement_with_matching_value_passes() {
        let step = step(Interaction::None, Some("histogram"));
        assert!(is_step_complete(&step, Some("histogram")));
    }

    #[test]
    fn no_requirement_with_mismatched_value_blocks() {
        let step = step(Interaction::None, Some("histogram"));
        assert!(!is_step_complete(&step, Some("scatter")));
        assert!(!is_step_complete(&step, Some("Histogram")));
        assert!(!is_step_complete(&step, None));
    }

    #[test]
    fn text_input_needs_non_empty_value() {
        let step = step(Interaction::TextInput, None);
        assert!(is_step_complete(&step, Some("x")));
        assert!(!is_step_complete(&step, Some("")));
        assert!(!is_step_complete(&step, None));
    }

    #[test]
    fn click_and_conflicting_steps_block() {
        assert!(!is_step_complete(&step(Interaction::Click, None), Some("x")));
        assert!(!is_step_complete(&step(Interaction::Conflicting, None), Some("x")));
    }
}
