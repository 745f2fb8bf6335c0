//! Step records and field-by-field fallback resolution

use serde::{Deserialize, Serialize};

/// Panel anchor in viewport-percentage units (`x` in vw, `y` in vh)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for TextPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// A single step as it appears in the step document
///
/// Every field except `index` may be left out; [`StepRecord::resolve`] fills
/// the gaps from the document's [`DefaultRecord`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub target_selector: Option<String>,
    #[serde(default)]
    pub text_position: Option<TextPosition>,
    #[serde(default)]
    pub requires_click: Option<bool>,
    #[serde(default)]
    pub requires_text_input: Option<bool>,
    #[serde(default)]
    pub completion_value: Option<String>,
}

/// Fallback values shared by all steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DefaultRecord {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub target_selector: Option<String>,
    #[serde(default)]
    pub text_position: Option<TextPosition>,
    #[serde(default)]
    pub requires_click: Option<bool>,
    #[serde(default)]
    pub requires_text_input: Option<bool>,
    #[serde(default)]
    pub completion_value: Option<String>,
}

/// What the user has to do before `Next` is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing, or a specific target value when `completion_value` is set
    None,
    /// Click the target element
    Click,
    /// Type anything into the target element
    TextInput,
    /// Both flags set; progress is blocked for good
    Conflicting,
}

impl Interaction {
    pub fn from_flags(requires_click: bool, requires_text_input: bool) -> Self {
        match (requires_click, requires_text_input) {
            (false, false) => Interaction::None,
            (true, false) => Interaction::Click,
            (false, true) => Interaction::TextInput,
            (true, true) => Interaction::Conflicting,
        }
    }
}

/// A step with all fallbacks applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStep {
    pub index: usize,
    pub headline: Option<String>,
    pub explanation: Option<String>,
    pub task: Option<String>,
    pub target_selector: Option<String>,
    pub text_position: TextPosition,
    pub interaction: Interaction,
    pub completion_value: Option<String>,
}

impl ResolvedStep {
    /// The separator between explanation and task only shows when both exist
    pub fn shows_separator(&self) -> bool {
        self.explanation.is_some() && self.task.is_some()
    }
}

/// Picks `raw` when it holds any text, otherwise `fallback`
///
/// Only the empty string counts as missing; whitespace is kept verbatim.
fn pick_text(raw: &Option<String>, fallback: &Option<String>) -> Option<String> {
    non_empty(raw).or_else(|| non_empty(fallback))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

impl StepRecord {
    /// Merges this record with `defaults`, raw values winning when present
    pub fn resolve(&self, defaults: &DefaultRecord) -> ResolvedStep {
        let requires_click = self
            .requires_click
            .or(defaults.requires_click)
            .unwrap_or(false);
        let requires_text_input = self
            .requires_text_input
            .or(defaults.requires_text_input)
            .unwrap_or(false);

        ResolvedStep {
            index: self.index,
            headline: pick_text(&self.headline, &defaults.headline),
            explanation: pick_text(&self.explanation, &defaults.explanation),
            task: pick_text(&self.task, &defaults.task),
            target_selector: pick_text(&self.target_selector, &defaults.target_selector),
            text_position: self
                .text_position
                .or(defaults.text_position)
                .unwrap_or_default(),
            interaction: Interaction::from_flags(requires_click, requires_text_input),
            completion_value: pick_text(&self.completion_value, &defaults.completion_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> DefaultRecord {
        DefaultRecord {
            headline: Some("Tour".into()),
            explanation: Some("Default explanation".into()),
            task: Some("Press the right arrow".into()),
            target_selector: Some("#plot".into()),
            text_position: Some(TextPosition { x: 30.0, y: 70.0 }),
            ..DefaultRecord::default()
        }
    }

    #[test]
    fn raw_values_win_when_present() {
        let record = StepRecord {
            index: 2,
            headline: Some("Axes".into()),
            target_selector: Some("#xaxis".into()),
            text_position: Some(TextPosition { x: 10.0, y: 20.0 }),
            ..StepRecord::default()
        };

        let resolved = record.resolve(&defaults());
        assert_eq!(resolved.index, 2);
        assert_eq!(resolved.headline.as_deref(), Some("Axes"));
        assert_eq!(resolved.target_selector.as_deref(), Some("#xaxis"));
        assert_eq!(resolved.text_position, TextPosition { x: 10.0, y: 20.0 });
        assert_eq!(resolved.explanation.as_deref(), Some("Default explanation"));
    }

    #[test]
    fn empty_raw_text_falls_back() {
        let record = StepRecord {
            index: 0,
            headline: Some(String::new()),
            target_selector: Some(String::new()),
            ..StepRecord::default()
        };

        let resolved = record.resolve(&defaults());
        assert_eq!(resolved.headline.as_deref(), Some("Tour"));
        assert_eq!(resolved.target_selector.as_deref(), Some("#plot"));
        assert_eq!(resolved.text_position, TextPosition { x: 30.0, y: 70.0 });
    }

    #[test]
    fn whitespace_text_is_kept() {
        let record = StepRecord {
            index: 0,
            headline: Some(" ".into()),
            completion_value: Some(" ".into()),
            ..StepRecord::default()
        };

        let resolved = record.resolve(&defaults());
        assert_eq!(resolved.headline.as_deref(), Some(" "));
        assert_eq!(resolved.completion_value.as_deref(), Some(" "));
    }

    #[test]
    fn missing_everywhere_stays_missing() {
        let resolved = StepRecord::default().resolve(&DefaultRecord::default());
        assert!(resolved.headline.is_none());
        assert!(resolved.completion_value.is_none());
        assert_eq!(resolved.text_position, TextPosition::default());
        assert_eq!(resolved.interaction, Interaction::None);
    }

    #[test]
    fn flags_fall_back_to_default_record() {
        let defaults = DefaultRecord {
            requires_text_input: Some(true),
            ..DefaultRecord::default()
        };
        let inherits = StepRecord::default().resolve(&defaults);
        assert_eq!(inherits.interaction, Interaction::TextInput);

        let overrides = StepRecord {
            requires_text_input: Some(false),
            requires_click: Some(true),
            ..StepRecord::default()
        }
        .resolve(&defaults);
        assert_eq!(overrides.interaction, Interaction::Click);
    }

    #[test]
    fn both_flags_conflict() {
        assert_eq!(Interaction::from_flags(true, true), Interaction::Conflicting);
    }

    #[test]
    fn separator_needs_explanation_and_task() {
        let mut resolved = StepRecord::default().resolve(&defaults());
        assert!(resolved.shows_separator());
        resolved.task = None;
        assert!(!resolved.shows_separator());
    }
}
