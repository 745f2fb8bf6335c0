//! Placement of the explanation/task panel and its dismiss control

use serde::{Deserialize, Serialize};

use crate::domain::core::{Point, Viewport};
use crate::domain::step::{ResolvedStep, TextPosition};

/// Current on-screen box of the panel as measured by the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelMetrics {
    pub width: f32,
    pub height: f32,
    pub padding_left: f32,
    pub padding_top: f32,
}

impl Default for PanelMetrics {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 160.0,
            padding_left: 16.0,
            padding_top: 16.0,
        }
    }
}

/// Text shown in the panel for one step
#[derive(Debug, Clone, PartialEq)]
pub struct PanelContent {
    /// "<headline> (<n> of <total>)"
    pub progress: String,
    pub explanation: Option<String>,
    pub task: Option<String>,
    pub separator_visible: bool,
}

impl PanelContent {
    pub fn for_step(step: &ResolvedStep, total_steps: usize) -> Self {
        let headline = step.headline.as_deref().unwrap_or_default();
        let progress = format!("{} ({} of {})", headline, step.index + 1, total_steps)
            .trim_start()
            .to_string();

        Self {
            progress,
            explanation: step.explanation.clone(),
            task: step.task.clone(),
            separator_visible: step.shows_separator(),
        }
    }
}

/// Where the panel and its dismiss control go
#[derive(Debug, Clone, PartialEq)]
pub struct PanelPlacement {
    pub left: f32,
    pub top: f32,
    pub dismiss: Point,
    pub content: PanelContent,
}

impl PanelPlacement {
    /// Places `content` at the step's anchor, kept clear of the nav bar
    pub fn compute(
        content: PanelContent,
        position: TextPosition,
        viewport: Viewport,
        metrics: PanelMetrics,
        bar_height: f32,
    ) -> Self {
        let left = viewport.vw(position.x);
        let top = clamp_below_nav(viewport.vh(position.y), metrics, bar_height);

        Self {
            left,
            top,
            dismiss: dismiss_position(left, top, metrics),
            content,
        }
    }
}

/// Pushes the panel down when its upper edge would slide under the nav bar
///
/// The panel is centred on `top`, so its visual upper edge sits half a
/// height above it; three top paddings of breathing room are kept on top.
pub fn clamp_below_nav(top: f32, metrics: PanelMetrics, bar_height: f32) -> f32 {
    let overlap = (top - metrics.height / 2.0) - metrics.padding_top * 3.0 - bar_height;
    if overlap < 0.0 { top - overlap } else { top }
}

/// Dismiss control anchored to the panel's upper-right corner
pub fn dismiss_position(left: f32, top: f32, metrics: PanelMetrics) -> Point {
    Point::new(
        left + metrics.padding_left / 2.0 + metrics.width / 2.0,
        top - metrics.height / 2.0 - metrics.padding_top / 2.0,
    )
}
