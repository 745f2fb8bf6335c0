//! The page the tour runs over
//!
//! The engine never owns page content. It reads geometry and values through
//! [`Page`] and writes back interactivity toggles, the panel placement and
//! painted overlay frames.

use serde::{Deserialize, Serialize};

use crate::domain::core::{Point, Rect, Viewport};
use crate::ui::panel::{PanelMetrics, PanelPlacement};
use crate::ui::renderer::OverlayFrame;

/// Non-owning handle to an element of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// Page binding consumed by the tour controller
pub trait Page {
    fn viewport(&self) -> Viewport;

    /// Navigation bar box in viewport coordinates
    fn nav_bar(&self) -> Rect;

    /// Elements matching `selector`, in document order
    fn query(&self, selector: &str) -> Vec<ElementId>;

    /// Box of `element` in viewport coordinates, `None` once it left the page
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Current form value of `element`
    fn value(&self, element: ElementId) -> Option<String>;

    fn panel_metrics(&self) -> PanelMetrics;

    fn set_interactive(&mut self, element: ElementId, interactive: bool);

    /// Makes the page content ignore pointer input (the nav bar is unaffected)
    fn set_content_inert(&mut self, inert: bool);

    /// Shows or hides the tour chrome (panel, controls, overlay canvas)
    fn set_tour_visible(&mut self, visible: bool);

    fn scroll_to(&mut self, y: f32);

    fn show_panel(&mut self, placement: &PanelPlacement);

    fn move_dismiss_control(&mut self, at: Point);

    /// Horizontal offset of the task text in vw, used by the reminder nudge
    fn set_task_offset(&mut self, offset_vw: f32);

    fn present(&mut self, frame: OverlayFrame);
}

/// Elements a step points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    elements: Vec<ElementId>,
}

impl Target {
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// The element whose value the completion predicate reads
    pub fn primary(&self) -> ElementId {
        self.elements[0]
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }
}

/// Looks up a step's target, `None` when the selector matches nothing
pub fn resolve_target<P: Page + ?Sized>(page: &P, selector: &str) -> Option<Target> {
    let elements = page.query(selector);
    if elements.is_empty() {
        None
    } else {
        Some(Target { elements })
    }
}
