//! In-memory page
//!
//! A serde-loadable stand-in for a live document. It backs the command-line
//! runner and the tests, and records everything the controller writes so the
//! effects can be inspected.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::core::{Point, Rect, Viewport};
use crate::platform::page::{ElementId, Page};
use crate::ui::panel::{PanelMetrics, PanelPlacement};
use crate::ui::renderer::OverlayFrame;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to read page description {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid page description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Element id {0:?} is declared twice")]
    DuplicateElement(ElementId),
}

/// One element of the in-memory document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageElement {
    pub id: ElementId,
    /// Selectors this element answers to, e.g. `#plot`, `.input`, `select`
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Box in document coordinates
    pub rect: Rect,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PageDescription {
    viewport: Viewport,
    nav_bar: Rect,
    #[serde(default)]
    document_height: Option<f32>,
    #[serde(default)]
    panel: PanelMetrics,
    #[serde(default)]
    elements: Vec<PageElement>,
}

#[derive(Debug, Clone)]
pub struct MemoryPage {
    viewport: Viewport,
    nav_bar: Rect,
    document_height: f32,
    panel_metrics: PanelMetrics,
    elements: Vec<PageElement>,
    interactive: BTreeSet<ElementId>,
    content_inert: bool,
    tour_visible: bool,
    panel: Option<PanelPlacement>,
    dismiss_at: Option<Point>,
    task_offset_vw: f32,
    frame: Option<OverlayFrame>,
    frames_presented: usize,
}

impl MemoryPage {
    pub fn new(viewport: Viewport, nav_bar: Rect) -> Self {
        Self {
            viewport,
            nav_bar,
            document_height: viewport.height,
            panel_metrics: PanelMetrics::default(),
            elements: Vec::new(),
            interactive: BTreeSet::new(),
            content_inert: false,
            tour_visible: false,
            panel: None,
            dismiss_at: None,
            task_offset_vw: 0.0,
            frame: None,
            frames_presented: 0,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, PageError> {
        let description: PageDescription = serde_json::from_str(text)?;

        let mut page = Self::new(description.viewport, description.nav_bar);
        page.panel_metrics = description.panel;
        for element in description.elements {
            page.insert(element)?;
        }
        let lowest = page
            .elements
            .iter()
            .map(|element| element.rect.bottom())
            .fold(page.viewport.height, f32::max);
        page.document_height = description.document_height.unwrap_or(lowest).max(lowest);
        page.scroll_to(description.viewport.scroll_y);
        Ok(page)
    }

    pub fn load(path: &Path) -> Result<Self, PageError> {
        let text = std::fs::read_to_string(path).map_err(|source| PageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Adds an element, growing the document when it reaches past the end
    pub fn insert(&mut self, element: PageElement) -> Result<(), PageError> {
        if self.elements.iter().any(|existing| existing.id == element.id) {
            return Err(PageError::DuplicateElement(element.id));
        }
        self.document_height = self.document_height.max(element.rect.bottom());
        self.elements.push(element);
        Ok(())
    }

    /// Removes an element; handles to it stop resolving
    pub fn remove(&mut self, element: ElementId) {
        self.elements.retain(|existing| existing.id != element);
        self.interactive.remove(&element);
    }

    /// Sets the value of every element matching `selector`; returns how many matched
    pub fn set_value(&mut self, selector: &str, value: &str) -> usize {
        let mut matched = 0;
        for element in self.elements.iter_mut().filter(|e| answers_to(e, selector)) {
            element.value = Some(value.to_string());
            matched += 1;
        }
        matched
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.scroll_to(self.viewport.scroll_y);
    }

    /// First element answering to `selector`
    pub fn find(&self, selector: &str) -> Option<ElementId> {
        self.query(selector).into_iter().next()
    }

    pub fn is_interactive(&self, element: ElementId) -> bool {
        self.interactive.contains(&element)
    }

    pub fn is_content_inert(&self) -> bool {
        self.content_inert
    }

    pub fn is_tour_visible(&self) -> bool {
        self.tour_visible
    }

    pub fn panel(&self) -> Option<&PanelPlacement> {
        self.panel.as_ref()
    }

    pub fn dismiss_at(&self) -> Option<Point> {
        self.dismiss_at
    }

    pub fn task_offset_vw(&self) -> f32 {
        self.task_offset_vw
    }

    pub fn frame(&self) -> Option<&OverlayFrame> {
        self.frame.as_ref()
    }

    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }

    fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.height).max(0.0)
    }
}

fn answers_to(element: &PageElement, selector: &str) -> bool {
    selector
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .any(|part| element.selectors.iter().any(|own| own == part))
}

impl Page for MemoryPage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn nav_bar(&self) -> Rect {
        self.nav_bar
    }

    fn query(&self, selector: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|element| answers_to(element, selector))
            .map(|element| element.id)
            .collect()
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.elements
            .iter()
            .find(|existing| existing.id == element)
            .map(|existing| existing.rect.translate(0.0, -self.viewport.scroll_y))
    }

    fn value(&self, element: ElementId) -> Option<String> {
        self.elements
            .iter()
            .find(|existing| existing.id == element)
            .and_then(|existing| existing.value.clone())
    }

    fn panel_metrics(&self) -> PanelMetrics {
        self.panel_metrics
    }

    fn set_interactive(&mut self, element: ElementId, interactive: bool) {
        if interactive {
            self.interactive.insert(element);
        } else {
            self.interactive.remove(&element);
        }
    }

    fn set_content_inert(&mut self, inert: bool) {
        self.content_inert = inert;
    }

    fn set_tour_visible(&mut self, visible: bool) {
        self.tour_visible = visible;
    }

    fn scroll_to(&mut self, y: f32) {
        self.viewport.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    fn show_panel(&mut self, placement: &PanelPlacement) {
        self.dismiss_at = Some(placement.dismiss);
        self.panel = Some(placement.clone());
    }

    fn move_dismiss_control(&mut self, at: Point) {
        self.dismiss_at = Some(at);
    }

    fn set_task_offset(&mut self, offset_vw: f32) {
        self.task_offset_vw = offset_vw;
    }

    fn present(&mut self, frame: OverlayFrame) {
        self.frame = Some(frame);
        self.frames_presented += 1;
    }
}
