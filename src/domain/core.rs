//! Core geometry types
//!
//! Everything here works in CSS pixels as reported by the page. Viewport
//! coordinates have their origin at the top-left of the visible area; page
//! coordinates add the current vertical scroll offset.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Grows the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// Moves the rectangle by the given offset
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// Point in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Visible area of the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Vertical scroll offset of the document
    #[serde(default)]
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    /// Converts a percentage of the viewport width (`vw`) to pixels
    pub fn vw(&self, percent: f32) -> f32 {
        self.width * percent / 100.0
    }

    /// Converts a percentage of the viewport height (`vh`) to pixels
    pub fn vh(&self, percent: f32) -> f32 {
        self.height * percent / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_bottom_edge() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.bottom(), 70.0);
    }

    #[test]
    fn translate_keeps_size() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0).translate(5.0, -20.0);
        assert_eq!(rect, Rect::new(15.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn inflate_grows_every_side() {
        let rect = Rect::new(100.0, 50.0, 40.0, 20.0).inflate(6.0);
        assert_eq!(rect, Rect::new(94.0, 44.0, 52.0, 32.0));
    }

    #[test]
    fn viewport_percent_units() {
        let viewport = Viewport::new(1200.0, 800.0);
        assert_eq!(viewport.vw(50.0), 600.0);
        assert_eq!(viewport.vh(25.0), 200.0);
    }
}
