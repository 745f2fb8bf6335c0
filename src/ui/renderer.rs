//! Overlay rendering system
//!
//! Paints the dim layer with its cut-out holes using tiny-skia. Geometry is
//! computed up front in [`OverlayLayout`] so it can be tested without
//! touching pixels.
//!
//! The canvas starts right below the navigation bar, so everything measured
//! in viewport coordinates is shifted up by the bar height before drawing.

use std::path::Path;

use tiny_skia::{
    BlendMode, Color, FillRule, LineJoin, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke,
    Transform,
};

use crate::config::TourConfig;
use crate::domain::core::{Rect, Viewport};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("Failed to encode overlay frame: {0}")]
    EncodingFailed(String),
}

/// Pre-calculated geometry for one overlay paint
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Distance from the viewport top to the canvas top (the nav bar height)
    pub origin_y: f32,
    /// Padded target boxes in canvas coordinates
    pub holes: Vec<Rect>,
    pub hole_stroke: f32,
    /// Nav bar box in canvas coordinates
    pub nav: Rect,
    pub dim_color: Color,
    pub nav_color: Color,
}

impl OverlayLayout {
    /// Lays out the overlay for the given viewport, nav bar and target boxes
    ///
    /// `nav_bar` and `targets` are in viewport coordinates.
    pub fn compute(
        viewport: Viewport,
        nav_bar: Rect,
        targets: &[Rect],
        config: &TourConfig,
    ) -> Self {
        let origin_y = nav_bar.h.max(0.0);

        // Zero-size targets still get the padded cut-out
        let holes = targets
            .iter()
            .map(|rect| rect.inflate(config.hole_padding).translate(0.0, -origin_y))
            .collect();

        Self {
            canvas_width: viewport.width,
            canvas_height: viewport.height - origin_y,
            origin_y,
            holes,
            hole_stroke: config.hole_stroke,
            nav: nav_bar.translate(0.0, -origin_y),
            dim_color: black(config.dim_alpha),
            nav_color: black(config.nav_dim_alpha),
        }
    }
}

fn black(alpha: f32) -> Color {
    Color::from_rgba8(0, 0, 0, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// A painted overlay ready to be composited over the page
#[derive(Debug, Clone)]
pub struct OverlayFrame {
    pub pixmap: Pixmap,
    /// Vertical offset of the canvas inside the viewport
    pub origin_y: f32,
    /// Holes that were cut, in canvas coordinates
    pub holes: Vec<Rect>,
}

impl OverlayFrame {
    /// Alpha of the canvas pixel at (`x`, `y`), `None` outside the canvas
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|pixel| pixel.alpha())
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RendererError> {
        self.pixmap
            .save_png(path)
            .map_err(|err| RendererError::EncodingFailed(err.to_string()))
    }
}

/// Overlay painter
#[derive(Debug, Default)]
pub struct OverlayRenderer;

impl OverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders a layout to a fresh pixmap
    pub fn render(&self, layout: &OverlayLayout) -> Result<OverlayFrame, RendererError> {
        let invalid = || RendererError::InvalidCanvas {
            width: layout.canvas_width,
            height: layout.canvas_height,
        };
        if !(layout.canvas_width >= 1.0 && layout.canvas_height >= 1.0) {
            return Err(invalid());
        }

        let mut pixmap = Pixmap::new(
            layout.canvas_width.round() as u32,
            layout.canvas_height.round() as u32,
        )
        .ok_or_else(invalid)?;

        self.render_dim(&mut pixmap, layout);
        self.render_holes(&mut pixmap, layout);
        self.render_nav(&mut pixmap, layout);

        Ok(OverlayFrame {
            pixmap,
            origin_y: layout.origin_y,
            holes: layout.holes.clone(),
        })
    }

    fn render_dim(&self, pixmap: &mut Pixmap, layout: &OverlayLayout) {
        pixmap.fill(Color::TRANSPARENT);
        pixmap.fill(layout.dim_color);
    }

    /// Erases every padded target box plus a round-joined stroke around it
    fn render_holes(&self, pixmap: &mut Pixmap, layout: &OverlayLayout) {
        let paint = eraser();
        let stroke = Stroke {
            width: layout.hole_stroke,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        for hole in &layout.holes {
            let Some(rect) = SkiaRect::from_xywh(hole.x, hole.y, hole.w, hole.h) else {
                continue;
            };
            let path = PathBuilder::from_rect(rect);
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            if layout.hole_stroke > 0.0 {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    /// Clears the nav bar, then repaints a translucent layer behind it
    fn render_nav(&self, pixmap: &mut Pixmap, layout: &OverlayLayout) {
        let nav = layout.nav;
        let Some(rect) = SkiaRect::from_xywh(nav.x, nav.y, nav.w, nav.h) else {
            return;
        };

        pixmap.fill_rect(rect, &eraser(), Transform::identity(), None);

        let mut behind = Paint::default();
        behind.set_color(layout.nav_color);
        behind.blend_mode = BlendMode::DestinationOver;
        pixmap.fill_rect(rect, &behind, Transform::identity(), None);
    }
}

fn eraser() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::BLACK);
    paint.blend_mode = BlendMode::DestinationOut;
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with_target(target: Option<Rect>) -> OverlayLayout {
        let targets: Vec<Rect> = target.into_iter().collect();
        OverlayLayout::compute(
            Viewport::new(800.0, 600.0),
            Rect::new(0.0, 0.0, 800.0, 50.0),
            &targets,
            &TourConfig::default(),
        )
    }

    #[test]
    fn canvas_excludes_nav_bar() {
        let layout = layout_with_target(None);
        assert_eq!(layout.canvas_width, 800.0);
        assert_eq!(layout.canvas_height, 550.0);
        assert_eq!(layout.origin_y, 50.0);
        assert!(layout.holes.is_empty());
    }

    #[test]
    fn holes_are_padded_and_shifted_into_canvas_space() {
        let layout = layout_with_target(Some(Rect::new(100.0, 200.0, 80.0, 40.0)));
        assert_eq!(layout.holes, vec![Rect::new(94.0, 144.0, 92.0, 52.0)]);
    }

    #[test]
    fn zero_size_target_still_cuts_padding() {
        let layout = layout_with_target(Some(Rect::new(100.0, 200.0, 0.0, 0.0)));
        assert_eq!(layout.holes, vec![Rect::new(94.0, 144.0, 12.0, 12.0)]);

        let frame = OverlayRenderer::new().render(&layout).unwrap();
        assert_eq!(frame.alpha_at(100, 150), Some(0));
        assert_eq!(frame.alpha_at(100, 300), Some(128));
    }

    #[test]
    fn render_dims_everything_without_target() {
        let frame = OverlayRenderer::new()
            .render(&layout_with_target(None))
            .unwrap();

        assert_eq!(frame.width(), 800);
        assert_eq!(frame.height(), 550);
        assert_eq!(frame.alpha_at(10, 10), Some(128));
        assert_eq!(frame.alpha_at(400, 500), Some(128));
    }

    #[test]
    fn render_cuts_hole_around_target() {
        let frame = OverlayRenderer::new()
            .render(&layout_with_target(Some(Rect::new(100.0, 200.0, 80.0, 40.0))))
            .unwrap();

        // Centre of the target, in canvas coordinates
        assert_eq!(frame.alpha_at(140, 170), Some(0));
        // Inside padding plus half the stroke
        assert_eq!(frame.alpha_at(86, 170), Some(0));
        // Well outside
        assert_eq!(frame.alpha_at(40, 170), Some(128));
        assert_eq!(frame.alpha_at(140, 400), Some(128));
    }

    #[test]
    fn nav_bar_inside_canvas_is_repainted_translucent() {
        let layout = OverlayLayout::compute(
            Viewport::new(400.0, 400.0),
            Rect::new(0.0, 100.0, 400.0, 40.0),
            &[],
            &TourConfig {
                dim_alpha: 0.8,
                nav_dim_alpha: 0.5,
                ..TourConfig::default()
            },
        );
        let frame = OverlayRenderer::new().render(&layout).unwrap();

        // Nav sits at canvas y 60..100
        assert_eq!(frame.alpha_at(200, 80), Some(128));
        assert_eq!(frame.alpha_at(200, 20), Some(204));
    }

    #[test]
    fn degenerate_viewport_is_rejected() {
        let layout = OverlayLayout::compute(
            Viewport::new(800.0, 40.0),
            Rect::new(0.0, 0.0, 800.0, 50.0),
            &[],
            &TourConfig::default(),
        );
        assert!(matches!(
            OverlayRenderer::new().render(&layout),
            Err(RendererError::InvalidCanvas { .. })
        ));
    }
}
