//! Viewport: the host's render scale and page placement on screen.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Maps between screen pixels and document units.
///
/// `scale` is the rendered width of the page container divided by its
/// logical width. `origin` is the screen position of the page's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub origin: Point,
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            scale: 1.0,
            min_scale: 0.1,
            max_scale: 10.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport for a page rendered `rendered_width` pixels wide.
    pub fn from_rendered_width(rendered_width: f64, logical_width: f64, origin: Point) -> Self {
        let mut viewport = Self {
            origin,
            ..Self::default()
        };
        if logical_width > 0.0 {
            viewport.set_scale(rendered_width / logical_width);
        }
        viewport
    }

    /// Set the render scale. Non-finite or non-positive values are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale.clamp(self.min_scale, self.max_scale);
        }
    }

    /// Document to screen.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.scale)
    }

    /// Screen to document.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.origin.to_vec2())
    }

    pub fn screen_to_document(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn document_to_screen(&self, document_point: Point) -> Point {
        self.transform() * document_point
    }

    /// Convert a raw pointer delta in pixels to document units.
    pub fn pixel_delta_to_document(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Convert a pixel distance to document units.
    pub fn pixels_to_document(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// Zoom keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let anchor = self.screen_to_document(screen_point);
        self.set_scale(self.scale * factor);
        let moved = self.document_to_screen(anchor);
        self.origin += screen_point - moved;
    }
}
