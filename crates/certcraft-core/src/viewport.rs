//! Where the canvas sits on screen and at what zoom.

use crate::math::{canvas_to_screen, screen_to_canvas};
use crate::transform::TransformError;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Screen placement of the canvas.
///
/// The canvas may be drawn at less than 100% so it fits the window; all
/// element geometry stays in unscaled canvas units and pointer positions are
/// converted through this before they reach the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the canvas' top-left corner.
    pub origin: Point,
    /// Display scale (1.0 = 100%).
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { origin: Point::ZERO, scale: 1.0 }
    }
}

impl Viewport {
    /// Create a viewport, rejecting scales that cannot be inverted.
    pub fn new(origin: Point, scale: f64) -> Result<Self, TransformError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TransformError::InvalidScale(scale));
        }
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(TransformError::CanvasUnavailable);
        }
        Ok(Self { origin, scale })
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        screen_to_canvas(screen_point, self.origin, self.scale)
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        canvas_to_screen(canvas_point, self.origin, self.scale)
    }

    /// Screen rectangle covered by a canvas of the given size.
    pub fn screen_rect(&self, canvas: Size) -> Rect {
        Rect::from_origin_size(self.origin, canvas * self.scale)
    }

    /// Largest scale, capped at 100%, at which `canvas` fits in `available`
    /// after leaving `padding` on every side.
    pub fn fit_scale(canvas: Size, available: Size, padding: f64) -> f64 {
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            return 1.0;
        }
        let width = (available.width - padding * 2.0).max(1.0);
        let height = (available.height - padding * 2.0).max(1.0);
        (width / canvas.width).min(height / canvas.height).min(1.0)
    }

    /// Viewport that shows `canvas` centered in `container` at the fit scale.
    pub fn fit(canvas: Size, container: Rect, padding: f64) -> Self {
        let scale = Self::fit_scale(canvas, container.size(), padding);
        let shown = canvas * scale;
        let center = container.center();
        Self {
            origin: Point::new(center.x - shown.width / 2.0, center.y - shown.height / 2.0),
            scale,
        }
    }
}
