//! Line element.

use super::{ElementId, ElementPatch, ElementTrait, Geometry};
use crate::color::Color;
use serde::{Deserialize, Serialize};

fn default_stroke_width() -> f64 {
    LineElement::DEFAULT_STROKE_WIDTH
}

/// A straight rule drawn horizontally across its box, vertically centered.
///
/// The box is taller than the stroke so the line stays easy to grab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    /// Generated when missing from imported JSON.
    #[serde(default)]
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub stroke: Color,
    /// Stroke width in pixels.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl LineElement {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: ElementId::new(),
            geometry,
            stroke: Color::black(),
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
        }
    }
}

impl Default for LineElement {
    fn default() -> Self {
        Self::new(Geometry::new(100.0, 300.0, 300.0, 20.0))
    }
}

impl ElementTrait for LineElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    fn apply_fields(&mut self, patch: &ElementPatch) -> bool {
        let before = (self.stroke, self.stroke_width);
        if let Some(stroke) = patch.stroke {
            self.stroke = stroke;
        }
        if let Some(width) = patch.stroke_width.filter(|v| v.is_finite() && *v > 0.0) {
            self.stroke_width = width;
        }
        (self.stroke, self.stroke_width) != before
    }
}
