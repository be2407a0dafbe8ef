//! Element definitions for the certificate canvas.

mod image;
mod line;
mod text;

pub use image::ImageElement;
pub use line::LineElement;
pub use text::{FONT_FACES, FontStyle, FontWeight, TextAlign, TextDecoration, TextElement};

use crate::color::Color;
use crate::math::{normalize_degrees, rotate_vector};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Smallest width or height a resize may produce, in canvas units.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Opaque element identifier.
///
/// New elements get a UUID, but imported documents may carry any string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Position, size and rotation shared by every element.
///
/// `(x, y)` is the top-left corner of the unrotated box in canvas units.
/// `rotation` is in degrees, clockwise, about the box center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, deserialize_with = "deserialize_rotation")]
    pub rotation: f64,
}

/// Imported rotations may be negative or past a full turn.
fn deserialize_rotation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let degrees = f64::deserialize(deserializer)?;
    Ok(if degrees.is_finite() { normalize_degrees(degrees) } else { 0.0 })
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation: 0.0 }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_degrees(degrees);
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Finite position and a strictly positive size.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }

    /// The unrotated box.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Map a local offset from the center (unrotated frame) into canvas space.
    pub fn local_to_world(&self, offset: Vec2) -> Point {
        self.center() + rotate_vector(offset, self.rotation_radians())
    }

    /// Map a canvas point into an offset from the center in the unrotated frame.
    pub fn world_to_local(&self, point: Point) -> Vec2 {
        rotate_vector(point - self.center(), -self.rotation_radians())
    }

    /// Whether a canvas point falls inside the rotated box, grown by `tolerance`.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        let local = self.world_to_local(point);
        local.x.abs() <= self.width / 2.0 + tolerance && local.y.abs() <= self.height / 2.0 + tolerance
    }

    /// Corners of the rotated box: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [
            self.local_to_world(Vec2::new(-hw, -hh)),
            self.local_to_world(Vec2::new(hw, -hh)),
            self.local_to_world(Vec2::new(hw, hh)),
            self.local_to_world(Vec2::new(-hw, hh)),
        ]
    }

    /// Axis-aligned box enclosing the rotated element.
    pub fn world_bounds(&self) -> Rect {
        let corners = self.corners();
        corners[1..]
            .iter()
            .fold(Rect::from_points(corners[0], corners[0]), |r, p| r.union_pt(*p))
    }

    /// Apply the geometry fields of a patch. Returns true if anything changed.
    ///
    /// Non-finite numbers and non-positive sizes are ignored; rotation is
    /// wrapped into `[0, 360)`.
    pub fn apply(&mut self, patch: &ElementPatch) -> bool {
        let before = *self;
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.y = y;
        }
        if let Some(w) = patch.width.filter(|v| v.is_finite() && *v > 0.0) {
            self.width = w;
        }
        if let Some(h) = patch.height.filter(|v| v.is_finite() && *v > 0.0) {
            self.height = h;
        }
        if let Some(r) = patch.rotation.filter(|v| v.is_finite()) {
            self.rotation = normalize_degrees(r);
        }
        *self != before
    }
}

/// Sparse update for an element. Only present fields are applied.
///
/// A patch has no `type` or `id` field, so it can never change an element's
/// variant or identity. Fields that do not exist on the target variant are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl ElementPatch {
    /// Patch setting only the position.
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Patch setting only the rotation.
    pub fn rotation(degrees: f64) -> Self {
        Self { rotation: Some(degrees), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Common behavior of every element variant.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> &ElementId;

    fn geometry(&self) -> &Geometry;

    fn geometry_mut(&mut self) -> &mut Geometry;

    /// Apply the variant-specific fields of a patch. Returns true if anything changed.
    fn apply_fields(&mut self, patch: &ElementPatch) -> bool;
}

/// Discriminant of an [`Element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Line,
}

/// Enum wrapper for all element types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Image(ImageElement),
    /// Older templates tag lines as generic shapes.
    #[serde(alias = "shape")]
    Line(LineElement),
}

impl Element {
    /// A text element with the editor's default styling.
    pub fn new_text() -> Self {
        Element::Text(TextElement::default())
    }

    /// An image element pointing at the placeholder picture.
    pub fn new_image() -> Self {
        Element::Image(ImageElement::default())
    }

    /// A horizontal divider line.
    pub fn new_line() -> Self {
        Element::Line(LineElement::default())
    }

    /// Default element of the given kind.
    pub fn new_of_kind(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => Self::new_text(),
            ElementKind::Image => Self::new_image(),
            ElementKind::Line => Self::new_line(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Text(_) => ElementKind::Text,
            Element::Image(_) => ElementKind::Image,
            Element::Line(_) => ElementKind::Line,
        }
    }

    pub fn id(&self) -> &ElementId {
        match self {
            Element::Text(e) => e.id(),
            Element::Image(e) => e.id(),
            Element::Line(e) => e.id(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Element::Text(e) => e.geometry(),
            Element::Image(e) => e.geometry(),
            Element::Line(e) => e.geometry(),
        }
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        match self {
            Element::Text(e) => e.geometry_mut(),
            Element::Image(e) => e.geometry_mut(),
            Element::Line(e) => e.geometry_mut(),
        }
    }

    /// Merge a patch into this element. Returns true if anything changed.
    pub fn apply_patch(&mut self, patch: &ElementPatch) -> bool {
        let moved = self.geometry_mut().apply(patch);
        let edited = match self {
            Element::Text(e) => e.apply_fields(patch),
            Element::Image(e) => e.apply_fields(patch),
            Element::Line(e) => e.apply_fields(patch),
        };
        moved || edited
    }

    /// Copy of this element with a patch merged in.
    pub fn patched(&self, patch: &ElementPatch) -> Self {
        let mut element = self.clone();
        element.apply_patch(patch);
        element
    }

    /// Replace the identifier. Used when building elements with a known id.
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        let id = id.into();
        match &mut self {
            Element::Text(e) => e.id = id,
            Element::Image(e) => e.id = id,
            Element::Line(e) => e.id = id,
        }
        self
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineElement> {
        match self {
            Element::Line(l) => Some(l),
            _ => None,
        }
    }
}
