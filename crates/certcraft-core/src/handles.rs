//! Selection handles drawn around the selected element.

use crate::elements::Geometry;
use crate::transform::TransformError;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle hit radius in canvas units.
pub const HANDLE_HIT_RADIUS: f64 = 8.0;

/// Distance from the top edge to the rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 32.0;

/// One of the eight resize handles, named by compass position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    #[serde(rename = "t")]
    Top,
    #[serde(rename = "b")]
    Bottom,
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "r")]
    Right,
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    BottomRight,
}

impl ResizeHandle {
    pub fn all() -> &'static [ResizeHandle] {
        &[
            ResizeHandle::TopLeft,
            ResizeHandle::Top,
            ResizeHandle::TopRight,
            ResizeHandle::Left,
            ResizeHandle::Right,
            ResizeHandle::BottomLeft,
            ResizeHandle::Bottom,
            ResizeHandle::BottomRight,
        ]
    }

    /// Short id used by the UI layer (`"t"`, `"br"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::Top => "t",
            ResizeHandle::Bottom => "b",
            ResizeHandle::Left => "l",
            ResizeHandle::Right => "r",
            ResizeHandle::TopLeft => "tl",
            ResizeHandle::TopRight => "tr",
            ResizeHandle::BottomLeft => "bl",
            ResizeHandle::BottomRight => "br",
        }
    }

    /// Direction of the handle from the box center, each axis in `{-1, 0, 1}`.
    pub fn direction(self) -> Vec2 {
        match self {
            ResizeHandle::Top => Vec2::new(0.0, -1.0),
            ResizeHandle::Bottom => Vec2::new(0.0, 1.0),
            ResizeHandle::Left => Vec2::new(-1.0, 0.0),
            ResizeHandle::Right => Vec2::new(1.0, 0.0),
            ResizeHandle::TopLeft => Vec2::new(-1.0, -1.0),
            ResizeHandle::TopRight => Vec2::new(1.0, -1.0),
            ResizeHandle::BottomLeft => Vec2::new(-1.0, 1.0),
            ResizeHandle::BottomRight => Vec2::new(1.0, 1.0),
        }
    }

    /// The handle diametrically across the box.
    pub fn opposite(self) -> Self {
        match self {
            ResizeHandle::Top => ResizeHandle::Bottom,
            ResizeHandle::Bottom => ResizeHandle::Top,
            ResizeHandle::Left => ResizeHandle::Right,
            ResizeHandle::Right => ResizeHandle::Left,
            ResizeHandle::TopLeft => ResizeHandle::BottomRight,
            ResizeHandle::TopRight => ResizeHandle::BottomLeft,
            ResizeHandle::BottomLeft => ResizeHandle::TopRight,
            ResizeHandle::BottomRight => ResizeHandle::TopLeft,
        }
    }

    pub fn is_corner(self) -> bool {
        let d = self.direction();
        d.x != 0.0 && d.y != 0.0
    }

    /// Dragging this handle changes the width.
    pub fn affects_width(self) -> bool {
        self.direction().x != 0.0
    }

    /// Dragging this handle changes the height.
    pub fn affects_height(self) -> bool {
        self.direction().y != 0.0
    }

    /// Offset of the handle from the center of a `width` x `height` box, in
    /// the box's unrotated frame.
    pub fn local_offset(self, width: f64, height: f64) -> Vec2 {
        let d = self.direction();
        Vec2::new(d.x * width / 2.0, d.y * height / 2.0)
    }

    /// Canvas position of the handle on a (possibly rotated) element.
    pub fn position(self, geometry: &Geometry) -> Point {
        geometry.local_to_world(self.local_offset(geometry.width, geometry.height))
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::all()
            .iter()
            .copied()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| TransformError::InvalidHandle(s.to_string()))
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Resize(ResizeHandle),
    /// Rotation handle (above the top edge).
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Canvas position of the rotation handle.
pub fn rotate_handle_position(geometry: &Geometry, offset: f64) -> Point {
    geometry.local_to_world(Vec2::new(0.0, -geometry.height / 2.0 - offset))
}

/// All handles of an element: eight resize handles, then the rotate handle.
pub fn get_handles(geometry: &Geometry, rotate_offset: f64) -> Vec<Handle> {
    ResizeHandle::all()
        .iter()
        .map(|&h| Handle::new(h.position(geometry), HandleKind::Resize(h)))
        .chain(std::iter::once(Handle::new(
            rotate_handle_position(geometry, rotate_offset),
            HandleKind::Rotate,
        )))
        .collect()
}

/// Find the handle nearest to `point` within `tolerance`.
///
/// Ties go to the rotate handle, then to the later resize handles.
pub fn hit_test_handles(
    geometry: &Geometry,
    point: Point,
    tolerance: f64,
    rotate_offset: f64,
) -> Option<HandleKind> {
    let handles = get_handles(geometry, rotate_offset);
    handles
        .iter()
        .rev()
        .filter(|handle| handle.hit_test(point, tolerance))
        .min_by(|a, b| {
            let da = (point - a.position).hypot2();
            let db = (point - b.position).hypot2();
            da.total_cmp(&db)
        })
        .map(|handle| handle.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} vs {b:?}");
    }

    #[test]
    fn test_parse_handle_ids() {
        for &handle in ResizeHandle::all() {
            assert_eq!(handle.as_str().parse::<ResizeHandle>().unwrap(), handle);
        }
        assert!(matches!(
            "north".parse::<ResizeHandle>(),
            Err(TransformError::InvalidHandle(id)) if id == "north"
        ));
    }

    #[test]
    fn test_opposites() {
        for &handle in ResizeHandle::all() {
            assert_eq!(handle.opposite().opposite(), handle);
            assert_eq!(handle.direction() + handle.opposite().direction(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_axes() {
        assert!(ResizeHandle::Right.affects_width() && !ResizeHandle::Right.affects_height());
        assert!(ResizeHandle::Top.affects_height() && !ResizeHandle::Top.affects_width());
        assert!(ResizeHandle::BottomLeft.affects_width() && ResizeHandle::BottomLeft.affects_height());
        assert!(ResizeHandle::TopRight.is_corner());
        assert!(!ResizeHandle::Left.is_corner());
    }

    #[test]
    fn test_handle_positions_unrotated() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        assert_point_eq(ResizeHandle::TopLeft.position(&g), Point::new(100.0, 100.0));
        assert_point_eq(ResizeHandle::BottomRight.position(&g), Point::new(300.0, 200.0));
        assert_point_eq(ResizeHandle::Right.position(&g), Point::new(300.0, 150.0));
        assert_point_eq(rotate_handle_position(&g, ROTATE_HANDLE_OFFSET), Point::new(200.0, 68.0));
    }

    #[test]
    fn test_handle_positions_rotated() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0).with_rotation(90.0);
        // Center (200, 150); local +x points down the screen
        assert_point_eq(ResizeHandle::Right.position(&g), Point::new(200.0, 250.0));
        assert_point_eq(ResizeHandle::Top.position(&g), Point::new(250.0, 150.0));
        assert_point_eq(rotate_handle_position(&g, 32.0), Point::new(282.0, 150.0));
    }

    #[test]
    fn test_rectangle_handles() {
        let g = Geometry::new(0.0, 0.0, 100.0, 50.0);
        let handles = get_handles(&g, ROTATE_HANDLE_OFFSET);
        assert_eq!(handles.len(), 9);
        assert!(matches!(handles[0].kind, HandleKind::Resize(ResizeHandle::TopLeft)));
        assert!(matches!(handles[8].kind, HandleKind::Rotate));
    }

    #[test]
    fn test_hit_test_handles() {
        let g = Geometry::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            hit_test_handles(&g, Point::new(103.0, 52.0), HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET),
            Some(HandleKind::Resize(ResizeHandle::BottomRight))
        );
        assert_eq!(
            hit_test_handles(&g, Point::new(50.0, -30.0), HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET),
            Some(HandleKind::Rotate)
        );
        assert_eq!(
            hit_test_handles(&g, Point::new(50.0, 25.0), HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET),
            None
        );
    }

    #[test]
    fn test_nearest_handle_wins_on_small_box() {
        // Right midpoint (20, 5) and bottom-right corner (20, 10) both in reach
        let g = Geometry::new(0.0, 0.0, 20.0, 10.0);
        assert_eq!(
            hit_test_handles(&g, Point::new(21.0, 6.0), HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET),
            Some(HandleKind::Resize(ResizeHandle::Right))
        );
        assert_eq!(
            hit_test_handles(&g, Point::new(21.0, 9.0), HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET),
            Some(HandleKind::Resize(ResizeHandle::BottomRight))
        );
    }
}
