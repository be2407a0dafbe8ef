//! Direct-manipulation transforms: move, resize and rotate.
//!
//! A [`TransformSession`] lives for one pointer gesture. It captures the
//! element's geometry when the pointer goes down and, for every pointer
//! move, computes the next geometry from that starting snapshot. It never
//! holds a reference into the document: results come out as
//! [`GeometryUpdate`]s addressed by element id, for the caller to apply
//! through the element store.

use crate::elements::{ElementId, ElementPatch, Geometry, MIN_ELEMENT_SIZE};
use crate::handles::ResizeHandle;
use crate::math::{is_finite_point, normalize_degrees, rotate_vector};
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a transform session refuses to start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("unknown resize handle `{0}`")]
    InvalidHandle(String),
    #[error("canvas position on screen is not known")]
    CanvasUnavailable,
    #[error("element {0} not found")]
    UnknownElement(ElementId),
    #[error("invalid display scale {0}")]
    InvalidScale(f64),
    #[error("pointer position is missing or not finite")]
    InvalidPointer,
    #[error("another transform is already in progress")]
    SessionActive,
}

/// What a gesture does to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "handle", rename_all = "lowercase")]
pub enum InteractionKind {
    Move,
    Resize(ResizeHandle),
    Rotate,
}

impl InteractionKind {
    /// Resize from a handle given by its short id (`"t"`, `"br"`, ...).
    pub fn resize(handle: &str) -> Result<Self, TransformError> {
        Ok(Self::Resize(handle.parse()?))
    }
}

/// Next geometry for one element, as produced by a pointer move.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryUpdate {
    pub id: ElementId,
    /// Only the fields this kind of gesture changes.
    pub patch: ElementPatch,
}

/// State captured at pointer-down, one variant per gesture kind.
#[derive(Debug, Clone, Default)]
pub enum TransformSession {
    #[default]
    Idle,
    Moving {
        id: ElementId,
        viewport: Viewport,
        /// Pointer position at pointer-down, in canvas units.
        start_pointer: Point,
        start: Geometry,
    },
    Resizing {
        id: ElementId,
        viewport: Viewport,
        start_pointer: Point,
        start: Geometry,
        handle: ResizeHandle,
        /// Canvas position of the grabbed handle at pointer-down.
        handle_origin: Point,
        /// Point opposite the handle; stays fixed for the whole gesture.
        pivot: Point,
        min_size: f64,
    },
    Rotating {
        id: ElementId,
        viewport: Viewport,
        /// Element center, the rotation pivot.
        center: Point,
    },
}

impl TransformSession {
    pub fn new() -> Self {
        Self::Idle
    }

    /// Begin a gesture on an element.
    ///
    /// `viewport` is `None` while the canvas is not laid out on screen; the
    /// session then refuses to start. `min_size` below [`MIN_ELEMENT_SIZE`]
    /// is raised to it.
    pub fn start(
        &mut self,
        id: ElementId,
        geometry: &Geometry,
        kind: InteractionKind,
        screen_point: Point,
        viewport: Option<Viewport>,
        min_size: f64,
    ) -> Result<(), TransformError> {
        if self.is_active() {
            return Err(TransformError::SessionActive);
        }
        let Some(viewport) = viewport else {
            log::warn!("Refusing to start {kind:?} on {id}: canvas not mounted");
            return Err(TransformError::CanvasUnavailable);
        };
        if !is_finite_point(screen_point) {
            return Err(TransformError::InvalidPointer);
        }

        let start_pointer = viewport.screen_to_canvas(screen_point);
        let start = *geometry;
        log::debug!("Starting {kind:?} on {id} at {start_pointer:?}");

        *self = match kind {
            InteractionKind::Move => Self::Moving { id, viewport, start_pointer, start },
            InteractionKind::Resize(handle) => Self::Resizing {
                id,
                viewport,
                start_pointer,
                start,
                handle,
                handle_origin: handle.position(&start),
                pivot: resize_pivot(&start, handle),
                min_size: min_size.max(MIN_ELEMENT_SIZE),
            },
            InteractionKind::Rotate => Self::Rotating {
                id,
                viewport,
                center: start.center(),
            },
        };
        Ok(())
    }

    /// Compute the element's geometry for a new pointer position.
    ///
    /// Returns `None` when idle, and when the sample has no usable
    /// coordinates; in that case the last emitted geometry stands.
    pub fn update(&self, screen_point: Option<Point>) -> Option<GeometryUpdate> {
        if !self.is_active() {
            return None;
        }
        let Some(screen_point) = screen_point.filter(|p| is_finite_point(*p)) else {
            log::debug!("Ignoring malformed pointer sample");
            return None;
        };

        match self {
            Self::Idle => None,
            Self::Moving { id, viewport, start_pointer, start } => {
                let pointer = viewport.screen_to_canvas(screen_point);
                let moved = move_geometry(start, pointer - *start_pointer);
                Some(GeometryUpdate {
                    id: id.clone(),
                    patch: ElementPatch::position(moved.x, moved.y),
                })
            }
            Self::Resizing {
                id,
                viewport,
                start_pointer,
                start,
                handle,
                handle_origin,
                pivot,
                min_size,
            } => {
                let pointer = viewport.screen_to_canvas(screen_point);
                // Track the handle itself so grabbing it off-center doesn't jump
                let target = *handle_origin + (pointer - *start_pointer);
                let resized = resize_geometry(start, *handle, *pivot, target, *min_size);
                Some(GeometryUpdate {
                    id: id.clone(),
                    patch: ElementPatch {
                        x: Some(resized.x),
                        y: Some(resized.y),
                        width: Some(resized.width),
                        height: Some(resized.height),
                        ..Default::default()
                    },
                })
            }
            Self::Rotating { id, viewport, center, .. } => {
                let pointer = viewport.screen_to_canvas(screen_point);
                Some(GeometryUpdate {
                    id: id.clone(),
                    patch: ElementPatch::rotation(rotation_towards(*center, pointer)),
                })
            }
        }
    }

    /// Finish the gesture (pointer released). Returns the element it acted on.
    pub fn end(&mut self) -> Option<ElementId> {
        let id = self.element_id().cloned();
        if let Some(id) = &id {
            log::debug!("Ending transform on {id}");
        }
        *self = Self::Idle;
        id
    }

    /// Abandon the gesture without emitting anything further.
    pub fn cancel(&mut self) {
        if let Some(id) = self.element_id() {
            log::debug!("Cancelling transform on {id}");
        }
        *self = Self::Idle;
    }

    /// Cancel the session if it is acting on `id`. Returns true if it was.
    pub fn invalidate(&mut self, id: &ElementId) -> bool {
        if self.element_id() == Some(id) {
            self.cancel();
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Element the active gesture acts on.
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            Self::Idle => None,
            Self::Moving { id, .. } | Self::Resizing { id, .. } | Self::Rotating { id, .. } => Some(id),
        }
    }

    /// Kind of the active gesture.
    pub fn kind(&self) -> Option<InteractionKind> {
        match self {
            Self::Idle => None,
            Self::Moving { .. } => Some(InteractionKind::Move),
            Self::Resizing { handle, .. } => Some(InteractionKind::Resize(*handle)),
            Self::Rotating { .. } => Some(InteractionKind::Rotate),
        }
    }
}

/// Translate a geometry by a canvas-space delta. No clamping to the canvas.
pub fn move_geometry(start: &Geometry, delta: Vec2) -> Geometry {
    Geometry {
        x: start.x + delta.x,
        y: start.y + delta.y,
        ..*start
    }
}

/// Rotation (degrees, `[0, 360)`) that points the element's top at `pointer`.
///
/// 0° means the rotate handle points straight up; angles grow clockwise.
/// A pointer exactly on the center yields 90°.
pub fn rotation_towards(center: Point, pointer: Point) -> f64 {
    let d = pointer - center;
    normalize_degrees(d.y.atan2(d.x).to_degrees() + 90.0)
}

/// Canvas point that stays fixed while dragging `handle`: the matching
/// point on the opposite side of the box.
pub fn resize_pivot(geometry: &Geometry, handle: ResizeHandle) -> Point {
    handle.opposite().position(geometry)
}

/// Resize `start` so the grabbed handle follows `target` while `pivot` stays
/// put. Works in the element's own rotated frame, so handles extend the box
/// along its axes rather than the canvas axes.
///
/// `target` is where the handle should be, not the raw pointer. Sessions
/// pass the handle's starting position plus the pointer delta, so the
/// pivot-to-target vector differs from pivot-to-pointer by the offset at
/// which the handle was grabbed.
pub fn resize_geometry(
    start: &Geometry,
    handle: ResizeHandle,
    pivot: Point,
    target: Point,
    min_size: f64,
) -> Geometry {
    let angle = start.rotation_radians();
    let local = rotate_vector(target - pivot, -angle);
    let dir = handle.direction();

    let width = if handle.affects_width() {
        local.x.abs().max(min_size)
    } else {
        start.width
    };
    let height = if handle.affects_height() {
        local.y.abs().max(min_size)
    } else {
        start.height
    };

    // Dragging past the pivot flips to the other side instead of inverting
    let side = |component: f64, fallback: f64| if component == 0.0 { fallback } else { component.signum() };
    let center_offset = Vec2::new(
        if handle.affects_width() { side(local.x, dir.x) * width / 2.0 } else { 0.0 },
        if handle.affects_height() { side(local.y, dir.y) * height / 2.0 } else { 0.0 },
    );

    let center = pivot + rotate_vector(center_offset, angle);
    Geometry {
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
        rotation: start.rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_geometry_eq(actual: &Geometry, expected: &Geometry) {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
        assert!(
            close(actual.x, expected.x)
                && close(actual.y, expected.y)
                && close(actual.width, expected.width)
                && close(actual.height, expected.height)
                && close(actual.rotation, expected.rotation),
            "{actual:?} != {expected:?}"
        );
    }

    fn apply(geometry: &Geometry, update: &GeometryUpdate) -> Geometry {
        let mut next = *geometry;
        next.apply(&update.patch);
        next
    }

    /// Run one full gesture with the identity viewport and return the result.
    fn drag(geometry: &Geometry, kind: InteractionKind, from: Point, to: Point) -> Geometry {
        let mut session = TransformSession::new();
        session
            .start("el".into(), geometry, kind, from, Some(Viewport::default()), MIN_ELEMENT_SIZE)
            .unwrap();
        let update = session.update(Some(to)).unwrap();
        session.end();
        apply(geometry, &update)
    }

    fn resize_by(geometry: &Geometry, handle: ResizeHandle, delta: Vec2) -> Geometry {
        let from = handle.position(geometry);
        drag(geometry, InteractionKind::Resize(handle), from, from + delta)
    }

    #[test]
    fn test_move_follows_pointer() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0).with_rotation(30.0);
        let moved = drag(&g, InteractionKind::Move, Point::new(150.0, 150.0), Point::new(-400.0, 170.0));
        assert_geometry_eq(&moved, &Geometry::new(-450.0, 120.0, 200.0, 100.0).with_rotation(30.0));
    }

    #[test]
    fn test_move_uses_canvas_units() {
        let g = Geometry::new(100.0, 100.0, 50.0, 50.0);
        let viewport = Viewport::new(Point::new(200.0, 100.0), 0.5).unwrap();
        let mut session = TransformSession::new();
        session
            .start("el".into(), &g, InteractionKind::Move, Point::new(260.0, 160.0), Some(viewport), 20.0)
            .unwrap();
        // 10 screen pixels at 50% zoom is 20 canvas units
        let update = session.update(Some(Point::new(270.0, 150.0))).unwrap();
        assert_eq!(update.patch, ElementPatch::position(120.0, 80.0));
    }

    #[test]
    fn test_bottom_right_keeps_top_left() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        let resized = resize_by(&g, ResizeHandle::BottomRight, Vec2::new(50.0, 50.0));
        assert_geometry_eq(&resized, &Geometry::new(100.0, 100.0, 250.0, 150.0));
    }

    #[test]
    fn test_top_left_keeps_bottom_right() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        let resized = resize_by(&g, ResizeHandle::TopLeft, Vec2::new(-20.0, 30.0));
        assert_geometry_eq(&resized, &Geometry::new(80.0, 130.0, 220.0, 70.0));
    }

    #[test]
    fn test_edge_handle_ignores_other_axis() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        let resized = resize_by(&g, ResizeHandle::Right, Vec2::new(40.0, 75.0));
        assert_geometry_eq(&resized, &Geometry::new(100.0, 100.0, 240.0, 100.0));

        let resized = resize_by(&g, ResizeHandle::Top, Vec2::new(-60.0, -10.0));
        assert_geometry_eq(&resized, &Geometry::new(100.0, 90.0, 200.0, 110.0));
    }

    #[test]
    fn test_rotated_right_handle_grows_width() {
        // Rotated 90° the element's local x axis points down the screen
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0).with_rotation(90.0);
        let resized = resize_by(&g, ResizeHandle::Right, Vec2::new(0.0, 30.0));
        assert!((resized.width - 230.0).abs() < 1e-6);
        assert!((resized.height - 100.0).abs() < 1e-6);
        assert!((resized.rotation - 90.0).abs() < EPS);

        // The left edge midpoint has not moved
        let before = ResizeHandle::Left.position(&g);
        let after = ResizeHandle::Left.position(&resized);
        assert!((before - after).hypot() < 1e-6);
    }

    #[test]
    fn test_rotated_pivot_stays_fixed() {
        for &handle in ResizeHandle::all() {
            let g = Geometry::new(300.0, 200.0, 160.0, 90.0).with_rotation(37.0);
            let pivot = resize_pivot(&g, handle);
            let resized = resize_by(&g, handle, Vec2::new(23.0, -17.0));
            let pivot_after = handle.opposite().position(&resized);
            assert!((pivot - pivot_after).hypot() < 1e-6, "{handle} moved its pivot");
        }
    }

    #[test]
    fn test_resize_round_trip_all_rotations() {
        let delta = Vec2::new(15.0, 10.0);
        for step in 0..24 {
            let rotation = f64::from(step) * 15.0;
            for handle in [
                ResizeHandle::TopLeft,
                ResizeHandle::TopRight,
                ResizeHandle::BottomLeft,
                ResizeHandle::BottomRight,
            ] {
                let g = Geometry::new(100.0, 100.0, 200.0, 100.0).with_rotation(rotation);
                let there = resize_by(&g, handle, delta);
                let back = resize_by(&there, handle, -delta);
                assert_geometry_eq(&back, &g);
            }
        }
    }

    #[test]
    fn test_resize_never_below_minimum() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0).with_rotation(200.0);
        for &handle in ResizeHandle::all() {
            for delta in [Vec2::new(-195.0, -95.0), Vec2::new(-200.0, -100.0), Vec2::new(3.0, -1000.0)] {
                let resized = resize_by(&g, handle, delta);
                assert!(resized.width >= MIN_ELEMENT_SIZE, "{handle}: width {}", resized.width);
                assert!(resized.height >= MIN_ELEMENT_SIZE, "{handle}: height {}", resized.height);
            }
        }
    }

    #[test]
    fn test_clamped_resize_keeps_pivot() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        let resized = resize_by(&g, ResizeHandle::BottomRight, Vec2::new(-195.0, -95.0));
        assert_geometry_eq(&resized, &Geometry::new(100.0, 100.0, 20.0, 20.0));
    }

    #[test]
    fn test_small_min_size_is_raised() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        let mut session = TransformSession::new();
        let kind = InteractionKind::Resize(ResizeHandle::BottomRight);
        session
            .start("el".into(), &g, kind, Point::new(300.0, 200.0), Some(Viewport::default()), 1.0)
            .unwrap();
        let resized = apply(&g, &session.update(Some(Point::new(102.0, 102.0))).unwrap());
        assert_geometry_eq(&resized, &Geometry::new(100.0, 100.0, MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    }

    #[test]
    fn test_handle_grabbed_off_center_does_not_jump() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        let kind = InteractionKind::Resize(ResizeHandle::BottomRight);
        let resized = drag(&g, kind, Point::new(305.0, 205.0), Point::new(355.0, 255.0));
        assert_geometry_eq(&resized, &Geometry::new(100.0, 100.0, 250.0, 150.0));
    }

    #[test]
    fn test_session_reports_kind() {
        let g = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let mut session = TransformSession::new();
        assert_eq!(session.kind(), None);
        let kind = InteractionKind::Resize(ResizeHandle::Left);
        session
            .start("el".into(), &g, kind, Point::new(0.0, 50.0), Some(Viewport::default()), MIN_ELEMENT_SIZE)
            .unwrap();
        assert_eq!(session.kind(), Some(kind));
        session.cancel();
        assert_eq!(session.kind(), None);
    }

    #[test]
    fn test_drag_past_pivot_flips_side() {
        let g = Geometry::new(100.0, 100.0, 200.0, 100.0);
        let resized = resize_by(&g, ResizeHandle::Right, Vec2::new(-300.0, 0.0));
        // Right handle now sits 100 units left of the old left edge
        assert_geometry_eq(&resized, &Geometry::new(0.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn test_rotation_convention() {
        let center = Point::new(100.0, 100.0);
        assert!(rotation_towards(center, Point::new(100.0, 0.0)).abs() < EPS);
        assert!((rotation_towards(center, Point::new(200.0, 100.0)) - 90.0).abs() < EPS);
        assert!((rotation_towards(center, Point::new(100.0, 200.0)) - 180.0).abs() < EPS);
        assert!((rotation_towards(center, Point::new(0.0, 100.0)) - 270.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_always_in_range() {
        let center = Point::new(50.0, 50.0);
        assert!((rotation_towards(center, center) - 90.0).abs() < EPS);
        for i in 0..360 {
            let a = f64::from(i).to_radians();
            let pointer = center + Vec2::new(a.cos(), a.sin()) * 80.0;
            let r = rotation_towards(center, pointer);
            assert!((0.0..360.0).contains(&r), "{r}");
        }
        let r = rotation_towards(center, Point::new(50.0 - 1e-300, 50.0 - 1e-12));
        assert!((0.0..360.0).contains(&r));
    }

    #[test]
    fn test_rotate_session_changes_only_rotation() {
        let g = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let rotated = drag(&g, InteractionKind::Rotate, Point::new(50.0, -32.0), Point::new(150.0, 50.0));
        assert_geometry_eq(&rotated, &Geometry::new(0.0, 0.0, 100.0, 100.0).with_rotation(90.0));
    }

    #[test]
    fn test_refuses_without_canvas() {
        let mut session = TransformSession::new();
        let g = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let err = session
            .start("el".into(), &g, InteractionKind::Move, Point::ZERO, None, 20.0)
            .unwrap_err();
        assert_eq!(err, TransformError::CanvasUnavailable);
        assert!(!session.is_active());
        assert!(session.update(Some(Point::new(10.0, 10.0))).is_none());
    }

    #[test]
    fn test_invalid_handle_id() {
        assert_eq!(
            InteractionKind::resize("middle"),
            Err(TransformError::InvalidHandle("middle".to_string()))
        );
        assert_eq!(
            InteractionKind::resize("bl"),
            Ok(InteractionKind::Resize(ResizeHandle::BottomLeft))
        );
    }

    #[test]
    fn test_malformed_samples_ignored() {
        let g = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let mut session = TransformSession::new();
        session
            .start("el".into(), &g, InteractionKind::Move, Point::ZERO, Some(Viewport::default()), 20.0)
            .unwrap();
        assert!(session.update(None).is_none());
        assert!(session.update(Some(Point::new(f64::NAN, 4.0))).is_none());
        assert!(session.is_active());
        assert!(session.update(Some(Point::new(5.0, 5.0))).is_some());
    }

    #[test]
    fn test_no_overlapping_sessions() {
        let g = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let mut session = TransformSession::new();
        session
            .start("a".into(), &g, InteractionKind::Rotate, Point::ZERO, Some(Viewport::default()), 20.0)
            .unwrap();
        let second = session.start("b".into(), &g, InteractionKind::Move, Point::ZERO, Some(Viewport::default()), 20.0);
        assert_eq!(second, Err(TransformError::SessionActive));
        assert_eq!(session.element_id(), Some(&ElementId::from("a")));
    }

    #[test]
    fn test_end_and_invalidate() {
        let g = Geometry::new(0.0, 0.0, 100.0, 100.0);
        let mut session = TransformSession::new();
        session
            .start("a".into(), &g, InteractionKind::Move, Point::ZERO, Some(Viewport::default()), 20.0)
            .unwrap();
        assert!(!session.invalidate(&"b".into()));
        assert!(session.invalidate(&"a".into()));
        assert!(!session.is_active());
        assert!(session.update(Some(Point::new(1.0, 1.0))).is_none());
        assert_eq!(session.end(), None);
    }
}
