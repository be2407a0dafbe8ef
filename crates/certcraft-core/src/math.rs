//! Vector math helpers shared by the transform engine.

use kurbo::{Point, Vec2};

/// Rotate a vector about the origin by `angle` radians.
///
/// With the canvas y axis pointing down, a positive angle turns the vector
/// clockwise on screen.
pub fn rotate_vector(v: Vec2, angle: f64) -> Vec2 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec2::new(v.x * cos_a - v.y * sin_a, v.x * sin_a + v.y * cos_a)
}

/// Convert a pointer position in screen pixels to canvas-local units.
///
/// `origin` is the canvas' top-left corner in screen space and `scale` the
/// display scale the canvas is drawn at (1.0 = 100%).
pub fn screen_to_canvas(point: Point, origin: Point, scale: f64) -> Point {
    Point::new((point.x - origin.x) / scale, (point.y - origin.y) / scale)
}

/// Inverse of [`screen_to_canvas`].
pub fn canvas_to_screen(point: Point, origin: Point, scale: f64) -> Point {
    Point::new(point.x * scale + origin.x, point.y * scale + origin.y)
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Whether both coordinates of a point are finite.
pub fn is_finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}
