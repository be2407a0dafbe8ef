//! Click routing: which element is under the pointer.

use crate::elements::{Element, ElementId};
use crate::handles::{HandleKind, hit_test_handles};
use crate::store;
use kurbo::Point;

/// The top-most element whose (rotated) box contains `point`.
pub fn element_at(elements: &[Element], point: Point, tolerance: f64) -> Option<&ElementId> {
    elements
        .iter()
        .rev()
        .find(|e| e.geometry().contains(point, tolerance))
        .map(|e| e.id())
}

/// Handle of the selected element under `point`, if any.
pub fn handle_at(
    elements: &[Element],
    selected: &ElementId,
    point: Point,
    radius: f64,
    rotate_offset: f64,
) -> Option<HandleKind> {
    let element = store::get(elements, selected)?;
    hit_test_handles(element.geometry(), point, radius, rotate_offset)
}
