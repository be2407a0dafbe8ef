//! Element store: operations over the paint-ordered element sequence.
//!
//! Every operation takes the current sequence by reference and returns the
//! next one; nothing is changed in place. The result only becomes the
//! document once it is committed through [`crate::history::History`].
//! Operations naming an unknown id return an unchanged copy.

use crate::elements::{Element, ElementId, ElementPatch};
use serde::{Deserialize, Serialize};

/// Direction for a paint-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReorderDirection {
    /// One step towards the front.
    Forward,
    /// One step towards the back.
    Backward,
    /// To the very front (last in paint order).
    ToFront,
    /// To the very back (first in paint order).
    ToBack,
}

/// Index of the element with the given id.
pub fn index_of(elements: &[Element], id: &ElementId) -> Option<usize> {
    elements.iter().position(|e| e.id() == id)
}

/// Look up an element by id.
pub fn get<'a>(elements: &'a [Element], id: &ElementId) -> Option<&'a Element> {
    elements.iter().find(|e| e.id() == id)
}

pub fn contains(elements: &[Element], id: &ElementId) -> bool {
    index_of(elements, id).is_some()
}

/// Append an element on top of the paint order.
///
/// An element whose id is already present is not added.
pub fn add(elements: &[Element], element: Element) -> Vec<Element> {
    let mut next = elements.to_vec();
    if contains(elements, element.id()) {
        log::warn!("Refusing to add duplicate element id {}", element.id());
    } else {
        next.push(element);
    }
    next
}

/// Merge a patch into the element with the given id.
pub fn update(elements: &[Element], id: &ElementId, patch: &ElementPatch) -> Vec<Element> {
    elements
        .iter()
        .map(|e| if e.id() == id { e.patched(patch) } else { e.clone() })
        .collect()
}

/// Drop the element with the given id.
pub fn remove(elements: &[Element], id: &ElementId) -> Vec<Element> {
    elements.iter().filter(|e| e.id() != id).cloned().collect()
}

/// Move an element within the paint order. Geometry is untouched.
pub fn reorder(elements: &[Element], id: &ElementId, direction: ReorderDirection) -> Vec<Element> {
    let mut next = elements.to_vec();
    let Some(pos) = index_of(elements, id) else {
        return next;
    };

    let element = next.remove(pos);
    let target = match direction {
        // next is one shorter now, so min() keeps the last element in place
        ReorderDirection::Forward => (pos + 1).min(next.len()),
        ReorderDirection::Backward => pos.saturating_sub(1),
        ReorderDirection::ToFront => next.len(),
        ReorderDirection::ToBack => 0,
    };
    next.insert(target, element);
    next
}
