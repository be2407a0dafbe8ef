//! Recorded gesture scripts.
//!
//! A script is a JSON array of steps, each tagged by `op`:
//!
//! ```json
//! [
//!   {"op": "down", "x": 150, "y": 150},
//!   {"op": "move", "x": 200, "y": 150},
//!   {"op": "up"},
//!   {"op": "undo"}
//! ]
//! ```

use crate::AppResult;
use certcraft_core::{ElementId, ElementKind, ElementPatch, InteractionKind, ReorderDirection, TransformError};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Gesture kind as written in scripts; resize takes its handle separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Move,
    Resize,
    Rotate,
}

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    /// Pointer press at a screen position, routed by hit testing.
    Down { x: f64, y: f64 },
    /// Explicit gesture start on an element.
    Begin {
        id: ElementId,
        kind: GestureKind,
        #[serde(default)]
        handle: Option<String>,
        x: f64,
        y: f64,
    },
    /// Pointer sample. Missing coordinates model a malformed event.
    Move {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    Up,
    Cancel,
    Undo,
    Redo,
    Add { kind: ElementKind },
    Delete { id: ElementId },
    Reorder { id: ElementId, direction: ReorderDirection },
    Update { id: ElementId, patch: ElementPatch },
}

impl Step {
    /// Screen position of a move sample, if it carried both coordinates.
    pub fn move_position(x: Option<f64>, y: Option<f64>) -> Option<Point> {
        Some(Point::new(x?, y?))
    }

    /// Interaction for a `begin` step.
    pub fn interaction(kind: GestureKind, handle: Option<&str>) -> Result<InteractionKind, TransformError> {
        match kind {
            GestureKind::Move => Ok(InteractionKind::Move),
            GestureKind::Rotate => Ok(InteractionKind::Rotate),
            GestureKind::Resize => InteractionKind::resize(handle.unwrap_or_default()),
        }
    }
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
