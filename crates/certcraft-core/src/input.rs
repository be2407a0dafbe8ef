//! Pointer events as delivered by the surrounding UI.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in screen pixels. A move sample may arrive without
/// coordinates (some platforms emit those while the pointer leaves the
/// window); it is passed through as `None` and ignored downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        #[serde(default)]
        position: Option<Point>,
    },
    Up,
    /// Gesture aborted, e.g. the pointer left the document.
    Cancel,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::Move {
            position: Some(Point::new(x, y)),
        }
    }

    /// Screen position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Down { position, .. } => Some(*position),
            Self::Move { position } => *position,
            Self::Up | Self::Cancel => None,
        }
    }
}
