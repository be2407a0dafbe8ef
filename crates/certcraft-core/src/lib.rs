//! CertCraft Core Library
//!
//! Platform-agnostic editing core for the CertCraft certificate designer:
//! element model, rotation-aware transform sessions and snapshot undo/redo.

pub mod color;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod handles;
pub mod hit;
pub mod history;
pub mod input;
pub mod math;
pub mod store;
pub mod transform;
pub mod viewport;

pub use color::Color;
pub use config::{ConfigError, EditorConfig};
pub use document::{BorderStyle, Document, DocumentError, DocumentSettings, Template};
pub use editor::Editor;
pub use elements::{Element, ElementId, ElementKind, ElementPatch, Geometry};
pub use handles::{Handle, HandleKind, ResizeHandle};
pub use history::{History, Snapshot};
pub use input::{MouseButton, PointerEvent};
pub use store::ReorderDirection;
pub use transform::{GeometryUpdate, InteractionKind, TransformError, TransformSession};
pub use viewport::Viewport;
