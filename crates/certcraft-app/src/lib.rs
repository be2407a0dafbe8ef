//! CertCraft Application
//!
//! Headless shell around the editing core. It plays the part of the UI:
//! loads a document, feeds recorded pointer gestures and edits through the
//! editor, and writes the result.

mod replay;
mod script;

pub use replay::{ReplayReport, replay, summarize};
pub use script::{GestureKind, Script, Step};

use certcraft_core::{ConfigError, DocumentError, TransformError};
use thiserror::Error;

/// Errors surfaced by the command line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("invalid gesture script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
