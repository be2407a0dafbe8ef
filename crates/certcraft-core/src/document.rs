//! Certificate document: canvas settings plus the element sequence.

use crate::color::Color;
use crate::elements::{Element, ElementId};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default canvas width (A4 landscape at 96 dpi).
pub const DEFAULT_CANVAS_WIDTH: f64 = 1123.0;
/// Default canvas height (A4 landscape at 96 dpi).
pub const DEFAULT_CANVAS_HEIGHT: f64 = 794.0;

/// Document loading and saving errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate element id {0}")]
    DuplicateId(ElementId),
    #[error("element {0} has a non-positive or non-finite size or position")]
    InvalidGeometry(ElementId),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Decorative frame drawn around the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Classic,
    Double,
    Minimal,
    None,
}

/// Canvas-wide settings. Not part of undo history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentSettings {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub background_color: Color,
    pub border_color: Color,
    pub border_style: BorderStyle,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            background_color: Color::white(),
            border_color: Color::silver(),
            border_style: BorderStyle::Classic,
        }
    }
}

impl DocumentSettings {
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }
}

/// A saved certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(flatten)]
    pub settings: DocumentSettings,
    /// Paint order, back to front.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Document {
    /// Empty document with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.settings.canvas_width = width;
        self.settings.canvas_height = height;
        self
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document, rejecting duplicate ids and degenerate boxes.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        validate_elements(&document.elements)?;
        Ok(document)
    }

    pub fn load(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading document from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        log::debug!("Saving document to {}", path.display());
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Template as produced by external generators.
///
/// Settings left out of the template keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Template {
    /// Parse a template, rejecting duplicate ids and degenerate boxes.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let template: Self = serde_json::from_str(json)?;
        validate_elements(&template.elements)?;
        Ok(template)
    }

    /// Overwrite the settings this template specifies.
    pub fn apply_settings(&self, settings: &mut DocumentSettings) {
        if let Some(color) = self.background_color {
            settings.background_color = color;
        }
        if let Some(color) = self.border_color {
            settings.border_color = color;
        }
        if let Some(style) = self.border_style {
            settings.border_style = style;
        }
    }
}

/// Fail on the first id that appears twice or the first box without a
/// positive width and height.
pub fn validate_elements(elements: &[Element]) -> DocumentResult<()> {
    let mut seen = HashSet::with_capacity(elements.len());
    for element in elements {
        if !seen.insert(element.id()) {
            return Err(DocumentError::DuplicateId(element.id().clone()));
        }
        if !element.geometry().is_valid() {
            log::warn!("Rejecting element {}: {:?}", element.id(), element.geometry());
            return Err(DocumentError::InvalidGeometry(element.id().clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let document = Document::new();
        assert_eq!(document.settings.canvas_size(), Size::new(1123.0, 794.0));
        assert_eq!(document.settings.background_color, Color::white());
        assert_eq!(document.settings.border_color.to_hex(), "#c0c0c0");
        assert_eq!(document.settings.border_style, BorderStyle::Classic);
        assert!(document.elements.is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut document = Document::new().with_canvas_size(800.0, 600.0);
        document.settings.border_style = BorderStyle::Double;
        document.elements.push(Element::new_text().with_id("title"));
        document.elements.push(Element::new_line().with_id("rule"));

        let json = document.to_json().unwrap();
        assert!(json.contains("\"borderStyle\": \"double\""));
        assert!(json.contains("\"canvasWidth\": 800.0"));
        assert_eq!(Document::from_json(&json).unwrap(), document);
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let document = Document::from_json(r#"{"elements": []}"#).unwrap();
        assert_eq!(document.settings, DocumentSettings::default());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{
            "elements": [
                {"type": "image", "id": "a", "x": 0, "y": 0, "width": 50, "height": 50, "src": "logo.png"},
                {"type": "shape", "id": "a", "x": 0, "y": 90, "width": 200, "height": 20}
            ]
        }"#;
        assert!(matches!(
            Document::from_json(json),
            Err(DocumentError::DuplicateId(id)) if id.as_str() == "a"
        ));
        assert!(matches!(Template::from_json(json), Err(DocumentError::DuplicateId(_))));
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        for size in [r#""width": -50, "height": 0"#, r#""width": 120, "height": 0"#, r#""width": -1, "height": 30"#] {
            let json = format!(
                r#"{{"elements": [{{"type": "text", "id": "bad", "x": 10, "y": 10, {size}, "content": "x"}}]}}"#
            );
            assert!(
                matches!(Document::from_json(&json), Err(DocumentError::InvalidGeometry(id)) if id.as_str() == "bad"),
                "{size}"
            );
            assert!(matches!(Template::from_json(&json), Err(DocumentError::InvalidGeometry(_))), "{size}");
        }
    }

    #[test]
    fn test_template_keeps_unspecified_settings() {
        let template = Template::from_json(
            r##"{"borderStyle": "minimal", "backgroundColor": "#fffbea", "elements": []}"##,
        )
        .unwrap();
        let mut settings = DocumentSettings {
            border_color: Color::rgb(10, 20, 30),
            ..Default::default()
        };
        template.apply_settings(&mut settings);
        assert_eq!(settings.border_style, BorderStyle::Minimal);
        assert_eq!(settings.background_color, Color::rgb(0xff, 0xfb, 0xea));
        assert_eq!(settings.border_color, Color::rgb(10, 20, 30));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert.json");
        let mut document = Document::new();
        document.elements.push(Element::new_image().with_id("seal"));
        document.save(&path).unwrap();
        assert_eq!(Document::load(&path).unwrap(), document);
        assert!(matches!(Document::load(dir.path().join("missing.json")), Err(DocumentError::Io(_))));
    }
}
