//! Text element.

use super::{ElementId, ElementPatch, ElementTrait, Geometry};
use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Font faces offered by the editor.
pub const FONT_FACES: &[&str] = &[
    "Roboto",
    "Merriweather",
    "Montserrat",
    "Playfair Display",
    "Open Sans",
    "Lato",
];

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Text decoration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

/// Horizontal alignment of the text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

impl TextAlign {
    /// Get all alignments, in toolbar order.
    pub fn all() -> &'static [TextAlign] {
        &[TextAlign::Left, TextAlign::Center, TextAlign::Right, TextAlign::Justify]
    }
}

fn default_font_family() -> String {
    FONT_FACES[0].to_string()
}

fn default_font_size() -> f64 {
    TextElement::DEFAULT_FONT_SIZE
}

fn default_line_height() -> f64 {
    TextElement::DEFAULT_LINE_HEIGHT
}

/// A block of styled text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    /// Generated when missing from imported JSON.
    #[serde(default)]
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_decoration: TextDecoration,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Extra spacing between glyphs in pixels; may be negative.
    #[serde(default)]
    pub letter_spacing: f64,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

impl TextElement {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

    /// Create a text element with default styling.
    pub fn new(geometry: Geometry, content: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            geometry,
            content: content.into(),
            font_family: default_font_family(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            text_decoration: TextDecoration::default(),
            color: Color::black(),
            text_align: TextAlign::default(),
            letter_spacing: 0.0,
            line_height: Self::DEFAULT_LINE_HEIGHT,
        }
    }

    /// Patch flipping between normal and bold.
    pub fn toggle_bold(&self) -> ElementPatch {
        let weight = match self.font_weight {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        };
        ElementPatch { font_weight: Some(weight), ..Default::default() }
    }

    /// Patch flipping between normal and italic.
    pub fn toggle_italic(&self) -> ElementPatch {
        let style = match self.font_style {
            FontStyle::Normal => FontStyle::Italic,
            FontStyle::Italic => FontStyle::Normal,
        };
        ElementPatch { font_style: Some(style), ..Default::default() }
    }

    /// Patch flipping the underline on or off.
    pub fn toggle_underline(&self) -> ElementPatch {
        let decoration = match self.text_decoration {
            TextDecoration::None => TextDecoration::Underline,
            TextDecoration::Underline => TextDecoration::None,
        };
        ElementPatch { text_decoration: Some(decoration), ..Default::default() }
    }
}

impl Default for TextElement {
    fn default() -> Self {
        Self::new(Geometry::new(100.0, 100.0, 250.0, 50.0), "New Text")
    }
}

impl ElementTrait for TextElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    fn apply_fields(&mut self, patch: &ElementPatch) -> bool {
        let before = self.clone();
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(family) = &patch.font_family {
            self.font_family.clone_from(family);
        }
        if let Some(size) = patch.font_size.filter(|v| v.is_finite() && *v > 0.0) {
            self.font_size = size;
        }
        if let Some(weight) = patch.font_weight {
            self.font_weight = weight;
        }
        if let Some(style) = patch.font_style {
            self.font_style = style;
        }
        if let Some(decoration) = patch.text_decoration {
            self.text_decoration = decoration;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(align) = patch.text_align {
            self.text_align = align;
        }
        if let Some(spacing) = patch.letter_spacing.filter(|v| v.is_finite()) {
            self.letter_spacing = spacing;
        }
        if let Some(line_height) = patch.line_height.filter(|v| v.is_finite() && *v > 0.0) {
            self.line_height = line_height;
        }
        *self != before
    }
}
