//! Image element.

use super::{ElementId, ElementPatch, ElementTrait, Geometry};
use serde::{Deserialize, Serialize};

/// An image placed on the certificate.
///
/// `src` is whatever the renderer understands: a URL, a `data:` URI, or a
/// template placeholder such as `placeholder:seal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    /// Generated when missing from imported JSON.
    #[serde(default)]
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default)]
    pub src: String,
}

impl ImageElement {
    /// Placeholder picture used for freshly added images.
    pub const PLACEHOLDER_SRC: &'static str = "https://picsum.photos/200";

    pub fn new(geometry: Geometry, src: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            geometry,
            src: src.into(),
        }
    }

    /// Whether the source is embedded data rather than a reference.
    pub fn is_embedded(&self) -> bool {
        self.src.starts_with("data:")
    }
}

impl Default for ImageElement {
    fn default() -> Self {
        Self::new(Geometry::new(150.0, 150.0, 200.0, 200.0), Self::PLACEHOLDER_SRC)
    }
}

impl ElementTrait for ImageElement {
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
        match &patch.src {
            Some(src) if *src != self.src => {
                self.src.clone_from(src);
                true
            }
            _ => false,
        }
    }
}
