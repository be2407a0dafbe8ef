//! Editor configuration.

use crate::document::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::elements::MIN_ELEMENT_SIZE;
use crate::handles::{HANDLE_HIT_RADIUS, ROTATE_HANDLE_OFFSET};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the editor. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Smallest width or height a resize may produce. Never below
    /// [`MIN_ELEMENT_SIZE`].
    pub min_element_size: f64,
    /// Maximum number of history snapshots kept. `None` keeps everything.
    pub history_limit: Option<usize>,
    pub handle_hit_radius: f64,
    /// Distance of the rotate handle above the top edge.
    pub rotate_handle_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            min_element_size: MIN_ELEMENT_SIZE,
            history_limit: None,
            handle_hit_radius: HANDLE_HIT_RADIUS,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.min_element_size.is_finite() || self.min_element_size < MIN_ELEMENT_SIZE {
            return Err(ConfigError::Invalid(format!(
                "min_element_size must be at least {MIN_ELEMENT_SIZE}, got {}",
                self.min_element_size
            )));
        }
        for (name, value) in [
            ("handle_hit_radius", self.handle_hit_radius),
            ("rotate_handle_offset", self.rotate_handle_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")));
            }
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid("history_limit must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(EditorConfig::from_json_str("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = EditorConfig::from_json_str(r#"{"history_limit": 50, "min_element_size": 32}"#).unwrap();
        assert_eq!(config.history_limit, Some(50));
        assert!((config.min_element_size - 32.0).abs() < f64::EPSILON);
        assert!((config.canvas_width - 1123.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EditorConfig::from_json_str(r#"{"canvas_width": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json_str(r#"{"history_limit": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(EditorConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_min_element_size_has_a_floor() {
        for json in [r#"{"min_element_size": 1}"#, r#"{"min_element_size": 19.5}"#, r#"{"min_element_size": -20}"#] {
            assert!(matches!(EditorConfig::from_json_str(json), Err(ConfigError::Invalid(_))), "{json}");
        }
        assert!(EditorConfig::from_json_str(r#"{"min_element_size": 20}"#).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        fs::write(&path, r#"{"rotate_handle_offset": 40}"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert!((config.rotate_handle_offset - 40.0).abs() < f64::EPSILON);
        assert!(matches!(EditorConfig::load(dir.path().join("nope.json")), Err(ConfigError::Io(_))));
    }
}
