//! Scene configuration.
//!
//! All fields have defaults so an empty JSON object (or no file at all) gives
//! the stock desk scene. Loaded configs are validated before use.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    data_structures::texture_registry::MAX_TEXTURE_UNITS,
    error::{SceneError, SceneResult},
};

/// What registries do when a tag is registered a second time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTagPolicy {
    /// Refuse the second registration with a `Duplicate*` error.
    #[default]
    Reject,
    /// Append it anyway. Lookups keep resolving to the first entry.
    Shadow,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory the scene's texture files are resolved against.
    pub asset_dir: PathBuf,
    /// Maximum number of textures, at most [`MAX_TEXTURE_UNITS`].
    pub texture_capacity: usize,
    pub duplicate_tags: DuplicateTagPolicy,
    /// Flip images vertically on decode so row 0 is the bottom of the texture.
    pub flip_vertically: bool,
    pub window_title: String,
    pub clear_colour: [f64; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("textures"),
            texture_capacity: MAX_TEXTURE_UNITS,
            duplicate_tags: DuplicateTagPolicy::default(),
            flip_vertically: true,
            window_title: String::from("Desk Scene"),
            clear_colour: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl SceneConfig {
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> SceneResult<Self> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SceneResult<()> {
        if self.texture_capacity == 0 || self.texture_capacity > MAX_TEXTURE_UNITS {
            return Err(SceneError::Config(format!(
                "texture_capacity must be between 1 and {MAX_TEXTURE_UNITS}, got {}",
                self.texture_capacity
            )));
        }
        Ok(())
    }

    pub fn texture_path(&self, file_name: &str) -> PathBuf {
        self.asset_dir.join(file_name)
    }

    pub fn wgpu_clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = SceneConfig::from_json("{}").expect("empty config should parse");
        assert_eq!(config.texture_capacity, 16);
        assert_eq!(config.duplicate_tags, DuplicateTagPolicy::Reject);
        assert!(config.flip_vertically);
        assert_eq!(config.texture_path("wood.jpg"), PathBuf::from("textures/wood.jpg"));
    }

    #[test]
    fn parses_policy_and_capacity() {
        let config = SceneConfig::from_json(
            r#"{ "texture_capacity": 4, "duplicate_tags": "shadow", "asset_dir": "assets" }"#,
        )
        .expect("config should parse");
        assert_eq!(config.texture_capacity, 4);
        assert_eq!(config.duplicate_tags, DuplicateTagPolicy::Shadow);
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
    }

    #[test]
    fn rejects_capacity_above_unit_count() {
        let err = SceneConfig::from_json(r#"{ "texture_capacity": 17 }"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)), "{err}");
        let err = SceneConfig::from_json(r#"{ "texture_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, SceneError::Config(_)), "{err}");
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let err = SceneConfig::from_json("{ texture_capacity: ").unwrap_err();
        assert!(matches!(err, SceneError::ConfigFormat(_)));
    }
}
