//! Error type shared by scene preparation and per-draw state binding.
//!
//! Every failure in the core is local and non-fatal: the scene manager
//! collects these values into its prepare/render reports and keeps going.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("could not read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} has {channels} channel(s), only RGB and RGBA images are supported")]
    UnsupportedChannels { path: PathBuf, channels: u8 },

    #[error("could not upload texture `{label}`: {reason}")]
    Upload { label: String, reason: String },

    #[error("texture registry is full ({capacity} slots), cannot register `{tag}`")]
    RegistryFull { capacity: usize, tag: String },

    #[error("texture tag `{0}` is already registered")]
    DuplicateTexture(String),

    #[error("material tag `{0}` is already defined")]
    DuplicateMaterial(String),

    #[error("no texture registered under `{0}`")]
    UnknownTexture(String),

    #[error("no material defined under `{0}`")]
    UnknownMaterial(String),

    #[error("invalid scene config: {0}")]
    Config(String),

    #[error("could not parse scene config: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

impl SceneError {
    /// True for the lookup failures the binder reports during rendering.
    pub fn is_unknown_tag(&self) -> bool {
        matches!(self, SceneError::UnknownTexture(_) | SceneError::UnknownMaterial(_))
    }
}

pub type SceneResult<T> = Result<T, SceneError>;
