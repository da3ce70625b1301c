use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{SceneError, SceneResult};

/**
 * This module contains all logic for loading images and primitive meshes and
 * turning them into GPU resources.
 */
pub mod mesh;
pub mod texture;

pub fn load_binary(path: &Path) -> SceneResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Raw pixels of a decoded image in its native channel layout.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Row-major, `channels` bytes per pixel.
    pub pixels: Vec<u8>,
    /// Where the image came from, used in diagnostics.
    pub source: PathBuf,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
            source: PathBuf::from("<memory>"),
        }
    }

    /// Expand to RGBA8 for upload. `None` for anything other than RGB/RGBA
    /// or a buffer that doesn't match the dimensions.
    pub fn to_rgba8(&self) -> Option<image::RgbaImage> {
        match self.channels {
            3 => image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(|rgb| DynamicImage::ImageRgb8(rgb).to_rgba8()),
            4 => image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone()),
            _ => None,
        }
    }
}

/// Read and decode an image file, keeping 3- and 4-channel images only.
///
/// With `flip_vertically` the rows are reversed so the first row in memory is
/// the bottom of the picture, matching texture coordinates with v pointing up.
pub fn decode_image(path: &Path, flip_vertically: bool) -> SceneResult<DecodedImage> {
    let bytes = load_binary(path)?;
    let img = image::load_from_memory(&bytes).map_err(|source| SceneError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let img = if flip_vertically { img.flipv() } else { img };

    let (width, height) = (img.width(), img.height());
    let channels = img.color().channel_count();
    let pixels = match channels {
        3 => img.into_rgb8().into_raw(),
        4 => img.into_rgba8().into_raw(),
        _ => {
            return Err(SceneError::UnsupportedChannels {
                path: path.to_path_buf(),
                channels,
            });
        }
    };

    Ok(DecodedImage {
        width,
        height,
        channels,
        pixels,
        source: path.to_path_buf(),
    })
}
