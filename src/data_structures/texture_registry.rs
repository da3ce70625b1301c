//! Tagged textures and their texture-unit slots.
//!
//! The registry owns the list of loaded textures. Slots are positional: the
//! i-th registered texture is bound to texture unit i by [`TextureRegistry::bind_all`],
//! and [`TextureRegistry::find_slot_by_tag`] simply returns that position.

use std::{collections::HashMap, fmt, path::Path};

use crate::{
    config::DuplicateTagPolicy,
    error::{SceneError, SceneResult},
    resources::{self, DecodedImage},
};

/// Number of texture units the scene shader can address.
pub const MAX_TEXTURE_UNITS: usize = 16;

/// Opaque identifier of a texture owned by a [`TextureBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The GPU side of texture management.
///
/// `upload` allocates the texture, configures repeat wrapping with linear
/// filtering and fills the whole mip chain.
pub trait TextureBackend {
    fn upload(&mut self, image: &DecodedImage, label: &str) -> SceneResult<TextureHandle>;
    fn bind_to_unit(&mut self, unit: u32, handle: TextureHandle);
    fn release(&mut self, handle: TextureHandle);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureEntry {
    pub tag: String,
    pub handle: TextureHandle,
}

#[derive(Debug)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
    // first index registered under each tag
    index: HashMap<String, usize>,
    capacity: usize,
    policy: DuplicateTagPolicy,
    flip_vertically: bool,
}

impl TextureRegistry {
    pub fn new(capacity: usize, policy: DuplicateTagPolicy, flip_vertically: bool) -> Self {
        let capacity = capacity.min(MAX_TEXTURE_UNITS);
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::new(),
            capacity,
            policy,
            flip_vertically,
        }
    }

    /// Decode the image at `path`, upload it and register it under `tag`.
    pub fn register<B: TextureBackend + ?Sized>(
        &mut self,
        path: impl AsRef<Path>,
        tag: &str,
        backend: &mut B,
    ) -> SceneResult<TextureHandle> {
        let path = path.as_ref();
        self.check_can_register(tag)?;
        let image = resources::decode_image(path, self.flip_vertically).inspect_err(|e| {
            log::error!("Could not load image: {e}");
        })?;
        log::info!(
            "Successfully loaded image: {}, width: {}, height: {}, channels: {}",
            path.display(),
            image.width,
            image.height,
            image.channels
        );
        self.push(image, tag, backend)
    }

    /// Register an image that was decoded elsewhere.
    pub fn register_image<B: TextureBackend + ?Sized>(
        &mut self,
        image: DecodedImage,
        tag: &str,
        backend: &mut B,
    ) -> SceneResult<TextureHandle> {
        self.check_can_register(tag)?;
        self.push(image, tag, backend)
    }

    fn check_can_register(&self, tag: &str) -> SceneResult<()> {
        if self.entries.len() >= self.capacity {
            log::error!(
                "Texture registry is full ({} slots), `{tag}` was not registered",
                self.capacity
            );
            return Err(SceneError::RegistryFull {
                capacity: self.capacity,
                tag: tag.to_string(),
            });
        }
        if self.index.contains_key(tag) {
            match self.policy {
                DuplicateTagPolicy::Reject => {
                    log::error!("Texture tag `{tag}` is already registered");
                    return Err(SceneError::DuplicateTexture(tag.to_string()));
                }
                DuplicateTagPolicy::Shadow => {
                    log::warn!("Texture tag `{tag}` registered twice, lookups return the first one");
                }
            }
        }
        Ok(())
    }

    fn push<B: TextureBackend + ?Sized>(
        &mut self,
        image: DecodedImage,
        tag: &str,
        backend: &mut B,
    ) -> SceneResult<TextureHandle> {
        if !matches!(image.channels, 3 | 4) {
            log::error!("Not implemented to handle image with {} channels", image.channels);
            return Err(SceneError::UnsupportedChannels {
                path: image.source.clone(),
                channels: image.channels,
            });
        }
        let handle = backend.upload(&image, tag)?;
        self.index.entry(tag.to_string()).or_insert(self.entries.len());
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
        });
        Ok(handle)
    }

    /// Bind every registered texture to the unit matching its position.
    pub fn bind_all<B: TextureBackend + ?Sized>(&self, backend: &mut B) {
        for (unit, entry) in self.entries.iter().enumerate() {
            backend.bind_to_unit(unit as u32, entry.handle);
        }
    }

    pub fn find_id_by_tag(&self, tag: &str) -> Option<TextureHandle> {
        self.index.get(tag).map(|&i| self.entries[i].handle)
    }

    pub fn find_slot_by_tag(&self, tag: &str) -> Option<u32> {
        self.index.get(tag).map(|&i| i as u32)
    }

    /// Release every texture and start over with an empty registry.
    pub fn release_all<B: TextureBackend + ?Sized>(&mut self, backend: &mut B) {
        for entry in self.entries.drain(..) {
            backend.release(entry.handle);
        }
        self.index.clear();
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
