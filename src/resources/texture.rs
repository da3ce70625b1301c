use std::collections::{BTreeMap, HashMap};

use crate::{
    data_structures::{
        texture::{Texture, check_upload_size},
        texture_registry::{MAX_TEXTURE_UNITS, TextureBackend, TextureHandle},
    },
    error::{SceneError, SceneResult},
    resources::DecodedImage,
};

/// Layout of the per-draw texture group: one filterable 2D texture and its sampler.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Scene texture_bind_group_layout"),
    })
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(texture.sampler.as_ref().unwrap_or(sampler)),
            },
        ],
        label: Some(label),
    })
}

/// Texture backend on top of wgpu.
///
/// wgpu has no global texture units, so a unit is modelled as a bind group
/// slot: binding a texture to unit `i` builds the bind group that draws
/// sampling unit `i` will use.
pub struct WgpuTextures {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<TextureHandle, Texture>,
    units: Vec<Option<(TextureHandle, wgpu::BindGroup)>>,
    fallback: wgpu::BindGroup,
    next_id: u32,
}

impl WgpuTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = texture_layout(device);
        let sampler = crate::data_structures::texture::create_repeat_sampler(device);
        let white = Texture::create_solid(device, queue, [255, 255, 255, 255], "white fallback");
        let fallback = texture_bind_group(device, &layout, &white, &sampler, "fallback texture group");
        Self {
            // Device and Queue are internally reference counted, cloning only clones the handle
            device: device.clone(),
            queue: queue.clone(),
            layout,
            sampler,
            textures: HashMap::new(),
            units: (0..MAX_TEXTURE_UNITS).map(|_| None).collect(),
            fallback,
            next_id: 1,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// The bind group for `unit`, or the white fallback when nothing is bound there.
    pub fn unit_group(&self, unit: u32) -> &wgpu::BindGroup {
        match self.units.get(unit as usize) {
            Some(Some((_, group))) => group,
            _ => &self.fallback,
        }
    }

    pub fn fallback_group(&self) -> &wgpu::BindGroup {
        &self.fallback
    }
}

impl TextureBackend for WgpuTextures {
    fn upload(&mut self, image: &DecodedImage, label: &str) -> SceneResult<TextureHandle> {
        let texture = Texture::from_decoded(&self.device, &self.queue, image, label).map_err(|e| {
            SceneError::Upload {
                label: label.to_string(),
                reason: e.to_string(),
            }
        })?;
        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn bind_to_unit(&mut self, unit: u32, handle: TextureHandle) {
        let Some(texture) = self.textures.get(&handle) else {
            log::warn!("Texture {handle} is not resident, unit {unit} left unchanged");
            return;
        };
        let Some(slot) = self.units.get_mut(unit as usize) else {
            log::warn!("Texture unit {unit} is out of range ({MAX_TEXTURE_UNITS} units)");
            return;
        };
        let group = texture_bind_group(
            &self.device,
            &self.layout,
            texture,
            &self.sampler,
            &format!("texture unit {unit}"),
        );
        *slot = Some((handle, group));
    }

    fn release(&mut self, handle: TextureHandle) {
        for slot in self.units.iter_mut() {
            if matches!(slot, Some((bound, _)) if *bound == handle) {
                *slot = None;
            }
        }
        if let Some(texture) = self.textures.remove(&handle) {
            texture.texture.destroy();
        }
    }
}

/// Texture backend without a GPU.
///
/// Hands out handles and tracks unit bindings, which is all the registry
/// needs. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct HeadlessTextures {
    live: BTreeMap<TextureHandle, (u32, u32)>,
    units: BTreeMap<u32, TextureHandle>,
    next_id: u32,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn bound(&self, unit: u32) -> Option<TextureHandle> {
        self.units.get(&unit).copied()
    }

    /// Number of uploaded textures that have not been released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn dimensions(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.live.get(&handle).copied()
    }
}

impl TextureBackend for HeadlessTextures {
    fn upload(&mut self, image: &DecodedImage, label: &str) -> SceneResult<TextureHandle> {
        // same limit a default wgpu device reports
        let max_dimension = wgpu::Limits::default().max_texture_dimension_2d;
        check_upload_size(image.width, image.height, max_dimension).map_err(|e| SceneError::Upload {
            label: label.to_string(),
            reason: e.to_string(),
        })?;
        let handle = TextureHandle(self.next_id.max(1));
        self.next_id = handle.0 + 1;
        self.live.insert(handle, (image.width, image.height));
        Ok(handle)
    }

    fn bind_to_unit(&mut self, unit: u32, handle: TextureHandle) {
        self.units.insert(unit, handle);
    }

    fn release(&mut self, handle: TextureHandle) {
        self.live.remove(&handle);
        self.units.retain(|_, bound| *bound != handle);
    }
}
