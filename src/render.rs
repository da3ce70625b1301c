//! Turning scene draws into GPU work.
//!
//! The scene core issues uniform writes and `draw_mesh` calls one at a time,
//! the way an immediate-mode API would. wgpu wants all of a frame's data in
//! buffers before the render pass is recorded, so [`FrameRecorder`] snapshots
//! the per-draw uniforms on every `draw_mesh`, uploads them into one
//! dynamic-offset uniform buffer and replays the draws inside the pass.
//!
//! [`DrawLog`] records the same snapshots without a GPU.

use cgmath::Matrix4;

use crate::{
    pipelines::scene::{ObjectUniform, SceneUniforms},
    resources::{
        mesh::{MeshProvider, ShapeKind, ShapeMeshes},
        texture::WgpuTextures,
    },
    shader::{UniformLog, UniformSink, UniformValue},
};

/// A draw call together with the object uniforms in effect when it was issued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedDraw {
    pub shape: ShapeKind,
    pub object: ObjectUniform,
}

impl RecordedDraw {
    pub fn model(&self) -> Matrix4<f32> {
        self.object.model_matrix()
    }
}

fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

const INITIAL_DRAW_CAPACITY: usize = 128;

pub struct FrameRecorder {
    device: wgpu::Device,
    uniforms: SceneUniforms,
    meshes: ShapeMeshes,
    draws: Vec<RecordedDraw>,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
}

impl FrameRecorder {
    pub fn new(device: &wgpu::Device, object_layout: &wgpu::BindGroupLayout) -> Self {
        let stride = align_to(
            std::mem::size_of::<ObjectUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (object_buffer, object_group) =
            Self::mk_object_buffer(device, object_layout, stride, INITIAL_DRAW_CAPACITY);
        Self {
            device: device.clone(),
            uniforms: SceneUniforms::new(),
            meshes: ShapeMeshes::default(),
            draws: Vec::with_capacity(INITIAL_DRAW_CAPACITY),
            object_layout: object_layout.clone(),
            object_buffer,
            object_group,
            stride,
            capacity: INITIAL_DRAW_CAPACITY,
        }
    }

    fn mk_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
            label: Some("object_bind_group"),
        });
        (buffer, group)
    }

    /// Forget last frame's draws. Uniform state carries over.
    pub fn begin_frame(&mut self) {
        self.draws.clear();
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn uniforms(&self) -> &SceneUniforms {
        &self.uniforms
    }

    /// Copy this frame's object uniforms (and the lights, if they changed) to the GPU.
    pub fn upload(&mut self, queue: &wgpu::Queue, lights_buffer: &wgpu::Buffer) {
        if self.uniforms.take_lights_dirty() {
            queue.write_buffer(lights_buffer, 0, bytemuck::bytes_of(&self.uniforms.lights));
        }
        if self.draws.is_empty() {
            return;
        }
        if self.draws.len() > self.capacity {
            self.capacity = self.draws.len().next_power_of_two();
            log::debug!("Growing object uniform buffer to {} draws", self.capacity);
            let (buffer, group) =
                Self::mk_object_buffer(&self.device, &self.object_layout, self.stride, self.capacity);
            self.object_buffer = buffer;
            self.object_group = group;
        }

        let stride = self.stride as usize;
        let mut bytes = vec![0u8; stride * self.draws.len()];
        for (chunk, draw) in bytes.chunks_exact_mut(stride).zip(&self.draws) {
            let object = bytemuck::bytes_of(&draw.object);
            chunk[..object.len()].copy_from_slice(object);
        }
        queue.write_buffer(&self.object_buffer, 0, &bytes);
    }

    /// Record every draw of the frame. The scene pipeline and group 0 must already be set.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, textures: &WgpuTextures) {
        for (i, draw) in self.draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(draw.shape) else {
                continue;
            };
            let offset = (i as u64 * self.stride) as wgpu::DynamicOffset;
            let texture_group = if draw.object.use_texture != 0 {
                textures.unit_group(draw.object.texture_slot)
            } else {
                textures.fallback_group()
            };
            pass.set_bind_group(1, &self.object_group, &[offset]);
            pass.set_bind_group(2, texture_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
        }
    }
}

impl UniformSink for FrameRecorder {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set_uniform(name, value);
    }
}

impl MeshProvider for FrameRecorder {
    fn load_mesh(&mut self, kind: ShapeKind) {
        self.meshes.load(&self.device, kind);
    }

    fn draw_mesh(&mut self, kind: ShapeKind) {
        if self.meshes.get(kind).is_none() {
            log::warn!("Skipping draw of {kind:?}: mesh was never loaded");
            return;
        }
        self.draws.push(RecordedDraw {
            shape: kind,
            object: self.uniforms.object,
        });
    }
}

/// Headless uniform sink and mesh provider.
///
/// Keeps the raw uniform writes, the meshes that were loaded and a snapshot
/// of the object uniforms for every draw. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct DrawLog {
    writes: UniformLog,
    uniforms: SceneUniforms,
    loaded: Vec<ShapeKind>,
    draws: Vec<RecordedDraw>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniforms(&self) -> &UniformLog {
        &self.writes
    }

    pub fn scene_uniforms(&self) -> &SceneUniforms {
        &self.uniforms
    }

    pub fn loaded(&self) -> &[ShapeKind] {
        &self.loaded
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn begin_frame(&mut self) {
        self.writes.clear();
        self.draws.clear();
    }
}

impl UniformSink for DrawLog {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.writes.set_uniform(name, value);
        self.uniforms.set_uniform(name, value);
    }
}

impl MeshProvider for DrawLog {
    fn load_mesh(&mut self, kind: ShapeKind) {
        if !self.loaded.contains(&kind) {
            self.loaded.push(kind);
        }
    }

    fn draw_mesh(&mut self, kind: ShapeKind) {
        if !self.loaded.contains(&kind) {
            log::warn!("Skipping draw of {kind:?}: mesh was never loaded");
            return;
        }
        self.draws.push(RecordedDraw {
            shape: kind,
            object: self.uniforms.object,
        });
    }
}
