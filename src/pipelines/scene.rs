//! The scene pipeline and the GPU layout of its uniforms.
//!
//! Scene code writes uniforms by name (see [`crate::shader::names`]).
//! [`SceneUniforms`] maps those names onto the plain-old-data structs that are
//! copied into uniform buffers:
//!
//! - group 0: camera (binding 0) and lights (binding 1), written once per frame
//! - group 1: the per-draw [`ObjectUniform`], bound with a dynamic offset
//! - group 2: the texture unit the draw samples from

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};

use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{PipelineOptions, mk_render_pipeline},
    resources::mesh::ShapeVertex,
    scene::lights::MAX_POINT_LIGHTS,
    shader::{UniformSink, UniformValue, names},
};

/// Everything that changes from one draw to the next.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for transforming normals.
    pub normal: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
    pub specular_color: [f32; 3],
    pub use_texture: u32,
    pub uv_scale: [f32; 2],
    pub texture_slot: u32,
    _padding: u32,
}

impl Default for ObjectUniform {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            model: identity,
            normal: identity,
            object_color: [1.0, 1.0, 1.0, 1.0],
            diffuse_color: [1.0, 1.0, 1.0],
            shininess: 32.0,
            specular_color: [0.5, 0.5, 0.5],
            use_texture: 0,
            uv_scale: [1.0, 1.0],
            texture_slot: 0,
            _padding: 0,
        }
    }
}

impl ObjectUniform {
    pub fn set_model(&mut self, model: Matrix4<f32>) {
        // Singular matrices (a zero scale) keep the identity for normals
        let normal = model.invert().map(|m| m.transpose()).unwrap_or_else(Matrix4::identity);
        self.model = model.into();
        self.normal = normal.into();
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model.into()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    pub direction: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    _padding0: u32,
    pub diffuse: [f32; 3],
    _padding1: u32,
    pub specular: [f32; 3],
    _padding2: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    _padding0: u32,
    pub diffuse: [f32; 3],
    _padding1: u32,
    pub specular: [f32; 3],
    _padding2: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub directional: DirectionalLightRaw,
    pub points: [PointLightRaw; MAX_POINT_LIGHTS],
    pub use_lighting: u32,
    _padding: [u32; 3],
}

/// CPU copy of the scene shader's uniforms, filled by name.
#[derive(Debug, Default, Clone)]
pub struct SceneUniforms {
    pub object: ObjectUniform,
    pub lights: LightsUniform,
    lights_dirty: bool,
}

impl SceneUniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once after any light uniform changed.
    pub fn take_lights_dirty(&mut self) -> bool {
        std::mem::take(&mut self.lights_dirty)
    }

    fn set_point_light(&mut self, slot: usize, field: &str, value: UniformValue) -> bool {
        let Some(light) = self.lights.points.get_mut(slot) else {
            log::warn!("Point light slot {slot} is out of range ({MAX_POINT_LIGHTS} slots)");
            return true;
        };
        match (field, value) {
            ("position", UniformValue::Vec3(v)) => light.position = v.into(),
            ("ambient", UniformValue::Vec3(v)) => light.ambient = v.into(),
            ("diffuse", UniformValue::Vec3(v)) => light.diffuse = v.into(),
            ("specular", UniformValue::Vec3(v)) => light.specular = v.into(),
            ("bActive", UniformValue::Bool(b)) => light.active = b as u32,
            _ => return false,
        }
        self.lights_dirty = true;
        true
    }
}

/// `pointLights[3].ambient` -> `(3, "ambient")`
fn parse_point_light(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix("pointLights[")?;
    let (slot, field) = rest.split_once("].")?;
    Some((slot.parse().ok()?, field))
}

fn rgb(v: Vector3<f32>) -> [f32; 3] {
    v.into()
}

impl UniformSink for SceneUniforms {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        use UniformValue::*;

        let object = &mut self.object;
        let directional = &mut self.lights.directional;
        let handled = match (name, value) {
            (names::MODEL, Mat4(m)) => {
                object.set_model(m);
                true
            }
            (names::OBJECT_COLOR, Vec4(c)) => {
                object.object_color = c.into();
                true
            }
            (names::OBJECT_TEXTURE, Sampler(unit)) => {
                object.texture_slot = unit;
                true
            }
            (names::OBJECT_TEXTURE, Int(unit)) if unit >= 0 => {
                object.texture_slot = unit as u32;
                true
            }
            (names::USE_TEXTURE, Bool(b)) => {
                object.use_texture = b as u32;
                true
            }
            (names::UV_SCALE, Vec2(s)) => {
                object.uv_scale = s.into();
                true
            }
            (names::MATERIAL_DIFFUSE, Vec3(c)) => {
                object.diffuse_color = rgb(c);
                true
            }
            (names::MATERIAL_SPECULAR, Vec3(c)) => {
                object.specular_color = rgb(c);
                true
            }
            (names::MATERIAL_SHININESS, Float(s)) => {
                object.shininess = s;
                true
            }
            (names::USE_LIGHTING, Bool(b)) => {
                self.lights.use_lighting = b as u32;
                self.lights_dirty = true;
                true
            }
            (names::DIRECTIONAL_DIRECTION, Vec3(v)) => {
                directional.direction = v.into();
                self.lights_dirty = true;
                true
            }
            (names::DIRECTIONAL_AMBIENT, Vec3(v)) => {
                directional.ambient = v.into();
                self.lights_dirty = true;
                true
            }
            (names::DIRECTIONAL_DIFFUSE, Vec3(v)) => {
                directional.diffuse = v.into();
                self.lights_dirty = true;
                true
            }
            (names::DIRECTIONAL_SPECULAR, Vec3(v)) => {
                directional.specular = v.into();
                self.lights_dirty = true;
                true
            }
            (names::DIRECTIONAL_ACTIVE, Bool(b)) => {
                directional.active = b as u32;
                self.lights_dirty = true;
                true
            }
            _ => match parse_point_light(name) {
                Some((slot, field)) => self.set_point_light(slot, field, value),
                None => false,
            },
        };

        if !handled {
            log::warn!("Ignoring uniform `{name}` = {value:?}: not a scene shader uniform of that type");
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Camera at binding 0, lights at binding 1.
pub fn globals_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT, false),
            uniform_entry(1, wgpu::ShaderStages::FRAGMENT, false),
        ],
        label: Some("scene_globals_bind_group_layout"),
    })
}

/// One [`ObjectUniform`] selected by a dynamic offset.
pub fn object_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_entry(
            0,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            true,
        )],
        label: Some("scene_object_bind_group_layout"),
    })
}

pub fn mk_scene_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    globals_layout: &wgpu::BindGroupLayout,
    object_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[Some(globals_layout), Some(object_layout), Some(texture_layout)],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    };
    // Planes are seen from both sides (the wall from behind the desk)
    let options = PipelineOptions::opaque("Scene Pipeline", color_format, Texture::DEPTH_FORMAT)
        .with_cull_mode(None);
    mk_render_pipeline(device, &layout, options, &[ShapeVertex::desc()], shader)
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector2, Vector4};

    use super::*;

    #[test]
    fn uniform_structs_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 192);
        assert_eq!(std::mem::size_of::<DirectionalLightRaw>(), 64);
        assert_eq!(std::mem::size_of::<PointLightRaw>(), 64);
        assert_eq!(std::mem::size_of::<LightsUniform>(), 400);
    }

    #[test]
    fn routes_object_uniforms() {
        let mut uniforms = SceneUniforms::new();
        uniforms.set_vec4(names::OBJECT_COLOR, Vector4::new(0.1, 0.2, 0.3, 1.0));
        uniforms.set_bool(names::USE_TEXTURE, true);
        uniforms.set_sampler(names::OBJECT_TEXTURE, 2);
        uniforms.set_vec2(names::UV_SCALE, Vector2::new(4.0, 2.0));
        uniforms.set_float(names::MATERIAL_SHININESS, 64.0);

        let object = uniforms.object;
        assert_eq!(object.object_color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(object.use_texture, 1);
        assert_eq!(object.texture_slot, 2);
        assert_eq!(object.uv_scale, [4.0, 2.0]);
        assert_eq!(object.shininess, 64.0);
        assert!(!uniforms.take_lights_dirty());
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let mut object = ObjectUniform::default();
        object.set_model(Matrix4::from_nonuniform_scale(2.0, 1.0, 4.0));
        let normal: Matrix4<f32> = object.normal.into();
        assert_eq!(normal, Matrix4::from_nonuniform_scale(0.5, 1.0, 0.25));

        object.set_model(Matrix4::from_nonuniform_scale(0.0, 1.0, 1.0));
        assert_eq!(Matrix4::from(object.normal), Matrix4::identity());
    }

    #[test]
    fn routes_point_lights_by_slot() {
        let mut uniforms = SceneUniforms::new();
        uniforms.set_vec3(&names::point_light(0, "position"), Vector3::new(0.0, 12.0, 0.0));
        uniforms.set_bool(&names::point_light(0, "bActive"), true);
        uniforms.set_vec3(&names::point_light(4, "diffuse"), Vector3::new(0.6, 0.6, 0.6));

        assert_eq!(uniforms.lights.points[0].position, [0.0, 12.0, 0.0]);
        assert_eq!(uniforms.lights.points[0].active, 1);
        assert_eq!(uniforms.lights.points[4].diffuse, [0.6, 0.6, 0.6]);
        assert!(uniforms.take_lights_dirty());
        assert!(!uniforms.take_lights_dirty());
    }

    #[test]
    fn ignores_unknown_names_and_mismatched_types() {
        let mut uniforms = SceneUniforms::new();
        let before = uniforms.clone();
        uniforms.set_float("fogDensity", 0.3);
        uniforms.set_float(names::OBJECT_COLOR, 1.0);
        uniforms.set_bool(&names::point_light(9, "bActive"), true);
        uniforms.set_bool("pointLights[x].bActive", true);
        assert_eq!(uniforms.object, before.object);
        assert_eq!(uniforms.lights, before.lights);
    }

    #[test]
    fn parses_point_light_names() {
        assert_eq!(parse_point_light("pointLights[3].ambient"), Some((3, "ambient")));
        assert_eq!(parse_point_light("pointLights[].ambient"), None);
        assert_eq!(parse_point_light("directionalLight.ambient"), None);
    }
}
