//! Named shader uniforms.
//!
//! The scene core never talks to a GPU pipeline directly. It writes named
//! uniforms into a [`UniformSink`], which is either the wgpu frame recorder
//! (see [`crate::render::FrameRecorder`]) or a headless log used by tests and
//! dry runs.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

/// Uniform names shared by the scene core and the WGSL scene shader.
pub mod names {
    pub const MODEL: &str = "model";
    pub const OBJECT_COLOR: &str = "objectColor";
    pub const OBJECT_TEXTURE: &str = "objectTexture";
    pub const USE_TEXTURE: &str = "bUseTexture";
    pub const USE_LIGHTING: &str = "bUseLighting";
    pub const UV_SCALE: &str = "UVscale";

    pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
    pub const MATERIAL_SPECULAR: &str = "material.specularColor";
    pub const MATERIAL_SHININESS: &str = "material.shininess";

    pub const DIRECTIONAL_DIRECTION: &str = "directionalLight.direction";
    pub const DIRECTIONAL_AMBIENT: &str = "directionalLight.ambient";
    pub const DIRECTIONAL_DIFFUSE: &str = "directionalLight.diffuse";
    pub const DIRECTIONAL_SPECULAR: &str = "directionalLight.specular";
    pub const DIRECTIONAL_ACTIVE: &str = "directionalLight.bActive";

    /// `pointLights[<slot>].<field>`
    pub fn point_light(slot: usize, field: &str) -> String {
        format!("pointLights[{slot}].{field}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Mat4(Matrix4<f32>),
    /// Texture unit index a sampler reads from.
    Sampler(u32),
}

/// Something that accepts named uniform writes for the currently bound shader.
///
/// Writes are fire-and-forget. Sinks that don't know a name are expected to
/// ignore it (and may log), the same way a shader ignores an inactive uniform.
pub trait UniformSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    fn set_sampler(&mut self, name: &str, unit: u32) {
        self.set_uniform(name, UniformValue::Sampler(unit));
    }
}

/// Records every uniform write in order.
#[derive(Clone, Debug, Default)]
pub struct UniformLog {
    writes: Vec<(String, UniformValue)>,
}

impl UniformLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[(String, UniformValue)] {
        &self.writes
    }

    /// The most recent value written under `name`.
    pub fn last(&self, name: &str) -> Option<UniformValue> {
        self.writes
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn count(&self, name: &str) -> usize {
        self.writes.iter().filter(|(n, _)| n == name).count()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl UniformSink for UniformLog {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.writes.push((name.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_returns_most_recent_write() {
        let mut log = UniformLog::new();
        log.set_float(names::MATERIAL_SHININESS, 32.0);
        log.set_bool(names::USE_TEXTURE, true);
        log.set_float(names::MATERIAL_SHININESS, 64.0);

        assert_eq!(log.last(names::MATERIAL_SHININESS), Some(UniformValue::Float(64.0)));
        assert_eq!(log.count(names::MATERIAL_SHININESS), 2);
        assert_eq!(log.last(names::OBJECT_TEXTURE), None);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn point_light_names_are_indexed() {
        assert_eq!(names::point_light(3, "bActive"), "pointLights[3].bActive");
    }
}
