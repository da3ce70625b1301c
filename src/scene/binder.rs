//! Per-draw shader state: colour or texture, UV scale and material.
//!
//! Each setter writes its uniforms and records what is now bound in a
//! [`DrawState`]. Lookups that fail write nothing, so whatever was bound for
//! the previous draw stays in effect.

use cgmath::{Vector2, Vector4};

use crate::{
    data_structures::{material::MaterialRegistry, texture_registry::TextureRegistry},
    error::{SceneError, SceneResult},
    shader::{UniformSink, names},
};

/// What the fragment shader samples its base colour from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum BoundSurface {
    /// Nothing has been bound yet.
    #[default]
    Unset,
    Color([f32; 4]),
    Texture { tag: String, slot: u32 },
}

/// The shader state that currently applies to draws.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    pub material: Option<String>,
    pub surface: BoundSurface,
    pub uv_scale: [f32; 2],
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            material: None,
            surface: BoundSurface::Unset,
            uv_scale: [1.0, 1.0],
        }
    }
}

impl DrawState {
    pub fn set_shader_color<S: UniformSink + ?Sized>(
        &mut self,
        sink: &mut S,
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
    ) {
        sink.set_bool(names::USE_TEXTURE, false);
        sink.set_vec4(names::OBJECT_COLOR, Vector4::new(red, green, blue, alpha));
        self.surface = BoundSurface::Color([red, green, blue, alpha]);
    }

    /// Switch to the texture registered under `tag` and return its unit.
    pub fn set_shader_texture<S: UniformSink + ?Sized>(
        &mut self,
        sink: &mut S,
        textures: &TextureRegistry,
        tag: &str,
    ) -> SceneResult<u32> {
        let Some(slot) = textures.find_slot_by_tag(tag) else {
            return Err(SceneError::UnknownTexture(tag.to_string()));
        };
        sink.set_bool(names::USE_TEXTURE, true);
        sink.set_sampler(names::OBJECT_TEXTURE, slot);
        self.surface = BoundSurface::Texture {
            tag: tag.to_string(),
            slot,
        };
        Ok(slot)
    }

    pub fn set_texture_uv_scale<S: UniformSink + ?Sized>(&mut self, sink: &mut S, u: f32, v: f32) {
        sink.set_vec2(names::UV_SCALE, Vector2::new(u, v));
        self.uv_scale = [u, v];
    }

    pub fn set_shader_material<S: UniformSink + ?Sized>(
        &mut self,
        sink: &mut S,
        materials: &MaterialRegistry,
        tag: &str,
    ) -> SceneResult<()> {
        let Some(material) = materials.find_by_tag(tag) else {
            return Err(SceneError::UnknownMaterial(tag.to_string()));
        };
        sink.set_vec3(names::MATERIAL_DIFFUSE, material.diffuse_color);
        sink.set_vec3(names::MATERIAL_SPECULAR, material.specular_color);
        sink.set_float(names::MATERIAL_SHININESS, material.shininess);
        self.material = Some(material.tag.clone());
        Ok(())
    }
}
