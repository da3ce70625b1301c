//! Scene preparation and per-frame rendering of the desk scene.
//!
//! [`SceneManager`] owns the texture and material registries and the current
//! [`DrawState`]. It talks to the outside world only through three seams:
//!
//! - a [`TextureBackend`] that uploads, binds and releases textures
//! - a [`UniformSink`] that receives named shader uniforms
//! - a [`MeshProvider`] that loads and draws the primitive shapes
//!
//! Preparation runs once: define materials, configure lights, load meshes,
//! register textures, bind textures to units. Rendering replays the scene
//! script every frame. Neither step stops at the first failure; problems are
//! collected into a [`PrepareReport`] or [`RenderReport`].

pub mod binder;
pub mod lights;
pub mod script;

use crate::{
    config::SceneConfig,
    data_structures::{
        material::MaterialRegistry,
        texture_registry::{TextureBackend, TextureHandle, TextureRegistry},
        transform::set_transformations,
    },
    error::{SceneError, SceneResult},
    resources::mesh::{MeshProvider, ShapeKind},
    shader::UniformSink,
};

pub use binder::{BoundSurface, DrawState};
pub use lights::SceneLights;
pub use script::{Draw, Surface};

/// Outcome of [`SceneManager::prepare_scene`].
#[derive(Debug, Default)]
pub struct PrepareReport {
    pub textures_loaded: usize,
    pub failures: Vec<SceneError>,
}

impl PrepareReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of one [`SceneManager::render_scene`] pass.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Draw calls issued, including those that kept a stale material or texture.
    pub draws: usize,
    pub issues: Vec<SceneError>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug)]
pub struct SceneManager {
    config: SceneConfig,
    textures: TextureRegistry,
    materials: MaterialRegistry,
    lights: SceneLights,
    state: DrawState,
}

impl SceneManager {
    pub fn new(config: SceneConfig) -> Self {
        let textures = TextureRegistry::new(
            config.texture_capacity,
            config.duplicate_tags,
            config.flip_vertically,
        );
        let materials = MaterialRegistry::new(config.duplicate_tags);
        Self {
            config,
            textures,
            materials,
            lights: SceneLights::desk_default(),
            state: DrawState::default(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn lights(&self) -> &SceneLights {
        &self.lights
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.state
    }

    /// Load `file` from the asset directory and register it under `tag`.
    pub fn create_texture<B: TextureBackend + ?Sized>(
        &mut self,
        file: &str,
        tag: &str,
        backend: &mut B,
    ) -> SceneResult<TextureHandle> {
        let path = self.config.texture_path(file);
        self.textures.register(path, tag, backend)
    }

    pub fn setup_scene_lights<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        self.lights.apply(sink);
    }

    /// Run the one-off preparation pass.
    ///
    /// Textures from an earlier preparation are released first, so the new
    /// pass hands out units from 0 again.
    pub fn prepare_scene<B, T>(&mut self, backend: &mut B, target: &mut T) -> PrepareReport
    where
        B: TextureBackend + ?Sized,
        T: UniformSink + MeshProvider + ?Sized,
    {
        let mut report = PrepareReport::default();

        if !self.textures.is_empty() {
            log::debug!("Releasing {} textures from the previous preparation", self.textures.len());
            self.textures.release_all(backend);
        }
        self.materials.clear();
        self.state = DrawState::default();

        report.failures.extend(script::define_object_materials(&mut self.materials));
        self.setup_scene_lights(target);

        for kind in ShapeKind::ALL {
            target.load_mesh(kind);
        }

        for (file, tag) in script::TEXTURE_FILES {
            match self.create_texture(file, tag, backend) {
                Ok(_) => report.textures_loaded += 1,
                Err(e) => report.failures.push(e),
            }
        }
        self.textures.bind_all(backend);

        log::info!(
            "Scene prepared: {} materials, {} textures, {} failures",
            self.materials.len(),
            report.textures_loaded,
            report.failures.len()
        );
        report
    }

    /// Bind and draw one scripted primitive.
    ///
    /// Lookup failures are returned but the draw still happens with whatever
    /// material or texture was bound before.
    pub fn render_draw<T>(&mut self, target: &mut T, draw: &Draw) -> Vec<SceneError>
    where
        T: UniformSink + MeshProvider + ?Sized,
    {
        let mut issues = Vec::new();

        set_transformations(target, &draw.transform);
        if let Err(e) = self.state.set_shader_material(target, &self.materials, draw.material) {
            issues.push(e);
        }
        match draw.surface {
            Surface::Texture(tag) => {
                if let Err(e) = self.state.set_shader_texture(target, &self.textures, tag) {
                    issues.push(e);
                }
            }
            Surface::Color([r, g, b, a]) => self.state.set_shader_color(target, r, g, b, a),
        }
        let (u, v) = draw.uv_scale;
        self.state.set_texture_uv_scale(target, u, v);
        target.draw_mesh(draw.shape);

        issues
    }

    /// Replay the whole scene script.
    pub fn render_scene<T>(&mut self, target: &mut T) -> RenderReport
    where
        T: UniformSink + MeshProvider + ?Sized,
    {
        let mut report = RenderReport::default();
        for draw in script::desk_scene() {
            let issues = self.render_draw(target, &draw);
            for issue in &issues {
                log::debug!("{:?} draw continued with stale state: {issue}", draw.shape);
            }
            report.issues.extend(issues);
            report.draws += 1;
        }
        report
    }

    pub fn set_shader_color<S: UniformSink + ?Sized>(&mut self, sink: &mut S, rgba: [f32; 4]) {
        let [r, g, b, a] = rgba;
        self.state.set_shader_color(sink, r, g, b, a);
    }

    pub fn set_shader_texture<S: UniformSink + ?Sized>(&mut self, sink: &mut S, tag: &str) -> SceneResult<u32> {
        self.state.set_shader_texture(sink, &self.textures, tag)
    }

    pub fn set_texture_uv_scale<S: UniformSink + ?Sized>(&mut self, sink: &mut S, u: f32, v: f32) {
        self.state.set_texture_uv_scale(sink, u, v);
    }

    pub fn set_shader_material<S: UniformSink + ?Sized>(&mut self, sink: &mut S, tag: &str) -> SceneResult<()> {
        self.state.set_shader_material(sink, &self.materials, tag)
    }

    /// Release every GPU texture the scene registered.
    pub fn destroy_textures<B: TextureBackend + ?Sized>(&mut self, backend: &mut B) {
        let count = self.textures.len();
        self.textures.release_all(backend);
        log::info!("Released {count} scene textures");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        render::DrawLog,
        resources::{DecodedImage, texture::HeadlessTextures},
        shader::{UniformValue, names},
    };

    fn manager_without_assets() -> SceneManager {
        let config = SceneConfig {
            asset_dir: std::env::temp_dir().join("desk_scene_no_such_asset_dir"),
            ..SceneConfig::default()
        };
        SceneManager::new(config)
    }

    #[test]
    fn missing_assets_do_not_stop_preparation() {
        let mut gpu = HeadlessTextures::new();
        let mut target = DrawLog::new();
        let mut scene = manager_without_assets();

        let report = scene.prepare_scene(&mut gpu, &mut target);
        assert_eq!(report.textures_loaded, 0);
        assert_eq!(report.failures.len(), script::TEXTURE_FILES.len());
        assert!(report.failures.iter().all(|e| matches!(e, SceneError::Io { .. })));

        assert_eq!(scene.materials().len(), 5);
        assert_eq!(target.loaded(), &ShapeKind::ALL);
        assert_eq!(
            target.uniforms().last(names::USE_LIGHTING),
            Some(UniformValue::Bool(true))
        );
    }

    #[test]
    fn rendering_without_textures_still_draws_everything() {
        let mut gpu = HeadlessTextures::new();
        let mut target = DrawLog::new();
        let mut scene = manager_without_assets();
        scene.prepare_scene(&mut gpu, &mut target);

        let report = scene.render_scene(&mut target);
        assert_eq!(report.draws, 125);
        assert_eq!(target.draws().len(), 125);
        assert_eq!(report.issues.len(), 125);
        assert!(report.issues.iter().all(|e| matches!(e, SceneError::UnknownTexture(_))));
        assert_eq!(target.uniforms().count(names::OBJECT_TEXTURE), 0);
    }

    #[test]
    fn textures_registered_in_memory_are_used_by_the_script() {
        let mut gpu = HeadlessTextures::new();
        let mut target = DrawLog::new();
        let mut scene = manager_without_assets();
        scene.prepare_scene(&mut gpu, &mut target);
        for (_, tag) in script::TEXTURE_FILES {
            scene
                .textures
                .register_image(DecodedImage::new(1, 1, 4, vec![255; 4]), tag, &mut gpu)
                .unwrap();
        }

        let report = scene.render_scene(&mut target);
        assert!(report.is_clean(), "{:?}", report.issues);
        let last = target.draws().last().unwrap();
        assert_eq!(last.shape, ShapeKind::Box);
        assert_eq!(scene.draw_state().material.as_deref(), Some("blackMetalMat"));
        assert_eq!(
            scene.draw_state().surface,
            BoundSurface::Texture {
                tag: "black_metal".into(),
                slot: 2
            }
        );
    }

    #[test]
    fn preparing_again_releases_earlier_textures() {
        let mut gpu = HeadlessTextures::new();
        let mut target = DrawLog::new();
        let mut scene = manager_without_assets();
        scene.prepare_scene(&mut gpu, &mut target);
        scene
            .textures
            .register_image(DecodedImage::new(1, 1, 3, vec![0; 3]), "wood", &mut gpu)
            .unwrap();

        let report = scene.prepare_scene(&mut gpu, &mut target);
        assert!(report.failures.iter().all(|e| !matches!(e, SceneError::DuplicateMaterial(_))));
        assert_eq!(gpu.live_count(), 0);
        assert_eq!(scene.materials().len(), 5);
    }

    #[test]
    fn destroy_textures_empties_the_registry() {
        let mut gpu = HeadlessTextures::new();
        let mut scene = manager_without_assets();
        scene
            .textures
            .register_image(DecodedImage::new(1, 1, 3, vec![0; 3]), "wood", &mut gpu)
            .unwrap();
        scene.destroy_textures(&mut gpu);
        assert!(scene.textures().is_empty());
        assert_eq!(gpu.live_count(), 0);
    }
}
