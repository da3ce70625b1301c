use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use desk_scene::{
    SceneConfig, SceneManager,
    render::DrawLog,
    resources::texture::HeadlessTextures,
    scene::{PrepareReport, script::TEXTURE_FILES},
};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A throwaway asset directory under the system temp dir, removed on drop.
pub struct AssetDir {
    path: PathBuf,
}

impl AssetDir {
    pub fn new(name_hint: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "desk_scene_{}_{}_{}",
            name_hint,
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&path).expect("failed to create temp asset dir");
        Self { path }
    }

    /// Every texture the desk scene loads, as small solid-colour images.
    pub fn with_desk_textures(name_hint: &str) -> Self {
        let dir = Self::new(name_hint);
        for (file, _) in TEXTURE_FILES {
            dir.write_rgb(file, 4, 4, [90, 60, 30]);
        }
        dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The encoder is picked from the file extension.
    pub fn write_rgb(&self, file: &str, width: u32, height: u32, rgb: [u8; 3]) {
        image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
            .save(self.path.join(file))
            .expect("failed to write temp image");
    }

    pub fn write_grey(&self, file: &str, width: u32, height: u32) {
        image::GrayImage::from_pixel(width, height, image::Luma([128]))
            .save(self.path.join(file))
            .expect("failed to write temp image");
    }

    pub fn remove(&self, file: &str) {
        std::fs::remove_file(self.path.join(file)).expect("failed to remove temp image");
    }

    pub fn config(&self) -> SceneConfig {
        SceneConfig {
            asset_dir: self.path.clone(),
            ..SceneConfig::default()
        }
    }
}

impl Drop for AssetDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// A scene prepared against headless collaborators.
pub struct PreparedScene {
    pub scene: SceneManager,
    pub gpu: HeadlessTextures,
    pub target: DrawLog,
    pub report: PrepareReport,
}

pub fn prepare(config: SceneConfig) -> PreparedScene {
    let mut scene = SceneManager::new(config);
    let mut gpu = HeadlessTextures::new();
    let mut target = DrawLog::new();
    let report = scene.prepare_scene(&mut gpu, &mut target);
    PreparedScene {
        scene,
        gpu,
        target,
        report,
    }
}
