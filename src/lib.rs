//! desk-scene
//!
//! Prepares and renders a static desk scene (desk, monitor, keyboard, mouse)
//! built from three primitive meshes. Every primitive is drawn with a tagged
//! texture and a named material under a fixed set of lights.
//!
//! High-level modules
//! - `scene`: the scene manager, per-draw state binding, lights and the scene script
//! - `data_structures`: texture and material registries, transforms, GPU textures
//! - `shader`: named uniforms and the sink they are written to
//! - `resources`: image decoding, primitive meshes and texture backends
//! - `pipelines`: the scene render pipeline and its uniform layouts
//! - `render`: recording scene draws for a frame (or headlessly)
//! - `camera`: the fixed camera and its uniform
//! - `context`: window, surface, device and pipeline state
//! - `flow`: the winit event loop and the headless dry run
//! - `config`, `error`: scene configuration and the shared error type
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shader;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use config::{DuplicateTagPolicy, SceneConfig};
pub use error::{SceneError, SceneResult};
pub use scene::SceneManager;
