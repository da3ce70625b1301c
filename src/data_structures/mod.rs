//! Scene data: registries, transforms and GPU textures.
//!
//! - `texture_registry` holds tagged textures and their texture-unit slots
//! - `material` holds named shading parameters
//! - `transform` builds model matrices for single draws
//! - `texture` wraps GPU textures and builds mip chains

pub mod material;
pub mod texture;
pub mod texture_registry;
pub mod transform;
