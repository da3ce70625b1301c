//! Render pipelines.
//!
//! - `basic` holds the shared pipeline builder
//! - `scene` is the lit, textured pipeline every scene primitive is drawn with

pub mod basic;
pub mod scene;
