//! Named shading parameters (diffuse, specular, shininess) looked up by tag.

use std::collections::HashMap;

use cgmath::Vector3;

use crate::{
    config::DuplicateTagPolicy,
    error::{SceneError, SceneResult},
};

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialEntry {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

/// Append-only material table.
///
/// Entries are kept in definition order. The tag index always points at the
/// first entry with a given tag, so under [`DuplicateTagPolicy::Shadow`] later
/// duplicates are stored but never returned.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    entries: Vec<MaterialEntry>,
    index: HashMap<String, usize>,
    policy: DuplicateTagPolicy,
}

impl MaterialRegistry {
    pub fn new(policy: DuplicateTagPolicy) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            policy,
        }
    }

    pub fn define(
        &mut self,
        tag: &str,
        diffuse_color: impl Into<Vector3<f32>>,
        specular_color: impl Into<Vector3<f32>>,
        shininess: f32,
    ) -> SceneResult<()> {
        if self.index.contains_key(tag) {
            match self.policy {
                DuplicateTagPolicy::Reject => {
                    log::error!("Material `{tag}` is already defined");
                    return Err(SceneError::DuplicateMaterial(tag.to_string()));
                }
                DuplicateTagPolicy::Shadow => {
                    log::warn!("Material `{tag}` defined twice, the first definition stays in use");
                }
            }
        }
        self.index.entry(tag.to_string()).or_insert(self.entries.len());
        self.entries.push(MaterialEntry {
            tag: tag.to_string(),
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        });
        Ok(())
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&MaterialEntry> {
        self.index.get(tag).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[MaterialEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
