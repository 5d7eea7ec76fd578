//! Snapshot of every mesh's pristine materials.
//!
//! Render modes that restyle a model start from these snapshots instead of the
//! live materials, so switching modes never needs the asset to be reloaded and
//! never inherits state from the previously active mode.

use std::collections::HashMap;

use crate::data_structures::{
    material::MaterialSlot,
    scene_graph::{NodeId, SceneNode},
};

/// The material a mesh had right after its model was loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSnapshot {
    pub material: MaterialSlot,
    pub wireframe: bool,
}

#[derive(Debug, Default)]
pub struct MaterialCache {
    entries: HashMap<NodeId, MaterialSnapshot>,
}

impl MaterialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Stores a deep copy of the material of every mesh in `scene` that has none
     * recorded yet. Meshes without a material are skipped. Calling it again
     * for the same load changes nothing.
     *
     * Returns how many snapshots were added.
     */
    pub fn capture(&mut self, scene: &dyn SceneNode) -> usize {
        let mut captured = 0;
        scene.traverse(&mut |node| {
            let Some(material) = node.mesh().and_then(|mesh| mesh.material.as_ref()) else {
                return;
            };
            self.entries.entry(node.id()).or_insert_with(|| {
                captured += 1;
                MaterialSnapshot {
                    material: material.clone(),
                    wireframe: material.wireframe(),
                }
            });
        });
        log::debug!(
            "captured {} material snapshots ({} total)",
            captured,
            self.entries.len()
        );
        captured
    }

    pub fn lookup(&self, id: NodeId) -> Option<&MaterialSnapshot> {
        self.entries.get(&id)
    }

    /// Drops every snapshot. Must run whenever the model source changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
