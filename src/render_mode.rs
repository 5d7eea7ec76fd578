//! Render modes and the applier that restyles a scene for them.
//!
//! Every mode is a rule that rewrites the live material of each mesh:
//!
//! | mode        | material                                   | environment |
//! |-------------|--------------------------------------------|-------------|
//! | `pbr`       | clone of the snapshot                      | neutral     |
//! | `solid`     | clone, metalness 0, roughness 1            | disabled    |
//! | `wireframe` | live material with `wireframe = true`      | unchanged   |
//! | `normals`   | debug normal material (if supported)       | unchanged   |
//! | `matcap`    | clone, metalness 0.5, roughness 0.5        | neutral     |
//!
//! `pbr`, `solid` and `matcap` only depend on the [`MaterialCache`], so they
//! look the same whatever mode was active before. `wireframe` stacks on top of
//! whatever material is live at that moment.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    cache::MaterialCache,
    data_structures::{
        material::{Material, MaterialSlot, NormalMaterial},
        scene_graph::{Mesh, NodeId, SceneNode},
    },
    error::ViewerError,
    lighting::{Environment, Lighting},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Pbr,
    Solid,
    Wireframe,
    Normals,
    Matcap,
}

impl RenderMode {
    pub const ALL: [RenderMode; 5] = [
        RenderMode::Pbr,
        RenderMode::Solid,
        RenderMode::Wireframe,
        RenderMode::Normals,
        RenderMode::Matcap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Pbr => "pbr",
            RenderMode::Solid => "solid",
            RenderMode::Wireframe => "wireframe",
            RenderMode::Normals => "normals",
            RenderMode::Matcap => "matcap",
        }
    }

    /// The environment lighting this mode asks for, `None` to leave it as is.
    pub fn environment(self) -> Option<Environment> {
        match self {
            RenderMode::Pbr | RenderMode::Matcap => Some(Environment::Neutral),
            RenderMode::Solid => Some(Environment::Disabled),
            RenderMode::Wireframe | RenderMode::Normals => None,
        }
    }
}

impl FromStr for RenderMode {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ViewerError::UnknownRenderMode(s.to_string()))
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host renderer is able to draw, fixed when a session is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderCapabilities {
    /// The renderer can draw [`NormalMaterial`]. Without it `normals` leaves
    /// materials untouched.
    pub normal_material: bool,
}

impl Default for RenderCapabilities {
    fn default() -> Self {
        Self {
            normal_material: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderModeApplier {
    capabilities: RenderCapabilities,
}

impl RenderModeApplier {
    pub fn new(capabilities: RenderCapabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> RenderCapabilities {
        self.capabilities
    }

    /**
     * Restyles every mesh of `scene` for `mode` and marks its material dirty.
     *
     * Meshes without a snapshot in `cache` keep their material under `pbr`,
     * `solid` and `matcap`; `wireframe` and `normals` apply regardless. The
     * environment lighting is switched once per call.
     *
     * Returns the number of meshes visited.
     */
    pub fn apply(
        &self,
        mode: RenderMode,
        scene: &mut dyn SceneNode,
        cache: &MaterialCache,
        lighting: &mut Lighting,
    ) -> usize {
        let mut visited = 0;
        scene.traverse_mut(&mut |node| {
            let id = node.id();
            if let Some(mesh) = node.mesh_mut() {
                if self.apply_to_mesh(mode, id, mesh, cache) {
                    visited += 1;
                }
            }
        });
        if let Some(environment) = mode.environment() {
            lighting.environment = environment;
        }
        log::debug!("applied render mode {} to {} meshes", mode, visited);
        visited
    }

    fn apply_to_mesh(
        &self,
        mode: RenderMode,
        id: NodeId,
        mesh: &mut Mesh,
        cache: &MaterialCache,
    ) -> bool {
        let Some(live) = mesh.material.as_mut() else {
            return false;
        };
        let original = cache.lookup(id).map(|snapshot| &snapshot.material);
        match mode {
            RenderMode::Pbr => {
                if let Some(original) = original {
                    *live = original.clone();
                }
            }
            RenderMode::Solid => {
                if let Some(original) = original {
                    *live = restyled(original, 0.0, 1.0);
                }
            }
            RenderMode::Wireframe => {
                live.iter_mut().for_each(|m| m.set_wireframe(true));
            }
            RenderMode::Normals => {
                if self.capabilities.normal_material {
                    *live = MaterialSlot::Single(Material::Normal(NormalMaterial::default()));
                }
            }
            RenderMode::Matcap => {
                if let Some(original) = original {
                    *live = restyled(original, 0.5, 0.5);
                }
            }
        }
        live.mark_dirty();
        true
    }
}

fn restyled(original: &MaterialSlot, metalness: f32, roughness: f32) -> MaterialSlot {
    let mut material = original.clone();
    material.iter_mut().for_each(|m| {
        m.set_metalness(metalness);
        m.set_roughness(roughness);
    });
    material
}
