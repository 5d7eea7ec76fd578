//! Surface appearance of mesh nodes.
//!
//! - [`StandardMaterial`] is the metallic-roughness material produced by the glTF loader
//! - [`NormalMaterial`] is the debug material that colours surfaces by their normals
//! - [`Material`] is either of the two
//! - [`MaterialSlot`] is what a mesh holds: one material or a list of them
//!
//! Every material carries a `needs_update` flag. Whoever mutates a live material
//! is expected to raise it so the renderer re-uploads the material.

use crate::data_structures::texture::TextureInfo;

/// Physically based metallic-roughness material.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub name: Option<String>,
    pub base_color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub wireframe: bool,
    pub map: Option<TextureInfo>,
    pub normal_map: Option<TextureInfo>,
    pub roughness_map: Option<TextureInfo>,
    pub metalness_map: Option<TextureInfo>,
    pub ao_map: Option<TextureInfo>,
    pub needs_update: bool,
}

impl Default for StandardMaterial {
    // glTF defaults for a primitive without a material
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            metalness: 1.0,
            roughness: 1.0,
            wireframe: false,
            map: None,
            normal_map: None,
            roughness_map: None,
            metalness_map: None,
            ao_map: None,
            needs_update: false,
        }
    }
}

impl StandardMaterial {
    /// The texture slots that take part in the texture memory estimate, in
    /// the order `map`, `normal_map`, `roughness_map`, `metalness_map`, `ao_map`.
    pub fn textures(&self) -> impl Iterator<Item = &TextureInfo> {
        [
            &self.map,
            &self.normal_map,
            &self.roughness_map,
            &self.metalness_map,
            &self.ao_map,
        ]
        .into_iter()
        .flatten()
    }
}

/// Debug material visualizing surface normals. Has no textures.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalMaterial {
    pub wireframe: bool,
    pub needs_update: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Normal(NormalMaterial),
}

impl Default for Material {
    fn default() -> Self {
        Material::Standard(StandardMaterial::default())
    }
}

impl Material {
    pub fn wireframe(&self) -> bool {
        match self {
            Material::Standard(m) => m.wireframe,
            Material::Normal(m) => m.wireframe,
        }
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        match self {
            Material::Standard(m) => m.wireframe = wireframe,
            Material::Normal(m) => m.wireframe = wireframe,
        }
    }

    /// `None` for materials without a metalness parameter.
    pub fn metalness(&self) -> Option<f32> {
        match self {
            Material::Standard(m) => Some(m.metalness),
            Material::Normal(_) => None,
        }
    }

    pub fn roughness(&self) -> Option<f32> {
        match self {
            Material::Standard(m) => Some(m.roughness),
            Material::Normal(_) => None,
        }
    }

    /// Ignored by materials without a metalness parameter.
    pub fn set_metalness(&mut self, metalness: f32) {
        if let Material::Standard(m) = self {
            m.metalness = metalness;
        }
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        if let Material::Standard(m) = self {
            m.roughness = roughness;
        }
    }

    pub fn needs_update(&self) -> bool {
        match self {
            Material::Standard(m) => m.needs_update,
            Material::Normal(m) => m.needs_update,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.set_needs_update(true);
    }

    /// Called by the renderer after it picked up the latest state.
    pub fn mark_clean(&mut self) {
        self.set_needs_update(false);
    }

    fn set_needs_update(&mut self, value: bool) {
        match self {
            Material::Standard(m) => m.needs_update = value,
            Material::Normal(m) => m.needs_update = value,
        }
    }

    pub fn textures(&self) -> Box<dyn Iterator<Item = &TextureInfo> + '_> {
        match self {
            Material::Standard(m) => Box::new(m.textures()),
            Material::Normal(_) => Box::new(std::iter::empty()),
        }
    }
}

/// The material(s) assigned to a mesh.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialSlot {
    Single(Material),
    Multi(Vec<Material>),
}

impl From<Material> for MaterialSlot {
    fn from(material: Material) -> Self {
        MaterialSlot::Single(material)
    }
}

impl From<StandardMaterial> for MaterialSlot {
    fn from(material: StandardMaterial) -> Self {
        MaterialSlot::Single(Material::Standard(material))
    }
}

impl MaterialSlot {
    pub fn iter(&self) -> std::slice::Iter<'_, Material> {
        match self {
            MaterialSlot::Single(material) => std::slice::from_ref(material).iter(),
            MaterialSlot::Multi(materials) => materials.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Material> {
        match self {
            MaterialSlot::Single(material) => std::slice::from_mut(material).iter_mut(),
            MaterialSlot::Multi(materials) => materials.iter_mut(),
        }
    }

    /// True if any material in the slot renders as wireframe.
    pub fn wireframe(&self) -> bool {
        self.iter().any(Material::wireframe)
    }

    pub fn mark_dirty(&mut self) {
        self.iter_mut().for_each(Material::mark_dirty);
    }

    pub fn needs_update(&self) -> bool {
        self.iter().all(Material::needs_update)
    }
}
