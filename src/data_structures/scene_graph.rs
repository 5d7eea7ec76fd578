//! Scene graph of a loaded model.
//!
//! Provides the [`SceneNode`] trait and its two implementations: a
//! [`ContainerNode`] that only groups children and a [`MeshNode`] that carries a
//! drawable [`Mesh`]. Each node gets a fresh [`NodeId`] when it is created, so
//! ids of two loads of the same asset never collide.

use std::fmt::{self, Debug, Display};

use cgmath::One;
use uuid::Uuid;

use crate::data_structures::{geometry::Geometry, material::MaterialSlot};

/// Unique identifier of a node, generated on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Local transformation: position, rotation (as quaternion), and scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Drawable payload of a node. Either part may be missing in malformed assets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub material: Option<MaterialSlot>,
    pub geometry: Option<Geometry>,
}

pub trait SceneNode {
    fn id(&self) -> NodeId;

    fn name(&self) -> Option<&str>;

    fn get_local_transform(&self) -> &Transform;

    fn set_local_transform(&mut self, transform: Transform);

    /// `Some` for drawable nodes only.
    fn mesh(&self) -> Option<&Mesh>;

    fn mesh_mut(&mut self) -> Option<&mut Mesh>;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);
}

impl<'a> dyn SceneNode + 'a {
    /// Visits `self` and then every descendant, depth first in child order.
    pub fn traverse(&self, visit: &mut dyn FnMut(&dyn SceneNode)) {
        visit(self);
        for child in self.get_children() {
            child.traverse(visit);
        }
    }

    pub fn traverse_mut(&mut self, visit: &mut dyn FnMut(&mut dyn SceneNode)) {
        visit(&mut *self);
        for child in self.get_children_mut() {
            child.traverse_mut(visit);
        }
    }

    /// Number of drawable nodes in this subtree.
    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if node.mesh().is_some() {
                count += 1;
            }
        });
        count
    }

    pub fn find(&self, id: NodeId) -> Option<&dyn SceneNode> {
        if self.id() == id {
            return Some(self);
        }
        self.get_children().iter().find_map(|child| child.find(id))
    }
}

impl Debug for dyn SceneNode + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("mesh", &self.mesh().is_some())
            .field("children", &self.get_children().len())
            .finish()
    }
}

pub struct ContainerNode {
    id: NodeId,
    name: Option<String>,
    transform: Transform,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl ContainerNode {
    pub fn new(name: Option<String>) -> Self {
        Self {
            id: NodeId::new(),
            name,
            transform: Transform::default(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: Option<String>, children: Vec<Box<dyn SceneNode>>) -> Self {
        Self {
            children,
            ..Self::new(name)
        }
    }
}

impl SceneNode for ContainerNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn get_local_transform(&self) -> &Transform {
        &self.transform
    }

    fn set_local_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn mesh(&self) -> Option<&Mesh> {
        None
    }

    fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        None
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }
}

pub struct MeshNode {
    id: NodeId,
    name: Option<String>,
    transform: Transform,
    mesh: Mesh,
    children: Vec<Box<dyn SceneNode>>,
}

impl MeshNode {
    pub fn new(name: Option<String>, mesh: Mesh) -> Self {
        Self {
            id: NodeId::new(),
            name,
            transform: Transform::default(),
            mesh,
            children: Vec::new(),
        }
    }
}

impl SceneNode for MeshNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn get_local_transform(&self) -> &Transform {
        &self.transform
    }

    fn set_local_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn mesh(&self) -> Option<&Mesh> {
        Some(&self.mesh)
    }

    fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        Some(&mut self.mesh)
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }
}
