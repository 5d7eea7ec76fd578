//! Viewer data structures: scene graph, materials, geometry and textures.
//!
//! - `scene_graph` holds the node hierarchy of a loaded model
//! - `material` contains the material kinds a mesh can show
//! - `geometry` contains vertex/index data used for statistics
//! - `texture` describes textures referenced by materials

pub mod geometry;
pub mod material;
pub mod scene_graph;
pub mod texture;
