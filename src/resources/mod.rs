use std::path::Path;

use instant::Instant;

use crate::{
    data_structures::{
        geometry::Geometry,
        material::{MaterialSlot, StandardMaterial},
        scene_graph::{ContainerNode, Mesh, MeshNode, SceneNode, Transform},
    },
    error::ViewerError,
    resources::texture::{load_binary, relative_to, texture_info},
};

/**
 * This module contains all logic for loading models and the resources they reference.
 */
pub mod texture;

/// Loads a `.gltf` or `.glb` model into a scene graph.
///
/// Buffers and images the document references by uri are resolved relative to
/// `url`. Images that cannot be fetched or decoded leave their texture slots
/// empty, so a missing texture never fails the whole load.
pub async fn load_model_gltf(url: &str, assets_dir: &Path) -> anyhow::Result<Box<dyn SceneNode>> {
    let started = Instant::now();
    let bytes = load_binary(url, assets_dir).await?;
    let gltf = gltf::Gltf::from_slice(&bytes).map_err(ViewerError::Parse)?;

    // Load buffers
    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("{} references a missing GLB binary chunk", url))?;
                buffer_data.push(blob.into());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(&relative_to(url, uri), assets_dir).await?;
                buffer_data.push(bin);
            }
        }
    }

    // Probe images
    let mut textures = Vec::new();
    for image in gltf.images() {
        let info = match image.source() {
            gltf::image::Source::View { view, .. } => {
                let start = view.offset();
                let end = start + view.length();
                match buffer_data
                    .get(view.buffer().index())
                    .and_then(|buffer| buffer.get(start..end))
                {
                    Some(bytes) => texture_info(image.name(), bytes),
                    None => {
                        log::warn!("Image {} of {} lies outside its buffer", image.index(), url);
                        None
                    }
                }
            }
            gltf::image::Source::Uri { uri, .. } => {
                match load_binary(&relative_to(url, uri), assets_dir).await {
                    Ok(bytes) => texture_info(image.name().or(Some(uri)), &bytes),
                    Err(e) => {
                        log::warn!("Texture {} of {} could not be loaded: {}", uri, url, e);
                        None
                    }
                }
            }
        };
        textures.push(info);
    }

    // Load materials
    let texture_of = |texture: gltf::Texture| {
        textures
            .get(texture.source().index())
            .cloned()
            .flatten()
    };
    let materials: Vec<StandardMaterial> = gltf
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            let metallic_roughness = pbr
                .metallic_roughness_texture()
                .and_then(|info| texture_of(info.texture()));
            StandardMaterial {
                name: material.name().map(str::to_string),
                base_color: pbr.base_color_factor(),
                metalness: pbr.metallic_factor(),
                roughness: pbr.roughness_factor(),
                map: pbr
                    .base_color_texture()
                    .and_then(|info| texture_of(info.texture())),
                normal_map: material
                    .normal_texture()
                    .and_then(|info| texture_of(info.texture())),
                // one packed texture drives both channels
                roughness_map: metallic_roughness.clone(),
                metalness_map: metallic_roughness,
                ao_map: material
                    .occlusion_texture()
                    .and_then(|info| texture_of(info.texture())),
                ..Default::default()
            }
        })
        .collect();

    let scene = gltf.default_scene().or_else(|| gltf.scenes().next());
    let mut models: Vec<Box<dyn SceneNode>> = match scene {
        Some(scene) => scene
            .nodes()
            .map(|node| to_scene_node(node, &buffer_data, &materials))
            .collect(),
        None => {
            log::warn!("{} contains no scene", url);
            Vec::new()
        }
    };

    let root_node: Box<dyn SceneNode> = if models.len() == 1 {
        models.remove(0)
    } else {
        Box::new(ContainerNode::with_children(None, models))
    };

    log::info!(
        "Loaded {} ({} bytes, {} meshes) in {:?}",
        url,
        bytes.len(),
        root_node.mesh_count(),
        started.elapsed()
    );
    Ok(root_node)
}

/**
 * Converts a glTF node and its children. A node whose mesh has a single
 * primitive becomes a `MeshNode`; otherwise it becomes a `ContainerNode` with
 * one `MeshNode` child per primitive.
 */
pub fn to_scene_node(
    node: gltf::scene::Node,
    buf: &[Vec<u8>],
    mats: &[StandardMaterial],
) -> Box<dyn SceneNode> {
    let name = node.name().map(str::to_string);
    let mut meshes: Vec<MeshNode> = match node.mesh() {
        Some(mesh) => mesh
            .primitives()
            .map(|primitive| {
                let material = primitive
                    .material()
                    .index()
                    .and_then(|idx| mats.get(idx))
                    .cloned()
                    .unwrap_or_default();
                let mesh = Mesh {
                    material: Some(MaterialSlot::from(material)),
                    geometry: Some(read_geometry(&primitive, buf)),
                };
                MeshNode::new(mesh_name(&name, primitive.index()), mesh)
            })
            .collect(),
        None => Vec::new(),
    };

    let mut scene_node: Box<dyn SceneNode> = if meshes.len() == 1 {
        Box::new(meshes.remove(0))
    } else {
        let children = meshes
            .into_iter()
            .map(|mesh| Box::new(mesh) as Box<dyn SceneNode>)
            .collect();
        Box::new(ContainerNode::with_children(name, children))
    };

    let (position, [x, y, z, w], scale) = node.transform().decomposed();
    scene_node.set_local_transform(Transform {
        position: position.into(),
        rotation: cgmath::Quaternion::new(w, x, y, z),
        scale: scale.into(),
    });
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buf, mats));
    }
    scene_node
}

// primitives after the first get a suffix so names stay distinct
fn mesh_name(node_name: &Option<String>, primitive: usize) -> Option<String> {
    node_name.as_ref().map(|name| match primitive {
        0 => name.clone(),
        idx => format!("{}_{}", name, idx),
    })
}

fn read_geometry(primitive: &gltf::Primitive, buf: &[Vec<u8>]) -> Geometry {
    let reader = primitive.reader(|buffer| buf.get(buffer.index()).map(Vec::as_slice));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .map(|positions| positions.collect())
        .unwrap_or_default();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|normals| normals.collect())
        .unwrap_or_default();
    let indices = reader
        .read_indices()
        .map(|indices| indices.into_u32().collect::<Vec<u32>>());
    if positions.is_empty() {
        log::warn!("Primitive {} has no positions", primitive.index());
    }
    Geometry {
        positions,
        normals,
        indices,
    }
}
