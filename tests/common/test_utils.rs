#![allow(dead_code)]

use std::path::PathBuf;

use base64::Engine;
use serde_json::{Value, json};
use viewer_ngin::data_structures::{
    geometry::Geometry,
    material::{MaterialSlot, StandardMaterial},
    scene_graph::{ContainerNode, Mesh, MeshNode, NodeId, SceneNode},
    texture::TextureInfo,
};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// Assembles small glTF documents in memory, either as `.glb` bytes or as a
/// `.gltf` JSON document with its buffer embedded or external.
#[derive(Default)]
pub struct GltfBuilder {
    bin: Vec<u8>,
    buffer_views: Vec<Value>,
    accessors: Vec<Value>,
    images: Vec<Value>,
    textures: Vec<Value>,
    materials: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_view(&mut self, bytes: &[u8], target: Option<u32>) -> usize {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        let mut view = json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        });
        if let Some(target) = target {
            view["target"] = json!(target);
        }
        self.bin.extend_from_slice(bytes);
        self.buffer_views.push(view);
        self.buffer_views.len() - 1
    }

    pub fn positions(&mut self, positions: &[[f32; 3]]) -> usize {
        let bytes: Vec<u8> = positions
            .iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let view = self.push_view(&bytes, Some(ARRAY_BUFFER));
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for position in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }
        self.accessors.push(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": positions.len(),
            "type": "VEC3",
            "min": min,
            "max": max,
        }));
        self.accessors.len() - 1
    }

    pub fn indices(&mut self, indices: &[u32]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, Some(ELEMENT_ARRAY_BUFFER));
        self.accessors.push(json!({
            "bufferView": view,
            "componentType": UNSIGNED_INT,
            "count": indices.len(),
            "type": "SCALAR",
        }));
        self.accessors.len() - 1
    }

    /// Embeds a blank PNG of the given size and returns its texture index.
    pub fn png_texture(&mut self, width: u32, height: u32) -> usize {
        let mut png = Vec::new();
        image::RgbaImage::new(width, height)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("failed to encode png");
        let view = self.push_view(&png, None);
        self.images
            .push(json!({ "bufferView": view, "mimeType": "image/png" }));
        self.textures.push(json!({ "source": self.images.len() - 1 }));
        self.textures.len() - 1
    }

    /// References an image file next to the document.
    pub fn external_texture(&mut self, uri: &str) -> usize {
        self.images.push(json!({ "uri": uri }));
        self.textures.push(json!({ "source": self.images.len() - 1 }));
        self.textures.len() - 1
    }

    pub fn material(
        &mut self,
        metallic: f32,
        roughness: f32,
        base_color_texture: Option<usize>,
        metallic_roughness_texture: Option<usize>,
    ) -> usize {
        let mut pbr = json!({
            "metallicFactor": metallic,
            "roughnessFactor": roughness,
        });
        if let Some(texture) = base_color_texture {
            pbr["baseColorTexture"] = json!({ "index": texture });
        }
        if let Some(texture) = metallic_roughness_texture {
            pbr["metallicRoughnessTexture"] = json!({ "index": texture });
        }
        self.materials.push(json!({ "pbrMetallicRoughness": pbr }));
        self.materials.len() - 1
    }

    /// One primitive per `(positions, indices, material)` triple.
    pub fn mesh(&mut self, primitives: &[(usize, Option<usize>, Option<usize>)]) -> usize {
        let primitives: Vec<Value> = primitives
            .iter()
            .map(|&(positions, indices, material)| {
                let mut primitive = json!({ "attributes": { "POSITION": positions } });
                if let Some(indices) = indices {
                    primitive["indices"] = json!(indices);
                }
                if let Some(material) = material {
                    primitive["material"] = json!(material);
                }
                primitive
            })
            .collect();
        self.meshes.push(json!({ "primitives": primitives }));
        self.meshes.len() - 1
    }

    pub fn node(&mut self, name: &str, mesh: Option<usize>, children: &[usize]) -> usize {
        let mut node = json!({ "name": name });
        if let Some(mesh) = mesh {
            node["mesh"] = json!(mesh);
        }
        if !children.is_empty() {
            node["children"] = json!(children);
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn translate(&mut self, node: usize, translation: [f32; 3]) {
        self.nodes[node]["translation"] = json!(translation);
    }

    fn document(&self, roots: &[usize], buffer_uri: Option<String>) -> Value {
        let mut doc = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": roots }],
        });
        let sections = [
            ("nodes", &self.nodes),
            ("meshes", &self.meshes),
            ("accessors", &self.accessors),
            ("bufferViews", &self.buffer_views),
            ("materials", &self.materials),
            ("images", &self.images),
            ("textures", &self.textures),
        ];
        for (key, values) in sections {
            if !values.is_empty() {
                doc[key] = json!(values);
            }
        }
        if !self.bin.is_empty() {
            let mut buffer = json!({ "byteLength": self.bin.len() });
            if let Some(uri) = buffer_uri {
                buffer["uri"] = json!(uri);
            }
            doc["buffers"] = json!([buffer]);
        }
        doc
    }

    pub fn build_glb(&self, roots: &[usize]) -> Vec<u8> {
        let mut json_chunk = serde_json::to_vec(&self.document(roots, None)).unwrap();
        while json_chunk.len() % 4 != 0 {
            json_chunk.push(b' ');
        }
        let mut bin_chunk = self.bin.clone();
        while bin_chunk.len() % 4 != 0 {
            bin_chunk.push(0);
        }

        let mut total = 12 + 8 + json_chunk.len();
        if !bin_chunk.is_empty() {
            total += 8 + bin_chunk.len();
        }
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(GLB_MAGIC);
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        glb.extend_from_slice(&json_chunk);
        if !bin_chunk.is_empty() {
            glb.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
            glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            glb.extend_from_slice(&bin_chunk);
        }
        glb
    }

    /// `.gltf` document carrying its buffer as a base64 data uri.
    pub fn build_embedded_gltf(&self, roots: &[usize]) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bin);
        let uri = format!("data:application/octet-stream;base64,{}", encoded);
        serde_json::to_string(&self.document(roots, Some(uri))).unwrap()
    }

    /// `.gltf` document whose buffer lives in `bin_uri`, plus the bytes of that file.
    pub fn build_external_gltf(&self, roots: &[usize], bin_uri: &str) -> (String, Vec<u8>) {
        let doc = self.document(roots, Some(bin_uri.to_string()));
        (serde_json::to_string(&doc).unwrap(), self.bin.clone())
    }
}

/// A fresh, empty directory below the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("viewer-ngin-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

/// Writes `bytes` to a new temp file named `file_name` and returns its path as a url.
pub fn write_temp(file_name: &str, bytes: &[u8]) -> String {
    let path = temp_dir().join(file_name);
    std::fs::write(&path, bytes).expect("failed to write fixture");
    path.to_str().expect("temp path is not utf-8").to_string()
}

/// A quad (two indexed triangles) and a lone unindexed triangle.
///
/// The quad's material has a 4x2 base colour texture and an 8x8 packed
/// metallic-roughness texture, the triangle has no material.
/// Totals: 7 vertices, 3 triangles, 32 + 2 * 256 = 544 bytes of textures.
pub fn quad_and_triangle() -> (GltfBuilder, Vec<usize>) {
    let mut builder = GltfBuilder::new();
    let quad = builder.positions(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ]);
    let quad_indices = builder.indices(&[0, 1, 2, 0, 2, 3]);
    let triangle = builder.positions(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
    let base_color = builder.png_texture(4, 2);
    let metallic_roughness = builder.png_texture(8, 8);
    let material = builder.material(0.8, 0.2, Some(base_color), Some(metallic_roughness));

    let quad_mesh = builder.mesh(&[(quad, Some(quad_indices), Some(material))]);
    let triangle_mesh = builder.mesh(&[(triangle, None, None)]);
    let quad_node = builder.node("quad", Some(quad_mesh), &[]);
    let triangle_node = builder.node("triangle", Some(triangle_mesh), &[]);
    (builder, vec![quad_node, triangle_node])
}

pub fn standard(metalness: f32, roughness: f32) -> StandardMaterial {
    StandardMaterial {
        metalness,
        roughness,
        ..Default::default()
    }
}

pub fn mesh_node(material: Option<StandardMaterial>, geometry: Geometry) -> Box<dyn SceneNode> {
    Box::new(MeshNode::new(
        None,
        Mesh {
            material: material.map(MaterialSlot::from),
            geometry: Some(geometry),
        },
    ))
}

fn triangle() -> Vec<[f32; 3]> {
    vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
}

/**
 * Builds a hand-made scene:
 *
 * - root
 *   - mesh (metalness 0.8, roughness 0.2, 512x512 base colour map), quad with 6 indices
 *   - group
 *     - mesh (metalness 0.3, roughness 0.6), unindexed triangle
 *   - mesh without material, unindexed triangle
 *
 * Totals: 10 vertices, 12 elements (4 triangles), 1 MiB of textures.
 */
pub fn sample_scene() -> Box<dyn SceneNode> {
    let textured = StandardMaterial {
        map: Some(TextureInfo::new(Some("albedo".to_string()), 512, 512)),
        ..standard(0.8, 0.2)
    };
    let quad = Geometry::new(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        Some(vec![0, 1, 2, 0, 2, 3]),
    );
    let group = ContainerNode::with_children(
        Some("group".to_string()),
        vec![mesh_node(Some(standard(0.3, 0.6)), Geometry::new(triangle(), None))],
    );
    Box::new(ContainerNode::with_children(
        Some("root".to_string()),
        vec![
            mesh_node(Some(textured), quad),
            Box::new(group),
            mesh_node(None, Geometry::new(triangle(), None)),
        ],
    ))
}

/// Ids and current materials of every mesh that has one, in traversal order.
pub fn materials(scene: &dyn SceneNode) -> Vec<(NodeId, MaterialSlot)> {
    let mut out = Vec::new();
    scene.traverse(&mut |node| {
        if let Some(material) = node.mesh().and_then(|mesh| mesh.material.clone()) {
            out.push((node.id(), material));
        }
    });
    out
}

/// Metalness and roughness of the first material of every mesh that has one.
pub fn metal_rough(scene: &dyn SceneNode) -> Vec<(Option<f32>, Option<f32>)> {
    materials(scene)
        .iter()
        .map(|(_, slot)| {
            let first = slot.iter().next().expect("empty material slot");
            (first.metalness(), first.roughness())
        })
        .collect()
}

/// Clears the dirty flag everywhere, as a renderer would after an upload.
pub fn mark_all_clean(scene: &mut dyn SceneNode) {
    scene.traverse_mut(&mut |node| {
        if let Some(material) = node.mesh_mut().and_then(|mesh| mesh.material.as_mut()) {
            material.iter_mut().for_each(|m| m.mark_clean());
        }
    });
}
