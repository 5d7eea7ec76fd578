/// Vertex and index buffers of a single drawable primitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new(positions: Vec<[f32; 3]>, indices: Option<Vec<u32>>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            indices,
        }
    }

    pub fn vertex_count(&self) -> u64 {
        self.positions.len() as u64
    }

    /**
     * Number of elements that make up triangles: the index count for indexed
     * geometry, the position count otherwise. Divide the sum over a scene by
     * three to get its triangle count.
     */
    pub fn triangle_elements(&self) -> u64 {
        match &self.indices {
            Some(indices) => indices.len() as u64,
            None => self.positions.len() as u64,
        }
    }
}
