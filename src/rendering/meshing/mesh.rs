//! Mesh data structures for voxel rendering.
//!
//! A [`ChunkMesh`] holds the flat buffers of one chunk: vertex positions, atlas
//! UVs and triangle indices. Faces are appended one quad at a time and each quad
//! gets two triangles that reference only its own four vertices.

use crate::voxels::block::FaceData;

/// Triangle fan of a quad, relative to the quad's first vertex.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Vertex, UV and index buffers of a chunk mesh.
///
/// # Invariants
/// - `vertices.len() == uvs.len() == 4 * face_count`
/// - `indices.len() == 6 * face_count`
/// - every index is smaller than `vertices.len()`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    vertices: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    /// Number of quads emitted so far
    face_count: u32,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one face: its four vertices and UVs, then the six indices of its two
    /// triangles offset by the running base index.
    pub fn add_face(&mut self, face: &FaceData) {
        self.vertices.extend(face.vertices.map(Into::<[f32; 3]>::into));
        self.uvs.extend(face.uvs.map(Into::<[f32; 2]>::into));
        self.indices
            .extend_from_slice(&Self::generate_face_indices(self.face_count));
        self.face_count += 1;
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Returns
    /// The six indices of the face's two triangles.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        QUAD_INDICES.map(|index| index + base)
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.face_count * 2
    }

    pub fn is_empty(&self) -> bool {
        self.face_count == 0
    }

    /// The vertex buffer as raw bytes, for consumers that upload untyped buffers.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
