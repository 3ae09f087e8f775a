//! Visibility-culled mesh generation.
//!
//! This module converts a chunk's voxel grid into flat vertex, UV and index
//! buffers. Only faces that separate a solid block from empty space (or from the
//! chunk boundary) are emitted, so fully enclosed blocks cost nothing.
//!
//! # Architecture
//! - `mesh/`: the [`ChunkMesh`] buffers and the per-face index layout
//! - [`build_culled_mesh`]: the walk over a chunk's solid blocks

use log::trace;

use crate::voxels::block::block_side::BlockSide;
use crate::voxels::chunk::ChunkVoxels;

mod mesh;

pub use mesh::*;

/// Builds the culled mesh of a chunk.
///
/// Solid blocks are visited in storage order and their faces in `BlockSide` order,
/// so the same voxels always produce byte-identical buffers. A face is emitted when
/// the neighbouring cell across it is empty or lies outside the chunk.
pub fn build_culled_mesh(voxels: &ChunkVoxels) -> ChunkMesh {
    let mut mesh = ChunkMesh::new();

    for (local, block) in voxels.solid_blocks() {
        let adjacent = voxels.generate_adjacent_blocks(local.x, local.y, local.z);

        for side in BlockSide::all() {
            if !adjacent[side as usize] {
                mesh.add_face(block.get_face(side));
            }
        }
    }

    trace!(
        "Meshed chunk {:?}: {} faces, {} vertices",
        voxels.position(),
        mesh.face_count(),
        mesh.vertices().len()
    );

    mesh
}
