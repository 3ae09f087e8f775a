//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! 16x16x16 blocks of voxel data: terrain generation, the voxel grid, and the
//! lifecycle of a chunk's GPU mesh.
//!
//! ## Lifecycle
//!
//! A chunk is generated in two stages:
//! 1. [`GeneratedChunk::generate`] is a pure function of the chunk position. It builds
//!    the heightmap, classifies every voxel and assembles the culled mesh buffers.
//! 2. [`Chunk::upload`] hands the buffers to a [`MeshUploader`] and produces the
//!    renderable chunk.
//!
//! [`Chunk::new`] runs both stages back to back. Splitting them lets the pure stage
//! run on a worker thread while the upload stays on the thread that owns the GPU.
//!
//! ## Neighbour Lookups
//!
//! Besides the dense block grid, the voxel grid keeps a padded bit vector of
//! solidity with one extra layer of cells on every side. The padding is never
//! solid, so faces on the chunk boundary are always visible and neighbour lookups
//! never need a bounds check. Occlusion by neighbouring chunks is not modelled.

use bitvec::prelude::BitVec;
use cgmath::{Point3, Vector3};
use log::trace;
use web_time::Instant;

use chunk_iteration::ChunkBlockIterator;
use terrain::TerrainGenerator;

use super::block::block_side::BlockSide;
use super::block::Block;
use crate::rendering::meshing::{build_culled_mesh, ChunkMesh};
use crate::rendering::{GpuMesh, MeshUploader, TextureHandle};

pub mod chunk_creation;
pub mod chunk_iteration;
pub mod terrain;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;
/// The dimension of a chunk including an extra layer of blocks on each side for neighbor lookups.
pub const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;
/// The number of blocks in a wrapped 2D chunk plane.
pub const CHUNK_PLANE_SIZE_WRAPPED: usize = CHUNK_DIMENSION_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// The total number of blocks in a wrapped chunk.
pub const CHUNK_SIZE_WRAPPED: usize = CHUNK_PLANE_SIZE_WRAPPED * CHUNK_DIMENSION_WRAPPED;

/// Smallest chunk coordinate whose blocks all have `i32` world positions.
pub const MIN_CHUNK_COORDINATE: i32 = i32::MIN / CHUNK_DIMENSION;
/// Largest chunk coordinate whose blocks all have `i32` world positions.
pub const MAX_CHUNK_COORDINATE: i32 = i32::MAX / CHUNK_DIMENSION;

/// Whether every block of the chunk at `position` has an `i32` world position.
pub fn is_valid_chunk_position(position: Point3<i32>) -> bool {
    let range = MIN_CHUNK_COORDINATE..=MAX_CHUNK_COORDINATE;
    range.contains(&position.x) && range.contains(&position.y) && range.contains(&position.z)
}

/// Converts a chunk position into the world-space position of its `(0, 0, 0)` block.
///
/// `position` must satisfy [`is_valid_chunk_position`].
pub fn block_offset(position: Point3<i32>) -> Vector3<i32> {
    Vector3::new(position.x, position.y, position.z) * CHUNK_DIMENSION
}

/// Converts a world-space position into the position of the chunk containing it.
///
/// Positions beyond the representable world are clamped to the outermost valid
/// chunk on each axis; NaN maps to chunk 0.
pub fn world_to_chunk_position(world_position: Point3<f32>) -> Point3<i32> {
    let dimension = CHUNK_DIMENSION as f32;
    let to_chunk = |coordinate: f32| {
        ((coordinate / dimension).floor() as i32).clamp(MIN_CHUNK_COORDINATE, MAX_CHUNK_COORDINATE)
    };
    Point3::new(
        to_chunk(world_position.x),
        to_chunk(world_position.y),
        to_chunk(world_position.z),
    )
}

/// The fully classified blocks of one chunk.
///
/// Blocks are stored densely with x varying fastest, then y, then z.
#[derive(Clone, Debug)]
pub struct ChunkVoxels {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    position: Point3<i32>,

    /// Solidity of every block plus a one-block padding layer on each side.
    ///
    /// Indexed by `x + CHUNK_DIMENSION_WRAPPED * y + CHUNK_PLANE_SIZE_WRAPPED * z` in
    /// padded coordinates, where chunk-local `(0, 0, 0)` is padded `(1, 1, 1)`.
    solid_array: BitVec,

    /// Every block of the chunk, empty ones included.
    blocks: Vec<Block>,
}

impl ChunkVoxels {
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    pub fn block_offset(&self) -> Vector3<i32> {
        block_offset(self.position)
    }

    /// Gets a reference to the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn block_at(&self, cx: usize, cy: usize, cz: usize) -> &Block {
        let dimension = CHUNK_DIMENSION as usize;
        debug_assert!(cx < dimension && cy < dimension && cz < dimension);
        &self.blocks[cx + dimension * cy + dimension * dimension * cz]
    }

    /// Number of solid blocks in the chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Iterates over the solid blocks together with their chunk-local positions.
    pub fn solid_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Determines which faces of the block at (x,y,z) are hidden by a solid neighbour.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Chunk-local coordinates of the block
    ///
    /// # Returns
    /// An array of 6 booleans indexed by `BlockSide as usize`. A face whose neighbour
    /// lies outside the chunk is never occluded.
    pub fn generate_adjacent_blocks(&self, x: usize, y: usize, z: usize) -> [bool; 6] {
        // Shift into padded coordinates
        let i = x + 1;
        let j = y + 1;
        let k = z + 1;

        let mut adjacency_data = [false; 6];
        adjacency_data[BlockSide::FRONT as usize] = self.is_block_solid(i, j, k + 1);
        adjacency_data[BlockSide::BACK as usize] = self.is_block_solid(i, j, k - 1);
        adjacency_data[BlockSide::LEFT as usize] = self.is_block_solid(i - 1, j, k);
        adjacency_data[BlockSide::RIGHT as usize] = self.is_block_solid(i + 1, j, k);
        adjacency_data[BlockSide::TOP as usize] = self.is_block_solid(i, j + 1, k);
        adjacency_data[BlockSide::BOTTOM as usize] = self.is_block_solid(i, j - 1, k);
        adjacency_data
    }

    /// Checks if the block at the specified padded coordinates is solid.
    ///
    /// Padded coordinates are chunk-local coordinates plus one; 0 and 17 address the
    /// empty padding layer.
    ///
    /// # Returns
    /// `true` if the block is solid, `false` if it's empty or in the padding layer.
    pub(crate) fn is_block_solid(&self, cx: usize, cy: usize, cz: usize) -> bool {
        self.solid_array[cx + CHUNK_DIMENSION_WRAPPED * cy + CHUNK_PLANE_SIZE_WRAPPED * cz]
    }
}

/// The CPU-side result of generating a chunk: its voxels and mesh buffers.
///
/// This is plain data and can be produced on any thread.
#[derive(Clone, Debug)]
pub struct GeneratedChunk {
    pub voxels: ChunkVoxels,
    pub mesh: ChunkMesh,
}

impl GeneratedChunk {
    /// Generates the terrain of a chunk and builds its culled mesh.
    ///
    /// The result depends only on `position` and the generator, so repeated calls
    /// produce identical buffers.
    pub fn generate(position: Point3<i32>, terrain: &TerrainGenerator) -> Self {
        let start = Instant::now();

        let voxels = terrain.generate_voxels(position);
        let mesh = build_culled_mesh(&voxels);

        trace!(
            "Generated chunk {:?}: {} solid blocks, {} faces in {:?}",
            position,
            voxels.solid_count(),
            mesh.face_count(),
            start.elapsed()
        );

        GeneratedChunk { voxels, mesh }
    }

    pub fn position(&self) -> Point3<i32> {
        self.voxels.position
    }
}

/// Represents a fully generated, renderable 16x16x16 region of the world.
///
/// A `Chunk` is never partially built: it only exists once its mesh has been handed
/// to the GPU. Its contents never change afterwards. Call [`Chunk::delete`] to free
/// the GPU resources.
pub struct Chunk {
    voxels: ChunkVoxels,
    mesh: ChunkMesh,
    gpu_mesh: Box<dyn GpuMesh>,
}

impl Chunk {
    /// Generates the chunk at `position` and uploads its mesh.
    pub fn new(
        position: Point3<i32>,
        terrain: &TerrainGenerator,
        uploader: &mut dyn MeshUploader,
        texture: TextureHandle,
    ) -> Self {
        Self::upload(GeneratedChunk::generate(position, terrain), uploader, texture)
    }

    /// Uploads an already generated chunk and makes it renderable.
    pub fn upload(
        generated: GeneratedChunk,
        uploader: &mut dyn MeshUploader,
        texture: TextureHandle,
    ) -> Self {
        let gpu_mesh = uploader.upload(&generated.mesh, texture);
        Chunk {
            voxels: generated.voxels,
            mesh: generated.mesh,
            gpu_mesh,
        }
    }

    pub fn position(&self) -> Point3<i32> {
        self.voxels.position
    }

    pub fn block_offset(&self) -> Vector3<i32> {
        self.voxels.block_offset()
    }

    pub fn voxels(&self) -> &ChunkVoxels {
        &self.voxels
    }

    pub fn block_at(&self, cx: usize, cy: usize, cz: usize) -> &Block {
        self.voxels.block_at(cx, cy, cz)
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn face_count(&self) -> u32 {
        self.mesh.face_count()
    }

    /// Issues the draw call for this chunk.
    pub fn render(&self) {
        self.gpu_mesh.render();
    }

    /// Releases the chunk's GPU resources.
    pub fn delete(mut self) {
        self.gpu_mesh.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::block_type::BlockType;

    #[test]
    fn world_positions_floor_into_chunks() {
        assert_eq!(world_to_chunk_position(Point3::new(0.0, 0.0, 0.0)), Point3::new(0, 0, 0));
        assert_eq!(world_to_chunk_position(Point3::new(15.9, 16.0, 31.9)), Point3::new(0, 1, 1));
        assert_eq!(
            world_to_chunk_position(Point3::new(-0.1, -16.0, -16.1)),
            Point3::new(-1, -1, -2)
        );
    }

    #[test]
    fn far_world_positions_clamp_to_valid_chunks() {
        let far = world_to_chunk_position(Point3::new(3.0e9, -3.0e9, f32::MAX));
        assert_eq!(far, Point3::new(MAX_CHUNK_COORDINATE, MIN_CHUNK_COORDINATE, MAX_CHUNK_COORDINATE));
        assert!(is_valid_chunk_position(far));
        assert_eq!(world_to_chunk_position(Point3::new(f32::NAN, 0.0, 0.0)).x, 0);

        // The last block of the outermost chunks still fits in i32
        assert_eq!(block_offset(Point3::new(MAX_CHUNK_COORDINATE, 0, 0)).x + 15, i32::MAX);
        assert_eq!(block_offset(Point3::new(MIN_CHUNK_COORDINATE, 0, 0)).x, i32::MIN);
        assert!(!is_valid_chunk_position(Point3::new(0, MAX_CHUNK_COORDINATE + 1, 0)));
    }

    #[test]
    fn corner_blocks_see_the_chunk_boundary_as_empty() {
        let mut cci = chunk_creation::ChunkCreationIterator::new(Point3::new(0, 0, 0));
        for _ in 0..CHUNK_SIZE {
            cci.push_block_type(BlockType::ROCK);
        }
        let voxels = cci.return_chunk();

        let low = voxels.generate_adjacent_blocks(0, 0, 0);
        assert!(!low[BlockSide::LEFT as usize]);
        assert!(!low[BlockSide::BOTTOM as usize]);
        assert!(!low[BlockSide::BACK as usize]);
        assert!(low[BlockSide::RIGHT as usize]);
        assert!(low[BlockSide::TOP as usize]);
        assert!(low[BlockSide::FRONT as usize]);

        let high = voxels.generate_adjacent_blocks(15, 15, 15);
        assert!(high[BlockSide::LEFT as usize]);
        assert!(high[BlockSide::BOTTOM as usize]);
        assert!(high[BlockSide::BACK as usize]);
        assert!(!high[BlockSide::RIGHT as usize]);
        assert!(!high[BlockSide::TOP as usize]);
        assert!(!high[BlockSide::FRONT as usize]);

        // Padded (0,0,0) is padding, not the block at local (0,0,0)
        assert!(!voxels.is_block_solid(0, 0, 0));
        assert!(voxels.is_block_solid(1, 1, 1));
    }

    #[test]
    fn block_offset_scales_by_dimension() {
        assert_eq!(block_offset(Point3::new(1, -2, 3)), Vector3::new(16, -32, 48));
    }
}
