//! # Chunk Iteration Module
//!
//! This module provides an iterator over the solid blocks of a chunk. It walks the
//! padded solidity bit vector in storage order and skips the padding cells, so
//! empty blocks are rejected with a bit test instead of a block lookup.

use cgmath::Point3;

use crate::voxels::block::Block;

use super::{ChunkVoxels, CHUNK_DIMENSION, CHUNK_DIMENSION_WRAPPED, CHUNK_PLANE_SIZE_WRAPPED};

/// An iterator over all solid blocks in a chunk.
///
/// Yields the chunk-local position of each solid block together with the block,
/// in storage order (x fastest, then y, then z).
pub struct ChunkBlockIterator<'a> {
    /// Reference to the voxel grid being iterated over
    chunk_ref: &'a ChunkVoxels,
    /// Current chunk-local position (0..CHUNK_DIMENSION)
    local_x: usize,
    local_y: usize,
    local_z: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new iterator positioned at the first block of the chunk.
    pub fn new(chunk_ref: &'a ChunkVoxels) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    fn advance(&mut self) {
        let dimension = CHUNK_DIMENSION as usize;
        self.local_x += 1;
        if self.local_x == dimension {
            self.local_x = 0;
            self.local_y += 1;
            if self.local_y == dimension {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<usize>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let dimension = CHUNK_DIMENSION as usize;

        while self.local_z < dimension {
            let (x, y, z) = (self.local_x, self.local_y, self.local_z);
            self.advance();

            let padded_index =
                (x + 1) + CHUNK_DIMENSION_WRAPPED * (y + 1) + CHUNK_PLANE_SIZE_WRAPPED * (z + 1);
            if self.chunk_ref.solid_array[padded_index] {
                let block = &self.chunk_ref.blocks[x + dimension * y + dimension * dimension * z];
                return Some((Point3::new(x, y, z), block));
            }
        }

        None
    }
}
