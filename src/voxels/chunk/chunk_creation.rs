//! # Chunk Creation Module
//!
//! This module provides the builder used to fill a chunk's voxel grid. Block types
//! are pushed one at a time in storage order (x fastest, then y, then z); the
//! builder tracks the current position, constructs each `Block` at its world-space
//! position and keeps the padded solidity bit vector in step with the block grid.

use bitvec::prelude::BitVec;
use cgmath::{Point3, Vector3};

use crate::voxels::block::{block_type::BlockType, Block};

use super::{
    block_offset, ChunkVoxels, CHUNK_DIMENSION, CHUNK_DIMENSION_WRAPPED, CHUNK_PLANE_SIZE_WRAPPED,
    CHUNK_SIZE, CHUNK_SIZE_WRAPPED,
};

/// A builder for populating the voxel grid of one chunk.
///
/// # Panics
/// [`ChunkCreationIterator::push_block_type`] panics if more than `CHUNK_SIZE` blocks
/// are pushed, and [`ChunkCreationIterator::return_chunk`] panics if fewer were.
pub struct ChunkCreationIterator {
    /// The chunk position of the chunk being created
    position: Point3<i32>,
    /// World-space position of the chunk's first block
    block_offset: Vector3<i32>,
    /// Padded solidity bits, all padding cells stay `false`
    solid_array: BitVec,
    blocks: Vec<Block>,
    /// Current chunk-local position (0..CHUNK_DIMENSION)
    local_x: usize,
    local_y: usize,
    local_z: usize,
}

impl ChunkCreationIterator {
    /// Creates a new builder for the chunk at the given chunk position.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            position,
            block_offset: block_offset(position),
            solid_array: BitVec::repeat(false, CHUNK_SIZE_WRAPPED),
            blocks: Vec::with_capacity(CHUNK_SIZE as usize),
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// The chunk-local position the next pushed block will occupy.
    pub fn next_local_position(&self) -> Point3<i32> {
        Point3::new(self.local_x as i32, self.local_y as i32, self.local_z as i32)
    }

    /// The world-space position the next pushed block will occupy.
    pub fn next_world_position(&self) -> Point3<i32> {
        self.next_local_position() + self.block_offset
    }

    /// Adds a block at the current position and advances to the next one.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        assert!(
            self.blocks.len() < CHUNK_SIZE as usize,
            "chunk {:?} is already full",
            self.position
        );

        if block_type.is_solid() {
            let padded_index = (self.local_x + 1)
                + CHUNK_DIMENSION_WRAPPED * (self.local_y + 1)
                + CHUNK_PLANE_SIZE_WRAPPED * (self.local_z + 1);
            self.solid_array.set(padded_index, true);
        }
        self.blocks
            .push(Block::new(self.next_world_position(), block_type));

        // Move to the next position
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

    /// Finalizes the grid.
    pub fn return_chunk(self) -> ChunkVoxels {
        assert_eq!(
            self.blocks.len(),
            CHUNK_SIZE as usize,
            "chunk {:?} is incomplete",
            self.position
        );

        ChunkVoxels {
            position: self.position,
            solid_array: self.solid_array,
            blocks: self.blocks,
        }
    }
}
