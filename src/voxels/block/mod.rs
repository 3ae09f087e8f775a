//! # Block Module
//!
//! This module provides the core block-related functionality: block type
//! definitions, the static face geometry and atlas tables, and the `Block`
//! structure which caches the world-space geometry of every face.

use cgmath::{Point3, Vector2};

use block_side::BlockSide;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod texture_atlas;

/// The geometry of one face of a block, ready to be appended to a mesh.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceData {
    /// World-space corners in top-left, top-right, bottom-right, bottom-left order.
    pub vertices: [Point3<f32>; 4],
    /// Atlas UVs for the corners, in the same order as `vertices`.
    pub uvs: [Vector2<f32>; 4],
}

/// Represents a single voxel block in the world.
///
/// A block is built once with its final position and type. All six faces are
/// translated and textured at construction, so meshing only copies cached data.
///
/// # Memory Layout
/// The cached faces are stored in an array indexed by `BlockSide as usize`.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// The world-space integer position of the block's centre.
    pub position: Point3<i32>,
    /// The type of this block.
    pub block_type: BlockType,
    faces: [FaceData; 6],
}

impl Block {
    /// Creates a new block of the specified type at a world-space position.
    ///
    /// # Arguments
    /// * `position` - The world-space position of the block
    /// * `block_type` - The type of block to create
    ///
    /// # Returns
    /// A new `Block` with the geometry of all six faces cached.
    pub fn new(position: Point3<i32>, block_type: BlockType) -> Self {
        let origin = Point3::new(position.x as f32, position.y as f32, position.z as f32);

        let faces = BlockSide::all().map(|side| FaceData {
            vertices: side.vertices().map(|corner| origin + corner),
            uvs: block_type.atlas_slot(side).uvs(),
        });

        Block {
            position,
            block_type,
            faces,
        }
    }

    /// Returns the cached geometry of one face.
    #[inline]
    pub fn get_face(&self, side: BlockSide) -> &FaceData {
        &self.faces[side as usize]
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.block_type.is_solid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_are_translated_by_position() {
        let block = Block::new(Point3::new(3, -2, 7), BlockType::ROCK);
        let front = block.get_face(BlockSide::FRONT);

        assert_eq!(front.vertices[0], Point3::new(2.5, -1.5, 7.5));
        assert_eq!(front.vertices[1], Point3::new(3.5, -1.5, 7.5));
        assert_eq!(front.vertices[2], Point3::new(3.5, -2.5, 7.5));
        assert_eq!(front.vertices[3], Point3::new(2.5, -2.5, 7.5));
    }

    #[test]
    fn faces_are_cached_in_side_order() {
        let block = Block::new(Point3::new(0, 0, 0), BlockType::GRASS);
        for side in BlockSide::all() {
            let expected_uvs = BlockType::GRASS.atlas_slot(side).uvs();
            assert_eq!(block.get_face(side).uvs, expected_uvs);
        }
    }

    #[test]
    fn solidity_follows_type() {
        assert!(!Block::new(Point3::new(0, 0, 0), BlockType::EMPTY).is_solid());
        assert!(Block::new(Point3::new(0, 0, 0), BlockType::GEM).is_solid());
    }
}
