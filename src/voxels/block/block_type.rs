//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the
//! texture atlas slot each type uses on each of its faces.

use super::block_side::BlockSide;
use super::texture_atlas::AtlasSlot;

/// Enumerates all possible block types in the voxel world.
///
/// The terrain generator assigns these by depth below the column surface:
/// `GRASS` on the surface, `DIRT` just below it, `ROCK` for the bulk of the ground
/// and `GEM` as a rare replacement for rock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// An empty block, which is non-solid and never rendered.
    EMPTY,

    /// The surface block of a terrain column.
    /// The top has its own texture, the sides and bottom share one.
    GRASS,

    /// The subsurface layer directly below the grass.
    DIRT,

    /// The bulk of the terrain below the subsurface layer.
    ROCK,

    /// A rare block scattered through the rock.
    GEM,
}

impl BlockType {
    /// Returns every block type, `EMPTY` first.
    pub fn all() -> [BlockType; 5] {
        [
            BlockType::EMPTY,
            BlockType::GRASS,
            BlockType::DIRT,
            BlockType::ROCK,
            BlockType::GEM,
        ]
    }

    /// Whether this block occupies space and hides the faces of its neighbours.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::EMPTY
    }

    /// Looks up the texture atlas tile used by the given face of this block type.
    ///
    /// The match is exhaustive over both enums, so a missing table entry is a
    /// compile error rather than a runtime failure.
    pub fn atlas_slot(self, side: BlockSide) -> AtlasSlot {
        match (self, side) {
            (BlockType::EMPTY, _) => AtlasSlot::new(0, 0),
            (BlockType::GRASS, BlockSide::TOP) => AtlasSlot::new(1, 0),
            (BlockType::GRASS, _) => AtlasSlot::new(2, 0),
            (BlockType::DIRT, _) => AtlasSlot::new(3, 0),
            (BlockType::ROCK, _) => AtlasSlot::new(4, 0),
            (BlockType::GEM, _) => AtlasSlot::new(5, 0),
        }
    }
}
