//! Texture atlas addressing.
//!
//! All block textures live in one square image split into
//! `ATLAS_TILES_PER_SIDE × ATLAS_TILES_PER_SIDE` tiles. Tiles are addressed by
//! `(column, row)` with row 0 at the top of the image, while UV space has `v = 0`
//! at the bottom, so rows are flipped when converting a slot into UVs.

use cgmath::Vector2;

/// Number of tiles along each edge of the texture atlas.
pub const ATLAS_TILES_PER_SIDE: u32 = 8;

/// A tile in the texture atlas, addressed by column and row from the top-left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasSlot {
    pub column: u32,
    pub row: u32,
}

impl AtlasSlot {
    pub const fn new(column: u32, row: u32) -> Self {
        AtlasSlot { column, row }
    }

    /// The four UV corners of this tile in the default atlas.
    pub fn uvs(self) -> [Vector2<f32>; 4] {
        block_slot_uv(self.column, self.row, ATLAS_TILES_PER_SIDE)
    }
}

/// Computes the UV rectangle of atlas tile `(column, row)` in an atlas of
/// `tiles_per_side × tiles_per_side` tiles.
///
/// Out-of-range columns and rows wrap around.
///
/// # Returns
/// The corners in top-left, top-right, bottom-right, bottom-left order, matching the
/// vertex order of the face geometry table.
pub fn block_slot_uv(column: u32, row: u32, tiles_per_side: u32) -> [Vector2<f32>; 4] {
    let size = tiles_per_side as f32;
    let x = (column % tiles_per_side) as f32;
    let y = (tiles_per_side - 1 - row % tiles_per_side) as f32;

    [
        Vector2::new(x / size, (y + 1.0) / size),
        Vector2::new((x + 1.0) / size, (y + 1.0) / size),
        Vector2::new((x + 1.0) / size, y / size),
        Vector2::new(x / size, y / size),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_slot_is_top_left_tile() {
        let uvs = block_slot_uv(0, 0, 8);
        assert_eq!(
            uvs,
            [
                Vector2::new(0.0, 1.0),
                Vector2::new(0.125, 1.0),
                Vector2::new(0.125, 0.875),
                Vector2::new(0.0, 0.875),
            ]
        );
    }

    #[test]
    fn last_row_reaches_v_zero() {
        let uvs = block_slot_uv(7, 7, 8);
        assert_eq!(uvs[1], Vector2::new(1.0, 0.125));
        assert_eq!(uvs[3], Vector2::new(0.875, 0.0));
    }

    #[test]
    fn slots_wrap_around() {
        assert_eq!(block_slot_uv(9, 10, 8), block_slot_uv(1, 2, 8));
    }

    #[test]
    fn default_atlas_matches_explicit_size() {
        assert_eq!(AtlasSlot::new(3, 0).uvs(), block_slot_uv(3, 0, ATLAS_TILES_PER_SIDE));
    }
}
