//! Terrain and cave generation.
//!
//! Every block is classified from two inputs: its world-space position and the
//! height of its terrain column. Column heights come from 2D noise sampled in world
//! space, so neighbouring chunks agree along their shared borders without looking
//! at each other.
//!
//! Below the surface and subsurface layers, caves are carved where the product of
//! two decorrelated 3D noise fields falls inside a narrow band. Multiplying the
//! fields gives sparser, more irregular voids than thresholding a single field.

use cgmath::{Point3, Vector3};

use crate::config::TerrainConfig;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::noise_source::{NoiseSource, SimplexNoise};

use super::chunk_creation::ChunkCreationIterator;
use super::{block_offset, ChunkVoxels, CHUNK_DIMENSION, CHUNK_SIZE};

/// Column heights of one chunk, indexed `[x][z]`.
pub type HeightMap = [[i32; CHUNK_DIMENSION as usize]; CHUNK_DIMENSION as usize];

/// Turns chunk positions into classified voxel grids.
pub struct TerrainGenerator {
    noise: Box<dyn NoiseSource>,
    config: TerrainConfig,
}

impl TerrainGenerator {
    pub fn new(noise: Box<dyn NoiseSource>, config: TerrainConfig) -> Self {
        TerrainGenerator { noise, config }
    }

    /// A generator backed by simplex noise seeded from `config.seed`.
    pub fn simplex(config: TerrainConfig) -> Self {
        Self::new(Box::new(SimplexNoise::new(config.seed)), config)
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Computes the terrain column height for every `(x, z)` of a chunk.
    ///
    /// # Arguments
    /// * `block_offset` - World-space position of the chunk's first block
    pub fn generate_height_map(&self, block_offset: Vector3<i32>) -> HeightMap {
        let mut height_map = [[0; CHUNK_DIMENSION as usize]; CHUNK_DIMENSION as usize];

        for (x, column) in height_map.iter_mut().enumerate() {
            for (z, height) in column.iter_mut().enumerate() {
                *height = self.column_height(block_offset.x + x as i32, block_offset.z + z as i32);
            }
        }

        height_map
    }

    /// The terrain height of the world-space column `(world_x, world_z)`.
    pub fn column_height(&self, world_x: i32, world_z: i32) -> i32 {
        let sample = self
            .noise
            .sample_2d(world_x as f32, world_z as f32, self.config.height_frequency);
        (sample / self.config.height_scale).floor() as i32
    }

    /// Decides the type of the block at `world_pos` in a column of height `column_height`.
    ///
    /// The first matching rule wins:
    /// 1. On the column surface: `GRASS`.
    /// 2. Within `subsurface_depth` blocks below the surface: `DIRT`.
    /// 3. Deeper: `EMPTY` if the cave density is inside the cave band, else `GEM` if
    ///    the rare field is below its threshold, else `ROCK`.
    /// 4. Above the surface: `EMPTY`.
    pub fn classify_voxel(&self, world_pos: Point3<i32>, column_height: i32) -> BlockType {
        let config = &self.config;
        let y = world_pos.y;

        if y == column_height {
            BlockType::GRASS
        } else if y < column_height && y >= column_height - config.subsurface_depth {
            BlockType::DIRT
        } else if y < column_height - config.subsurface_depth {
            if self.is_cave(world_pos) {
                BlockType::EMPTY
            } else if self.rare_sample(world_pos) < config.rare_threshold {
                BlockType::GEM
            } else {
                BlockType::ROCK
            }
        } else {
            BlockType::EMPTY
        }
    }

    /// The combined cave density at a world-space position.
    pub fn cave_density(&self, world_pos: Point3<i32>) -> f32 {
        let config = &self.config;
        let (x, y, z) = (world_pos.x as f32, world_pos.y as f32, world_pos.z as f32);
        let offset = config.cave_offset;

        let primary = self.noise.sample_3d(x, y, z, config.cave_primary_frequency)
            / config.noise_normalization;
        let secondary = self.noise.sample_3d(
            x + offset,
            y + offset,
            z + offset,
            config.cave_secondary_frequency,
        ) / config.noise_normalization;

        primary * secondary
    }

    fn is_cave(&self, world_pos: Point3<i32>) -> bool {
        let density = self.cave_density(world_pos);
        self.config.cave_band_low < density && density < self.config.cave_band_high
    }

    fn rare_sample(&self, world_pos: Point3<i32>) -> f32 {
        self.noise.sample_3d(
            world_pos.x as f32,
            world_pos.y as f32,
            world_pos.z as f32,
            self.config.rare_frequency,
        ) / self.config.noise_normalization
    }

    /// Generates and classifies every block of the chunk at `position`.
    pub fn generate_voxels(&self, position: Point3<i32>) -> ChunkVoxels {
        let height_map = self.generate_height_map(block_offset(position));
        let mut cci = ChunkCreationIterator::new(position);

        for _ in 0..CHUNK_SIZE {
            let local = cci.next_local_position();
            let column_height = height_map[local.x as usize][local.z as usize];
            let block_type = self.classify_voxel(cci.next_world_position(), column_height);
            cci.push_block_type(block_type);
        }

        cci.return_chunk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns fixed samples per field, told apart by frequency and offset.
    struct StubNoise {
        height: f32,
        cave_primary: f32,
        cave_secondary: f32,
        rare: f32,
    }

    impl NoiseSource for StubNoise {
        fn sample_2d(&self, _x: f32, _z: f32, _frequency: f32) -> f32 {
            self.height
        }

        fn sample_3d(&self, x: f32, _y: f32, _z: f32, frequency: f32) -> f32 {
            if x >= 500.0 {
                self.cave_secondary
            } else if frequency == 0.01 {
                self.cave_primary
            } else {
                self.rare
            }
        }
    }

    fn generator(cave_primary: f32, cave_secondary: f32, rare: f32) -> TerrainGenerator {
        TerrainGenerator::new(
            Box::new(StubNoise {
                height: 105.0,
                cave_primary,
                cave_secondary,
                rare,
            }),
            TerrainConfig::default(),
        )
    }

    fn at_height(y: i32) -> Point3<i32> {
        Point3::new(3, y, 4)
    }

    #[test]
    fn surface_and_subsurface_precede_caves() {
        let terrain = generator(128.0, 76.8, 0.0);
        assert_eq!(terrain.classify_voxel(at_height(10), 10), BlockType::GRASS);
        assert_eq!(terrain.classify_voxel(at_height(9), 10), BlockType::DIRT);
        assert_eq!(terrain.classify_voxel(at_height(8), 10), BlockType::DIRT);
        assert_eq!(terrain.classify_voxel(at_height(11), 10), BlockType::EMPTY);
        assert_eq!(terrain.classify_voxel(at_height(40), 10), BlockType::EMPTY);
    }

    #[test]
    fn in_band_density_carves_a_cave() {
        // 0.5 * 0.3 = 0.15, inside (0.1, 0.2)
        let terrain = generator(128.0, 76.8, 0.0);
        assert!((terrain.cave_density(at_height(5)) - 0.15).abs() < 1e-6);
        assert_eq!(terrain.classify_voxel(at_height(5), 10), BlockType::EMPTY);
    }

    #[test]
    fn out_of_band_density_with_low_rare_sample_is_rare() {
        // 0.5 * 0.5 = 0.25, outside the band; rare sample 0.01 < 0.05
        let terrain = generator(128.0, 128.0, 2.56);
        assert_eq!(terrain.classify_voxel(at_height(5), 10), BlockType::GEM);
    }

    #[test]
    fn out_of_band_density_with_high_rare_sample_is_bulk() {
        let terrain = generator(128.0, 128.0, 200.0);
        assert_eq!(terrain.classify_voxel(at_height(5), 10), BlockType::ROCK);
        assert_eq!(terrain.classify_voxel(at_height(7), 10), BlockType::ROCK);
    }

    #[test]
    fn band_bounds_are_exclusive() {
        // 0.5 * 0.5 = 0.25 exactly, sitting on either bound of the band
        let stub = || StubNoise {
            height: 105.0,
            cave_primary: 128.0,
            cave_secondary: 128.0,
            rare: 200.0,
        };
        let low = TerrainGenerator::new(
            Box::new(stub()),
            TerrainConfig {
                cave_band_low: 0.25,
                cave_band_high: 0.5,
                ..TerrainConfig::default()
            },
        );
        let high = TerrainGenerator::new(
            Box::new(stub()),
            TerrainConfig {
                cave_band_low: 0.0,
                cave_band_high: 0.25,
                ..TerrainConfig::default()
            },
        );

        assert_eq!(low.cave_density(at_height(5)), 0.25);
        assert_eq!(low.classify_voxel(at_height(5), 10), BlockType::ROCK);
        assert_eq!(high.classify_voxel(at_height(5), 10), BlockType::ROCK);
    }

    #[test]
    fn height_map_divides_and_floors() {
        let terrain = generator(0.0, 0.0, 0.0);
        let height_map = terrain.generate_height_map(Vector3::new(0, 0, 0));
        assert!(height_map.iter().flatten().all(|&height| height == 10));
    }

    #[test]
    fn height_map_is_seamless_across_chunks() {
        let terrain = TerrainGenerator::simplex(TerrainConfig::default());
        let left = terrain.generate_height_map(block_offset(Point3::new(0, 0, 0)));
        let right = terrain.generate_height_map(block_offset(Point3::new(1, 0, 0)));
        for z in 0..CHUNK_DIMENSION {
            assert_eq!(left[15][z as usize], terrain.column_height(15, z));
            assert_eq!(right[0][z as usize], terrain.column_height(16, z));
        }
    }

    #[test]
    fn generated_columns_follow_the_height_map() {
        let terrain = generator(128.0, 128.0, 200.0);
        let voxels = terrain.generate_voxels(Point3::new(0, 0, 0));
        for y in 0..CHUNK_DIMENSION as usize {
            let expected = match y {
                10 => BlockType::GRASS,
                8 | 9 => BlockType::DIRT,
                0..=7 => BlockType::ROCK,
                _ => BlockType::EMPTY,
            };
            assert_eq!(voxels.block_at(4, y, 7).block_type, expected, "y = {y}");
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let terrain = TerrainGenerator::simplex(TerrainConfig::default());
        let a = terrain.generate_voxels(Point3::new(-1, 0, 2));
        let b = terrain.generate_voxels(Point3::new(-1, 0, 2));
        for z in 0..16 {
            for y in 0..16 {
                for x in 0..16 {
                    assert_eq!(a.block_at(x, y, z), b.block_at(x, y, z));
                }
            }
        }
    }
}
