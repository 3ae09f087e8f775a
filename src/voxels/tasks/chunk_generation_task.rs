//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which runs the pure half of chunk
//! generation (heightmap, classification and culled meshing) on a worker thread.
//! The GPU upload and the insertion into the world happen later on the world's
//! thread.

use std::sync::Arc;

use cgmath::Point3;

use crate::task_management::task::Task;
use crate::voxels::chunk::terrain::TerrainGenerator;
use crate::voxels::chunk::GeneratedChunk;

/// A task that generates the voxels and mesh buffers of one chunk.
pub struct ChunkGenerationTask {
    /// The position of the chunk to generate (in chunk coordinates)
    position: Point3<i32>,
    /// Shared, read-only terrain generator
    terrain: Arc<TerrainGenerator>,
}

impl ChunkGenerationTask {
    pub fn new(position: Point3<i32>, terrain: Arc<TerrainGenerator>) -> Self {
        ChunkGenerationTask { position, terrain }
    }

    pub fn position(&self) -> Point3<i32> {
        self.position
    }
}

impl Task for ChunkGenerationTask {
    type Output = GeneratedChunk;

    fn process(&self) -> GeneratedChunk {
        GeneratedChunk::generate(self.position, &self.terrain)
    }
}
