//! # Voxels
//!
//! This module contains the voxel world: block definitions, chunk generation and
//! the streaming world that keeps chunks around an observer generated.
//!
//! ## Architecture
//!
//! * **Block**: block types, the static face geometry and atlas tables, and the
//!   cached per-block face data
//! * **Chunk**: 16x16x16 voxel grids, terrain and cave classification, and the
//!   chunk's mesh lifecycle
//! * **World**: the chunk map, the generation queue and the per-update budget
//! * **Tasks**: chunk generation as a worker pool task
//!
//! ## Data Flow
//!
//! 1. `World::update` enqueues missing chunk positions around the observer
//! 2. Dequeued positions are generated: heightmap, voxel classification, culled mesh
//! 3. The mesh is uploaded and the chunk inserted into the world
//! 4. `World::render` draws every chunk

pub mod block;
pub mod chunk;
pub mod noise_source;
pub mod tasks;
pub mod world;
