//! # Voxel Task System
//!
//! Tasks related to voxel world generation. They run on the worker pool so chunk
//! generation does not stall the thread driving the world.

pub mod chunk_generation_task;
