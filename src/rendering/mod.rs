//! # Rendering Module
//!
//! The boundary between chunk generation and whatever owns the GPU. Chunks build
//! their mesh buffers on the CPU and hand them to a [`MeshUploader`]; the returned
//! [`GpuMesh`] is the chunk's only handle on GPU-side resources.
//!
//! The crate ships a [`headless::HeadlessUploader`] which records uploads and draw
//! calls instead of talking to a graphics API.

pub mod headless;
pub mod meshing;

use meshing::ChunkMesh;

/// Opaque handle of the block texture atlas bound when drawing a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Turns CPU mesh buffers into a drawable GPU mesh.
///
/// Uploads happen on the thread that owns the world, never on worker threads.
pub trait MeshUploader {
    /// Creates GPU resources for `mesh`, textured with `texture`.
    fn upload(&mut self, mesh: &ChunkMesh, texture: TextureHandle) -> Box<dyn GpuMesh>;
}

/// The GPU-side resources of one chunk.
pub trait GpuMesh {
    /// Issues the draw call.
    fn render(&self);

    /// Frees the GPU resources. Called exactly once, when the owning chunk is deleted.
    fn release(&mut self);
}
