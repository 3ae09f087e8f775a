//! A mesh consumer without a graphics API.
//!
//! [`HeadlessUploader`] accepts chunk meshes like a real renderer would but only
//! keeps counters: how many meshes and bytes were uploaded, how many draw calls
//! were issued and how many meshes were released. The demo driver logs these and
//! tests assert on them.

use log::{trace, warn};

use crate::core::StResource;

use super::meshing::ChunkMesh;
use super::{GpuMesh, MeshUploader, TextureHandle};

/// Counters shared by a [`HeadlessUploader`] and every mesh it created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub uploads: usize,
    pub uploaded_bytes: usize,
    pub uploaded_faces: u64,
    pub draw_calls: usize,
    pub releases: usize,
}

impl HeadlessStats {
    /// Meshes uploaded and not yet released.
    pub fn live_meshes(&self) -> usize {
        self.uploads - self.releases
    }
}

#[derive(Default)]
pub struct HeadlessUploader {
    stats: StResource<HeadlessStats>,
}

impl HeadlessUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle on the counters that stays valid after the uploader is moved into a world.
    pub fn stats_handle(&self) -> StResource<HeadlessStats> {
        self.stats.clone()
    }

    pub fn stats(&self) -> HeadlessStats {
        *self.stats.get()
    }
}

impl MeshUploader for HeadlessUploader {
    fn upload(&mut self, mesh: &ChunkMesh, texture: TextureHandle) -> Box<dyn GpuMesh> {
        let bytes = mesh.vertex_bytes().len() + mesh.uv_bytes().len() + mesh.index_bytes().len();

        let mut stats = self.stats.get_mut();
        stats.uploads += 1;
        stats.uploaded_bytes += bytes;
        stats.uploaded_faces += u64::from(mesh.face_count());
        trace!("Uploaded mesh #{} ({} bytes, texture {:?})", stats.uploads, bytes, texture);

        Box::new(HeadlessMesh {
            stats: self.stats.clone(),
            index_count: mesh.indices().len(),
            released: false,
        })
    }
}

struct HeadlessMesh {
    stats: StResource<HeadlessStats>,
    index_count: usize,
    released: bool,
}

impl GpuMesh for HeadlessMesh {
    fn render(&self) {
        if self.released {
            warn!("Draw call on a released mesh");
            return;
        }
        // Empty meshes are skipped like a renderer would skip a zero-length draw
        if self.index_count > 0 {
            self.stats.get_mut().draw_calls += 1;
        }
    }

    fn release(&mut self) {
        if self.released {
            warn!("Mesh released twice");
            return;
        }
        self.released = true;
        self.stats.get_mut().releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::voxels::block::{block_side::BlockSide, block_type::BlockType, Block};

    #[test]
    fn counts_uploads_draws_and_releases() {
        let mut uploader = HeadlessUploader::new();
        let stats = uploader.stats_handle();

        let mut mesh = ChunkMesh::new();
        mesh.add_face(Block::new(Point3::new(0, 0, 0), BlockType::GRASS).get_face(BlockSide::TOP));

        let mut gpu_mesh = uploader.upload(&mesh, TextureHandle(1));
        let mut empty = uploader.upload(&ChunkMesh::new(), TextureHandle(1));
        gpu_mesh.render();
        gpu_mesh.render();
        empty.render();
        gpu_mesh.release();
        gpu_mesh.release();
        gpu_mesh.render();
        empty.release();

        let stats = *stats.get();
        assert_eq!(stats.uploads, 2);
        assert_eq!(stats.uploaded_bytes, 4 * 12 + 4 * 8 + 6 * 4);
        assert_eq!(stats.uploaded_faces, 1);
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.releases, 2);
        assert_eq!(stats.live_meshes(), 0);
    }
}
