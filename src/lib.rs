#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Procedural voxel terrain generation, visibility-culled chunk meshing and chunk
//! streaming around a moving observer.
//!
//! ## Key Modules
//!
//! * `voxels` - Blocks, chunk generation and the streaming `World`
//! * `rendering` - Culled mesh buffers and the mesh upload interface
//! * `task_management` - The worker pool used for background chunk generation
//! * `config` - Runtime tuning loaded from JSON
//! * `core` - Shared-ownership containers
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_terrain::config::WorldConfig;
//! use voxel_terrain::rendering::{headless::HeadlessUploader, TextureHandle};
//! use voxel_terrain::voxels::world::World;
//!
//! let mut world = World::new(&WorldConfig::default(), Box::new(HeadlessUploader::new()), TextureHandle(0));
//! world.update(Point3::new(0.0, 12.0, 0.0));
//! world.render();
//! world.delete();
//! ```
//!
//! The texture atlas, shaders, camera and window are left to the embedding
//! application, which plugs in through [`rendering::MeshUploader`].

use std::env;

use cgmath::Point3;
use log::info;
use web_time::Instant;

use config::WorldConfig;
use error::ConfigError;
use rendering::{headless::HeadlessUploader, TextureHandle};
use voxels::world::World;

pub mod config;
pub mod core;
pub mod error;
pub mod rendering;
pub mod task_management;
pub mod voxels;

pub const DEMO_TICKS: usize = 120;

/// Blocks the demo observer moves along +x per tick.
const DEMO_OBSERVER_SPEED: f32 = 2.0;

/// Runs the headless demo: streams chunks along a straight walk and logs statistics.
///
/// The first command line argument, if any, names a JSON config file.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            WorldConfig::load(path)?
        }
        None => WorldConfig::default(),
    };

    run_demo(&config, DEMO_TICKS);
    Ok(())
}

/// Walks an observer through a fresh world for `ticks` updates, rendering every tick.
pub fn run_demo(config: &WorldConfig, ticks: usize) {
    let start = Instant::now();
    let uploader = HeadlessUploader::new();
    let stats = uploader.stats_handle();
    let mut world = World::new(config, Box::new(uploader), TextureHandle(0));

    for tick in 0..ticks {
        let observer = Point3::new(tick as f32 * DEMO_OBSERVER_SPEED, 12.0, 0.0);
        let update = world.update(observer);
        world.render();

        if tick % 20 == 0 {
            info!(
                "Tick {}: observer chunk {:?}, {} chunks, {} queued, {} in flight",
                tick,
                update.observer_chunk,
                world.chunk_count(),
                world.queued_count(),
                world.in_flight_count()
            );
        }
    }

    let published = world.finish_pending();
    world.render();
    info!(
        "Walk finished in {:?}: {} chunks ({} published after the walk), {:?}",
        start.elapsed(),
        world.chunk_count(),
        published,
        *stats.get()
    );

    world.delete();
    info!("Live meshes after delete: {}", stats.get().live_meshes());
}
