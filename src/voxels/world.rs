//! # World Module
//!
//! This module provides the `World` struct which keeps the chunks around a moving
//! observer generated.
//!
//! ## Architecture
//!
//! The world uses sparse storage: a hash map from chunk position to a fully built
//! [`Chunk`]. A position that is a key of the map is generated and renderable.
//! Positions that still need generating wait in a FIFO queue.
//!
//! ## Streaming
//!
//! Every [`World::update`] scans the cube of chunk positions within
//! `generation_radius` of the observer's chunk and enqueues the ones that are not
//! generated yet. The queue may hold the same position more than once; membership
//! is re-checked when a position is dequeued, so no chunk is ever generated twice.
//! At most `max_chunks_per_update` chunks are generated per update, which bounds
//! the work done in a single frame.
//!
//! With `worker_threads > 0` the pure half of generation runs on a worker pool
//! instead. Dequeued positions are dispatched as tasks, marked in flight, and the
//! finished chunks are uploaded and inserted by a later update on the world's
//! thread. A chunk therefore only becomes visible once it is complete.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::{debug, info, warn};
use web_time::Instant;

use crate::config::{StreamingConfig, WorldConfig};
use crate::rendering::{MeshUploader, TextureHandle};
use crate::task_management::TaskManager;

use super::chunk::terrain::TerrainGenerator;
use super::chunk::{is_valid_chunk_position, world_to_chunk_position, Chunk, GeneratedChunk};
use super::tasks::chunk_generation_task::ChunkGenerationTask;

/// What a single [`World::update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateStats {
    /// The chunk containing the observer.
    pub observer_chunk: Point3<i32>,
    /// Positions pushed onto the queue by this update's scan.
    pub enqueued: usize,
    /// Chunks inserted into the world by this update, at most `max_chunks_per_update`.
    pub generated: usize,
    /// Positions handed to the worker pool by this update.
    pub dispatched: usize,
    /// Queue length after the update, duplicates included.
    pub queued: usize,
}

/// A streamed voxel world composed of 16x16x16 chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_terrain::config::WorldConfig;
/// use voxel_terrain::rendering::{headless::HeadlessUploader, TextureHandle};
/// use voxel_terrain::voxels::world::World;
///
/// let mut world = World::new(&WorldConfig::default(), Box::new(HeadlessUploader::new()), TextureHandle(0));
/// let stats = world.update(Point3::new(0.0, 8.0, 0.0));
///
/// assert_eq!(stats.generated, 8);
/// assert_eq!(world.chunk_count(), 8);
/// world.render();
/// world.delete();
/// ```
pub struct World {
    /// A mapping from chunk coordinates to fully generated chunks.
    chunks: HashMap<Point3<i32>, Chunk>,
    /// Positions waiting to be generated, oldest first.
    queue: VecDeque<Point3<i32>>,
    /// Positions currently being generated on the worker pool.
    in_flight: HashSet<Point3<i32>>,
    /// Chunks finished by the worker pool and not yet uploaded.
    completed: VecDeque<GeneratedChunk>,
    config: StreamingConfig,
    terrain: Arc<TerrainGenerator>,
    uploader: Box<dyn MeshUploader>,
    texture: TextureHandle,
    task_manager: Option<TaskManager<GeneratedChunk>>,
}

impl World {
    /// Creates an empty world that generates terrain from simplex noise.
    pub fn new(config: &WorldConfig, uploader: Box<dyn MeshUploader>, texture: TextureHandle) -> Self {
        Self::with_terrain(
            config.streaming.clone(),
            TerrainGenerator::simplex(config.terrain.clone()),
            uploader,
            texture,
        )
    }

    /// Creates an empty world with a custom terrain generator.
    pub fn with_terrain(
        config: StreamingConfig,
        terrain: TerrainGenerator,
        uploader: Box<dyn MeshUploader>,
        texture: TextureHandle,
    ) -> Self {
        let task_manager = match config.worker_threads {
            0 => None,
            workers => {
                let manager = TaskManager::new(workers);
                if manager.num_workers() == 0 {
                    warn!("No worker threads could be started, generating synchronously");
                    None
                } else {
                    Some(manager)
                }
            }
        };

        info!(
            "World created: radius {}, {} chunks per update, {}",
            config.generation_radius,
            config.max_chunks_per_update,
            match &task_manager {
                Some(manager) => format!("{} workers", manager.num_workers()),
                None => "synchronous".to_string(),
            }
        );

        World {
            chunks: HashMap::new(),
            queue: VecDeque::new(),
            in_flight: HashSet::new(),
            completed: VecDeque::new(),
            config,
            terrain: Arc::new(terrain),
            uploader,
            texture,
            task_manager,
        }
    }

    /// Advances streaming by one tick for an observer at `observer` (world space).
    pub fn update(&mut self, observer: Point3<f32>) -> UpdateStats {
        let start = Instant::now();
        let mut generated = self.publish_completed();

        let observer_chunk = world_to_chunk_position(observer);
        let enqueued = self.enqueue_missing_around(observer_chunk);

        let mut dispatched = 0;
        if self.task_manager.is_some() {
            dispatched = self.dispatch_queued();
        } else {
            generated += self.generate_queued();
        }

        let stats = UpdateStats {
            observer_chunk,
            enqueued,
            generated,
            dispatched,
            queued: self.queue.len(),
        };
        debug!("World update {:?} in {:?}", stats, start.elapsed());
        stats
    }

    /// Enqueues every position within the generation radius that is not generated yet.
    fn enqueue_missing_around(&mut self, center: Point3<i32>) -> usize {
        let radius = self.config.generation_radius;
        let mut enqueued = 0;

        for x in -radius..=radius {
            for y in -radius..=radius {
                for z in -radius..=radius {
                    let Some(position) = offset_chunk_position(center, Vector3::new(x, y, z))
                    else {
                        continue;
                    };
                    if !self.chunks.contains_key(&position) {
                        self.queue.push_back(position);
                        enqueued += 1;
                    }
                }
            }
        }

        enqueued
    }

    /// Generates queued chunks on this thread until the budget is spent.
    fn generate_queued(&mut self) -> usize {
        let mut generated = 0;

        while generated < self.config.max_chunks_per_update {
            let Some(position) = self.queue.pop_front() else {
                break;
            };
            if self.chunks.contains_key(&position) {
                continue;
            }

            let chunk = Chunk::new(position, &self.terrain, self.uploader.as_mut(), self.texture);
            self.chunks.insert(position, chunk);
            generated += 1;
        }

        generated
    }

    /// Hands queued positions to the worker pool until the budget is spent.
    fn dispatch_queued(&mut self) -> usize {
        let Some(task_manager) = self.task_manager.as_mut() else {
            return 0;
        };
        let mut dispatched = 0;

        while dispatched < self.config.max_chunks_per_update {
            let Some(position) = self.queue.pop_front() else {
                break;
            };
            if self.chunks.contains_key(&position) || self.in_flight.contains(&position) {
                continue;
            }

            task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                position,
                self.terrain.clone(),
            )));
            self.in_flight.insert(position);
            dispatched += 1;
        }

        task_manager.process_queued_tasks();
        dispatched
    }

    /// Collects finished chunks from the worker pool and publishes them, oldest first,
    /// until the budget is spent. The rest wait for the next update.
    fn publish_completed(&mut self) -> usize {
        let Some(task_manager) = self.task_manager.as_mut() else {
            return 0;
        };
        self.completed.extend(task_manager.process_completed_tasks());
        task_manager.process_queued_tasks();

        let mut published = 0;
        while published < self.config.max_chunks_per_update {
            let Some(generated) = self.completed.pop_front() else {
                break;
            };
            if self.publish(generated) {
                published += 1;
            }
        }

        self.forget_lost_tasks();
        published
    }

    fn publish(&mut self, generated: GeneratedChunk) -> bool {
        let position = generated.position();
        self.in_flight.remove(&position);

        if self.chunks.contains_key(&position) {
            warn!("Discarding duplicate generation of chunk {:?}", position);
            return false;
        }

        let chunk = Chunk::upload(generated, self.uploader.as_mut(), self.texture);
        self.chunks.insert(position, chunk);
        true
    }

    /// Drops in-flight markers whose tasks will never report back (a task panicked),
    /// so the next scan can enqueue those positions again.
    fn forget_lost_tasks(&mut self) {
        let Some(task_manager) = self.task_manager.as_ref() else {
            return;
        };
        if task_manager.num_in_flight() > 0 || task_manager.num_queued() > 0 {
            return;
        }

        let before = self.in_flight.len();
        self.in_flight
            .retain(|position| self.completed.iter().any(|generated| generated.position() == *position));
        let lost = before - self.in_flight.len();
        if lost > 0 {
            warn!("Forgetting {} lost chunk generation tasks", lost);
        }
    }

    /// Blocks until every dispatched chunk has been published.
    ///
    /// Unlike [`World::update`] this publishes without a budget.
    ///
    /// # Returns
    /// The number of chunks published. Always zero in synchronous mode.
    pub fn finish_pending(&mut self) -> usize {
        while let Some(task_manager) = self.task_manager.as_mut() {
            task_manager.process_queued_tasks();
            // Nothing in flight after dispatching means every worker is gone
            if task_manager.num_in_flight() == 0 {
                break;
            }
            self.completed.extend(task_manager.wait_for_completed());
        }

        let mut published = 0;
        while let Some(generated) = self.completed.pop_front() {
            if self.publish(generated) {
                published += 1;
            }
        }

        self.forget_lost_tasks();
        published
    }

    /// Issues the draw call of every generated chunk.
    pub fn render(&self) {
        for chunk in self.chunks.values() {
            chunk.render();
        }
    }

    /// Releases the GPU resources of every chunk and stops the worker pool.
    pub fn delete(self) {
        let World {
            chunks,
            task_manager,
            ..
        } = self;
        let count = chunks.len();

        // Joins the workers; their unfinished output is discarded
        drop(task_manager);
        for chunk in chunks.into_values() {
            chunk.delete();
        }

        info!("World deleted, released {} chunks", count);
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Number of generated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of queued positions, duplicates included.
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Number of positions being generated on the worker pool.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn contains_chunk(&self, position: Point3<i32>) -> bool {
        self.chunks.contains_key(&position)
    }

    pub fn get_chunk(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Iterates over the generated chunks in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }
}

/// `center + offset`, or `None` if that leaves the range of valid chunk positions.
fn offset_chunk_position(center: Point3<i32>, offset: Vector3<i32>) -> Option<Point3<i32>> {
    let position = Point3::new(
        center.x.checked_add(offset.x)?,
        center.y.checked_add(offset.y)?,
        center.z.checked_add(offset.z)?,
    );
    is_valid_chunk_position(position).then_some(position)
}
