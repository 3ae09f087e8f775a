//! # Task Management System
//!
//! This module provides a small worker pool for running CPU-bound tasks off the
//! thread that owns the world.
//!
//! ## Architecture Overview
//! - `TaskManager`: distributes tasks to workers and collects their outputs
//! - `Task`: a unit of work producing an output
//! - `TaskChannel`: the task channel and bookkeeping of one worker thread
//!
//! Each worker has its own task channel and processes one task at a time. All
//! workers report through a single result channel, so the owner can either poll
//! for finished work or block until the next output arrives.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to idle workers using round-robin, queueing the rest
//! 3. Workers process tasks and send the outputs back
//! 4. Outputs are collected on the owning thread in `process_completed_tasks()`
//!    (non-blocking) or `wait_for_completed()` (blocking)
//! 5. `process_queued_tasks()` moves queued tasks onto workers that became idle
//!
//! A task that panics takes nothing down with it: the worker logs the panic,
//! reports the slot as free and keeps serving its channel.

pub mod task;

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, RecvError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{error, info, warn};
use task::Task;

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Set to 1 so an idle worker is always preferred over a busy one.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// A boxed task producing `T`.
pub type BoxedTask<T> = Box<dyn Task<Output = T>>;

/// What a worker reports back after running a task.
enum WorkerReport<T> {
    Completed { worker: usize, output: T },
    Panicked { worker: usize },
}

/// The main thread's end of one worker thread.
struct TaskChannel<T> {
    task_sender: Sender<BoxedTask<T>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: Set of active worker channels
/// - `result_receiver`: Receives the reports of every worker
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager<T: Send + 'static> {
    channels: Vec<TaskChannel<T>>,
    result_receiver: Receiver<WorkerReport<T>>,
    queued_tasks: VecDeque<BoxedTask<T>>,
    current_channel: usize,
}

impl<T: Send + 'static> TaskManager<T> {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// A worker whose thread cannot be spawned is skipped with a warning; tasks
    /// published to a manager without workers stay queued.
    pub fn new(num_workers: usize) -> Self {
        let (result_tx, result_rx) = channel::<WorkerReport<T>>();
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        for _ in 0..num_workers {
            let worker_idx = channels.len();
            let (task_tx, task_rx) = channel::<BoxedTask<T>>();
            let result_tx = result_tx.clone();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let report = match panic::catch_unwind(AssertUnwindSafe(|| task.process())) {
                        Ok(output) => WorkerReport::Completed {
                            worker: worker_idx,
                            output,
                        },
                        Err(_) => {
                            error!("Task panicked on worker {}", worker_idx);
                            WorkerReport::Panicked { worker: worker_idx }
                        }
                    };
                    if result_tx.send(report).is_err() {
                        break;
                    }
                }
            };

            match thread::Builder::new()
                .name(format!("task-worker-{worker_idx}"))
                .spawn(task_closure)
            {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    num_tasks_in_flight: 0,
                    worker,
                }),
                Err(err) => warn!("Failed to spawn worker thread: {}", err),
            }
        }

        TaskManager {
            channels,
            result_receiver: result_rx,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Number of tasks handed to workers and not yet reported back.
    pub fn num_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Number of tasks waiting for a free worker.
    pub fn num_queued(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (worker disconnected), so it can be requeued
    fn try_send_task(&mut self, task: BoxedTask<T>, channel_idx: usize) -> Result<(), BoxedTask<T>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(()) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(err) => {
                warn!("Worker {} disconnected, requeueing task", channel_idx);
                Err(err.0)
            }
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    ///
    /// # Returns
    /// - `Some(usize)` index of a channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: BoxedTask<T>) -> bool {
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(()) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto idle workers, oldest first.
    ///
    /// Stops at the first task that can't be scheduled.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(()) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Collects every output that is ready, without blocking.
    pub fn process_completed_tasks(&mut self) -> Vec<T> {
        let mut outputs = Vec::new();
        loop {
            match self.result_receiver.try_recv() {
                Ok(report) => outputs.extend(self.handle_report(report)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("All workers disconnected");
                    break;
                }
            }
        }
        outputs
    }

    /// Blocks until at least one task reports back, then collects every ready output.
    ///
    /// Returns immediately with an empty vector when nothing is in flight.
    pub fn wait_for_completed(&mut self) -> Vec<T> {
        if self.num_in_flight() == 0 {
            return Vec::new();
        }

        let mut outputs = match self.result_receiver.recv() {
            Ok(report) => self.handle_report(report).into_iter().collect(),
            Err(RecvError) => {
                warn!("All workers disconnected");
                Vec::new()
            }
        };
        outputs.extend(self.process_completed_tasks());
        outputs
    }

    fn handle_report(&mut self, report: WorkerReport<T>) -> Option<T> {
        let (worker, output) = match report {
            WorkerReport::Completed { worker, output } => (worker, Some(output)),
            WorkerReport::Panicked { worker } => (worker, None),
        };
        let channel = &mut self.channels[worker];
        channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);
        output
    }
}

impl<T: Send + 'static> Drop for TaskManager<T> {
    fn drop(&mut self) {
        for (idx, channel) in self.channels.drain(..).enumerate() {
            // Closing the task channel ends the worker loop
            drop(channel.task_sender);
            if channel.worker.join().is_err() {
                warn!("Worker {} terminated abnormally", idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};

    use super::*;

    struct Square(u64);

    impl Task for Square {
        type Output = u64;

        fn process(&self) -> u64 {
            self.0 * self.0
        }
    }

    struct Explode;

    impl Task for Explode {
        type Output = u64;

        fn process(&self) -> u64 {
            panic!("task failure");
        }
    }

    struct WaitOn(Arc<Barrier>);

    impl Task for WaitOn {
        type Output = u64;

        fn process(&self) -> u64 {
            self.0.wait();
            0
        }
    }

    fn drain(manager: &mut TaskManager<u64>) -> Vec<u64> {
        let mut outputs = Vec::new();
        while manager.num_in_flight() > 0 || manager.num_queued() > 0 {
            outputs.extend(manager.wait_for_completed());
            manager.process_queued_tasks();
        }
        outputs
    }

    #[test]
    fn runs_every_published_task() {
        let mut manager = TaskManager::new(3);
        for n in 1..=10 {
            manager.publish_task(Box::new(Square(n)));
        }
        assert_eq!(manager.num_in_flight() + manager.num_queued(), 10);
        assert!(manager.num_in_flight() <= 3 * MAX_TASKS_IN_FLIGHT);

        let mut outputs = drain(&mut manager);
        outputs.sort_unstable();
        assert_eq!(outputs, (1..=10).map(|n| n * n).collect::<Vec<_>>());
    }

    #[test]
    fn busy_workers_queue_new_tasks() {
        let barrier = Arc::new(Barrier::new(2));
        let mut manager = TaskManager::new(1);

        assert!(manager.publish_task(Box::new(WaitOn(barrier.clone()))));
        assert!(!manager.publish_task(Box::new(Square(3))));
        assert_eq!(manager.num_queued(), 1);

        barrier.wait();
        let mut outputs = drain(&mut manager);
        outputs.sort_unstable();
        assert_eq!(outputs, vec![0, 9]);
    }

    #[test]
    fn panicking_task_frees_its_worker() {
        let mut manager = TaskManager::new(1);
        manager.publish_task(Box::new(Explode));
        manager.publish_task(Box::new(Square(4)));

        assert_eq!(drain(&mut manager), vec![16]);
        assert_eq!(manager.num_in_flight(), 0);
    }

    #[test]
    fn manager_without_workers_keeps_tasks_queued() {
        let mut manager = TaskManager::<u64>::new(0);
        assert!(!manager.publish_task(Box::new(Square(2))));
        manager.process_queued_tasks();
        assert_eq!(manager.num_queued(), 1);
        assert!(manager.wait_for_completed().is_empty());
    }
}
