//! # Task System Core Trait
//!
//! A `Task` is a self-contained unit of work that runs on a worker thread and
//! produces an output which is handed back to the thread that owns the
//! `TaskManager`.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The output is sent back over the worker's result channel
//! 4. The owner collects outputs with `TaskManager::process_completed_tasks()`
//!    and applies them on its own thread

/// A unit of work that can be executed on a worker thread.
///
/// Tasks should own all the data they need (shared read-only state behind an
/// `Arc`) and avoid blocking, since a busy worker cannot pick up queued work.
pub trait Task: Send {
    /// The value produced for the owning thread.
    type Output: Send + 'static;

    /// Performs the work. Runs on a worker thread.
    fn process(&self) -> Self::Output;
}
