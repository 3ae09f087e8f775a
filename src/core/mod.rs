//! # Core Module
//!
//! Shared-ownership containers used across the crate.
//!
//! ## Key Components
//! - `StResource`: Single-threaded reference-counted resource with interior mutability

mod st_resource;

pub use st_resource::StResource;
