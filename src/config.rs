//! # Configuration
//!
//! Runtime tuning for terrain generation and chunk streaming. Every field has a
//! default, so a config file only needs to name the values it changes:
//!
//! ```json
//! { "streaming": { "generation_radius": 3, "worker_threads": 4 } }
//! ```
//!
//! The chunk side length and the atlas tile count size arrays and tables, so
//! they stay compile-time constants (`CHUNK_DIMENSION`, `ATLAS_TILES_PER_SIDE`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Noise frequencies and thresholds used by the terrain generator.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed of the default simplex noise source.
    pub seed: u32,
    /// Frequency of the 2D heightmap noise.
    pub height_frequency: f32,
    /// Divisor applied to the heightmap sample; larger values flatten the terrain.
    pub height_scale: f32,
    /// Number of subsurface blocks between the surface block and the bulk.
    pub subsurface_depth: i32,
    /// Frequency of the first cave density field, sampled at the block position.
    pub cave_primary_frequency: f32,
    /// Frequency of the second cave density field, sampled at an offset position.
    pub cave_secondary_frequency: f32,
    /// Offset added to every axis before sampling the second cave field.
    pub cave_offset: f32,
    /// Divisor that maps a noise sample into `[0, 1)`.
    pub noise_normalization: f32,
    /// Exclusive lower bound of the cave density band.
    pub cave_band_low: f32,
    /// Exclusive upper bound of the cave density band.
    pub cave_band_high: f32,
    /// Frequency of the rare block field.
    pub rare_frequency: f32,
    /// Normalised rare field values below this become rare blocks.
    pub rare_threshold: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            seed: 0,
            height_frequency: 0.01,
            height_scale: 10.0,
            subsurface_depth: 2,
            cave_primary_frequency: 0.01,
            cave_secondary_frequency: 0.05,
            cave_offset: 1000.0,
            noise_normalization: 256.0,
            cave_band_low: 0.1,
            cave_band_high: 0.2,
            rare_frequency: 0.05,
            rare_threshold: 0.05,
        }
    }
}

/// Controls how much chunk generation the world performs per update.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chebyshev radius, in chunks, of the cube kept generated around the observer.
    pub generation_radius: i32,
    /// Maximum number of chunks generated (or dispatched to workers) per update.
    pub max_chunks_per_update: usize,
    /// Number of generation worker threads. Zero generates on the caller's thread.
    pub worker_threads: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            generation_radius: 2,
            max_chunks_per_update: 8,
            worker_threads: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    pub terrain: TerrainConfig,
    pub streaming: StreamingConfig,
}

impl WorldConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects values that would make generation or streaming meaningless.
    pub fn validate(&self) -> ConfigResult<()> {
        let terrain = &self.terrain;
        let streaming = &self.streaming;

        if !(terrain.height_scale > 0.0) {
            return Err(invalid("terrain.height_scale", "must be greater than zero"));
        }
        if !(terrain.noise_normalization > 0.0) {
            return Err(invalid("terrain.noise_normalization", "must be greater than zero"));
        }
        if terrain.subsurface_depth < 0 {
            return Err(invalid("terrain.subsurface_depth", "must not be negative"));
        }
        if !(terrain.cave_band_low < terrain.cave_band_high) {
            return Err(invalid(
                "terrain.cave_band_low",
                format!(
                    "{} must be below cave_band_high ({})",
                    terrain.cave_band_low, terrain.cave_band_high
                ),
            ));
        }
        if streaming.generation_radius < 0 {
            return Err(invalid("streaming.generation_radius", "must not be negative"));
        }
        if streaming.max_chunks_per_update == 0 {
            return Err(invalid("streaming.max_chunks_per_update", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "streaming": { "generation_radius": 4 }, "terrain": { "seed": 9 } }"#,
        )
        .unwrap();

        assert_eq!(config.streaming.generation_radius, 4);
        assert_eq!(config.streaming.max_chunks_per_update, 8);
        assert_eq!(config.terrain.seed, 9);
        assert_eq!(config.terrain.cave_band_high, 0.2);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(WorldConfig::from_json_str("{}").unwrap(), WorldConfig::default());
    }

    #[test]
    fn inverted_cave_band_is_rejected() {
        let err = WorldConfig::from_json_str(
            r#"{ "terrain": { "cave_band_low": 0.3, "cave_band_high": 0.2 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "terrain.cave_band_low", .. }));
    }

    #[test]
    fn zero_budget_is_rejected() {
        let err = WorldConfig::from_json_str(r#"{ "streaming": { "max_chunks_per_update": 0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "streaming.max_chunks_per_update", .. }
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = WorldConfig::from_json_str("{ streaming: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = WorldConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = WorldConfig::default();
        config.streaming.worker_threads = 3;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(WorldConfig::from_json_str(&json).unwrap(), config);
    }
}
