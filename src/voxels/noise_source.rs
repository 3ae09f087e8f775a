//! # Noise Source
//!
//! Terrain generation samples noise through the [`NoiseSource`] trait so the
//! generator does not depend on a particular noise algorithm. Samples are expected
//! to be deterministic for a given input and to fall roughly within `[0, 256)`;
//! callers normalise by a known divisor.

use noise::{NoiseFn, Simplex};

/// A deterministic 2D/3D noise field.
///
/// Implementations must be pure: the same coordinates and frequency always yield
/// the same sample. Chunk generation relies on this for seamless borders between
/// chunks and for reproducible meshes.
pub trait NoiseSource: Send + Sync {
    /// Samples the 2D field at `(x * frequency, z * frequency)`.
    fn sample_2d(&self, x: f32, z: f32, frequency: f32) -> f32;

    /// Samples the 3D field at `(x, y, z) * frequency`.
    fn sample_3d(&self, x: f32, y: f32, z: f32, frequency: f32) -> f32;
}

/// Upper bound of the values produced by [`SimplexNoise`].
pub const SIMPLEX_RANGE: f32 = 256.0;

/// Simplex noise remapped from `[-1, 1]` into `[0, 256)`.
pub struct SimplexNoise {
    seed: u32,
    simplex: Simplex,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> Self {
        SimplexNoise {
            seed,
            simplex: Simplex::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn to_range(value: f64) -> f32 {
        let scaled = (value as f32 + 1.0) * 0.5 * SIMPLEX_RANGE;
        scaled.clamp(0.0, SIMPLEX_RANGE - 1.0)
    }
}

impl NoiseSource for SimplexNoise {
    fn sample_2d(&self, x: f32, z: f32, frequency: f32) -> f32 {
        let frequency = frequency as f64;
        Self::to_range(self.simplex.get([x as f64 * frequency, z as f64 * frequency]))
    }

    fn sample_3d(&self, x: f32, y: f32, z: f32, frequency: f32) -> f32 {
        let frequency = frequency as f64;
        Self::to_range(self.simplex.get([
            x as f64 * frequency,
            y as f64 * frequency,
            z as f64 * frequency,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_deterministic() {
        let a = SimplexNoise::new(42);
        let b = SimplexNoise::new(42);
        for i in 0..64 {
            let x = i as f32 * 3.7;
            let z = i as f32 * -1.3;
            assert_eq!(a.sample_2d(x, z, 0.01), b.sample_2d(x, z, 0.01));
            assert_eq!(a.sample_3d(x, 5.0, z, 0.05), b.sample_3d(x, 5.0, z, 0.05));
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let noise = SimplexNoise::new(7);
        for i in -50..50 {
            let v = i as f32 * 11.0;
            let sample_2d = noise.sample_2d(v, -v, 0.05);
            let sample_3d = noise.sample_3d(v, v * 0.5, -v, 0.05);
            assert!((0.0..SIMPLEX_RANGE).contains(&sample_2d));
            assert!((0.0..SIMPLEX_RANGE).contains(&sample_3d));
        }
    }

    #[test]
    fn field_is_not_constant() {
        let noise = SimplexNoise::new(3);
        let first = noise.sample_2d(0.5, 0.5, 0.1);
        assert!((1..100).any(|i| noise.sample_2d(i as f32 * 7.3, 0.5, 0.1) != first));
    }
}
