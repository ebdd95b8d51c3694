//! Random Sources
//!
//! The synthesizer never touches a generator directly; it draws through the
//! [`RandomSource`] trait so tests can substitute scripted noise without
//! touching the formulas.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::types::{DEFAULT_SEED, EPSILON};

/// Capability required by the synthesizer and dataset assembler
pub trait RandomSource {
    /// Uniform integer age in `[min, max]` (inclusive)
    fn uniform_age(&mut self, min: u32, max: u32) -> u32;

    /// Zero-mean Gaussian draw with the given standard deviation
    fn gaussian(&mut self, std_dev: f64) -> f64;
}

/// Seeded ChaCha8 generator with Box-Muller normals.
///
/// Two instances built from the same seed produce identical sequences on every
/// platform.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[0, 1)`
    pub fn next_unit(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Index in `[0, len)`
    pub fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Sample from standard normal distribution using Box-Muller transform
    fn sample_normal(&mut self) -> f64 {
        let u1: f64 = self.rng.gen::<f64>().max(EPSILON);
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for SeededRandom {
    fn uniform_age(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }

    fn gaussian(&mut self, std_dev: f64) -> f64 {
        self.sample_normal() * std_dev
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform_age(&mut self, min: u32, max: u32) -> u32 {
        (**self).uniform_age(min, max)
    }

    fn gaussian(&mut self, std_dev: f64) -> f64 {
        (**self).gaussian(std_dev)
    }
}
