//! Feature Synthesizer
//!
//! Closed-form, age-conditioned band-power model with Gaussian noise.
//!
//! Trends (age `a`):
//! - Delta and Theta decline linearly with age
//! - Alpha rises through childhood, plateaus in adulthood, declines after 50
//! - Beta rises slightly with age
//! - Entropy rises until 25, then stabilizes
//!
//! These are demonstration heuristics, not a clinical reference.

use crate::random::RandomSource;
use crate::sanitize::safe_ratio;
use crate::types::{EegFeatures, BAND_POWER_FLOOR};

// ==================== Noise Levels ====================

const DELTA_NOISE: f64 = 0.5;
const THETA_NOISE: f64 = 0.5;
const ALPHA_NOISE: f64 = 0.5;
const BETA_NOISE: f64 = 0.4;
const ENTROPY_NOISE: f64 = 0.1;

// ==================== Synthesis ====================

/// Synthesize one feature vector for `age`.
///
/// Draw order is fixed (delta, theta, alpha, beta, entropy) so a seeded
/// source reproduces the same vector.
pub fn synthesize<R: RandomSource>(age: u32, rng: &mut R) -> EegFeatures {
    let a = age as f64;

    let delta = (4.0 - 0.04 * a + rng.gaussian(DELTA_NOISE)).max(BAND_POWER_FLOOR);
    let theta = (3.5 - 0.03 * a + rng.gaussian(THETA_NOISE)).max(BAND_POWER_FLOOR);
    let alpha = alpha_power(age, rng);
    let beta = (1.5 + 0.02 * a + rng.gaussian(BETA_NOISE)).max(BAND_POWER_FLOOR);

    let entropy_base = if age < 25 { 0.5 + 0.01 * a } else { 0.75 };
    // No floor on entropy.
    let entropy = entropy_base + rng.gaussian(ENTROPY_NOISE);

    EegFeatures {
        delta,
        theta,
        alpha,
        beta,
        theta_alpha: safe_ratio(theta, alpha),
        alpha_beta: safe_ratio(alpha, beta),
        entropy,
    }
}

/// Piecewise alpha trend plus a shared post-branch noise term.
///
/// The 15..50 plateau draws its own noise before the shared term, so it
/// consumes two draws while the other branches consume one.
fn alpha_power<R: RandomSource>(age: u32, rng: &mut R) -> f64 {
    let a = age as f64;
    let trend = if age < 15 {
        1.0 + 0.2 * a
    } else if age < 50 {
        4.0 + rng.gaussian(ALPHA_NOISE)
    } else {
        4.0 - 0.02 * (a - 50.0)
    };
    (trend + rng.gaussian(ALPHA_NOISE)).max(BAND_POWER_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use crate::sanitize::has_invalid_values;
    use crate::types::{MAX_AGE, MIN_AGE};

    /// Replays a fixed list of standard-normal values, scaled by the
    /// requested std dev. Counts how many draws were taken.
    struct ScriptedNoise {
        values: Vec<f64>,
        cursor: usize,
    }

    impl ScriptedNoise {
        fn new(values: Vec<f64>) -> Self {
            Self { values, cursor: 0 }
        }

        fn silent() -> Self {
            Self::new(Vec::new())
        }
    }

    impl RandomSource for ScriptedNoise {
        fn uniform_age(&mut self, min: u32, _max: u32) -> u32 {
            min
        }

        fn gaussian(&mut self, std_dev: f64) -> f64 {
            let z = self.values.get(self.cursor).copied().unwrap_or(0.0);
            self.cursor += 1;
            z * std_dev
        }
    }

    #[test]
    fn test_noise_free_child() {
        let f = synthesize(10, &mut ScriptedNoise::silent());

        assert!((f.delta - 3.6).abs() < 1e-12);
        assert!((f.theta - 3.2).abs() < 1e-12);
        assert!((f.alpha - 3.0).abs() < 1e-12);
        assert!((f.beta - 1.7).abs() < 1e-12);
        assert!((f.theta_alpha - 3.2 / 3.0).abs() < 1e-12);
        assert!((f.alpha_beta - 3.0 / 1.7).abs() < 1e-12);
        assert!((f.entropy - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_noise_free_senior_alpha_decline() {
        let f = synthesize(70, &mut ScriptedNoise::silent());
        assert!((f.alpha - 3.6).abs() < 1e-12);
        assert!((f.entropy - 0.75).abs() < 1e-12);
        assert!((f.beta - 2.9).abs() < 1e-12);
    }

    #[test]
    fn test_plateau_consumes_two_alpha_draws() {
        let mut plateau = ScriptedNoise::silent();
        synthesize(30, &mut plateau);
        assert_eq!(plateau.cursor, 6);

        let mut child = ScriptedNoise::silent();
        synthesize(10, &mut child);
        assert_eq!(child.cursor, 5);

        let mut senior = ScriptedNoise::silent();
        synthesize(50, &mut senior);
        assert_eq!(senior.cursor, 5);
    }

    #[test]
    fn test_plateau_adds_both_alpha_draws() {
        // delta, theta, alpha plateau, alpha shared, beta, entropy
        let mut noise = ScriptedNoise::new(vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let f = synthesize(30, &mut noise);
        assert!((f.alpha - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_floor_applies() {
        let mut noise = ScriptedNoise::new(vec![-100.0; 6]);
        let f = synthesize(30, &mut noise);

        assert_eq!(f.delta, BAND_POWER_FLOOR);
        assert_eq!(f.theta, BAND_POWER_FLOOR);
        assert_eq!(f.alpha, BAND_POWER_FLOOR);
        assert_eq!(f.beta, BAND_POWER_FLOOR);
        assert_eq!(f.theta_alpha, 1.0);
    }

    #[test]
    fn test_entropy_is_not_floored() {
        let mut noise = ScriptedNoise::new(vec![0.0, 0.0, 0.0, 0.0, -20.0]);
        let f = synthesize(10, &mut noise);
        assert!(f.entropy < 0.0, "entropy {} should go negative", f.entropy);
    }

    #[test]
    fn test_floor_and_finiteness_over_all_ages() {
        let mut rng = SeededRandom::new(42);
        for _ in 0..20 {
            for age in MIN_AGE..=MAX_AGE {
                let f = synthesize(age, &mut rng);
                assert!(f.delta >= BAND_POWER_FLOOR);
                assert!(f.theta >= BAND_POWER_FLOOR);
                assert!(f.alpha >= BAND_POWER_FLOOR);
                assert!(f.beta >= BAND_POWER_FLOOR);
                assert!(!has_invalid_values(&f.to_array()));
            }
        }
    }
}
