//! Data Sanitization
//!
//! Numerical guards shared by the synthesizer, classifier and scorer.
//!
//! Functions:
//! - Guarded ratios (no division by zero)
//! - Score clamping
//! - Feature vector sanitization
//! - Decimal rounding

use crate::types::EPSILON;

/// Lower bound of every 0-100 score
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every 0-100 score
pub const SCORE_MAX: f64 = 100.0;

/// Check whether a slice contains NaN or infinite values
#[cfg(test)]
pub(crate) fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// `numerator / denominator`, or 0 when the denominator is not positive
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Clamp a score into `[0, 100]`. NaN collapses to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_MIN;
    }
    value.max(SCORE_MIN).min(SCORE_MAX)
}

/// Round to `decimals` places the way Python's `round` does: the exact
/// binary value decides, and exact ties go to the even digit (0.125 -> 0.12).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() || decimals < 0 {
        let factor = 10f64.powi(decimals);
        return (value * factor).round() / factor;
    }
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Replace NaN and infinite entries with 0 so downstream models stay finite
pub fn sanitize_feature_vector(x: &mut [f64]) {
    for val in x.iter_mut() {
        if val.is_nan() || val.is_infinite() {
            *val = 0.0;
        }
    }
}

/// Standard deviation guard: degenerate columns scale by 1
pub fn safe_scale(std_dev: f64) -> f64 {
    if std_dev.is_finite() && std_dev > EPSILON {
        std_dev
    } else {
        1.0
    }
}
