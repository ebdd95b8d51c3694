use serde::{Deserialize, Serialize};

use super::forest::FeatureRow;
use crate::sanitize::safe_scale;
use crate::types::FEATURE_COUNT;

/// Per-column standardization to zero mean and unit variance.
///
/// Uses the population standard deviation. Constant columns keep a scale of 1
/// so they map to 0 instead of NaN.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }
}

impl StandardScaler {
    pub fn fit(rows: &[FeatureRow]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        let n = rows.len() as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = [0.0; FEATURE_COUNT];
        for row in rows {
            for j in 0..FEATURE_COUNT {
                var[j] += (row[j] - mean[j]).powi(2);
            }
        }

        let mut scale = [1.0; FEATURE_COUNT];
        for j in 0..FEATURE_COUNT {
            scale[j] = safe_scale((var[j] / n).sqrt());
        }

        Self { mean, scale }
    }

    pub fn transform(&self, row: &FeatureRow) -> FeatureRow {
        let mut out = [0.0; FEATURE_COUNT];
        for j in 0..FEATURE_COUNT {
            out[j] = (row[j] - self.mean[j]) / self.scale[j];
        }
        out
    }

    pub fn transform_all(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
