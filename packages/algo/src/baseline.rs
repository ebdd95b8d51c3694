//! Baseline Aggregator
//!
//! Reduces a labeled dataset to per-group feature means. The resulting map is
//! the reference the scorer compares users against.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::EegDataset;
use crate::types::{AgeGroup, EegRecord};

/// Mean feature profile of one age group
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    #[serde(rename = "Delta")]
    pub delta: f64,
    #[serde(rename = "Theta")]
    pub theta: f64,
    #[serde(rename = "Alpha")]
    pub alpha: f64,
    #[serde(rename = "Beta")]
    pub beta: f64,
    #[serde(rename = "Theta_Alpha")]
    pub theta_alpha: f64,
    #[serde(rename = "Alpha_Beta")]
    pub alpha_beta: f64,
    #[serde(rename = "Entropy")]
    pub entropy: f64,
    /// Rows averaged into this record
    #[serde(default)]
    pub sample_count: usize,
}

impl BaselineRecord {
    /// Arithmetic mean over `rows`. Empty input yields the zero record.
    pub fn mean_of<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a EegRecord>,
    {
        let mut sum = BaselineRecord::default();
        for row in rows {
            sum.delta += row.delta;
            sum.theta += row.theta;
            sum.alpha += row.alpha;
            sum.beta += row.beta;
            sum.theta_alpha += row.theta_alpha;
            sum.alpha_beta += row.alpha_beta;
            sum.entropy += row.entropy;
            sum.sample_count += 1;
        }

        if sum.sample_count == 0 {
            return sum;
        }

        let n = sum.sample_count as f64;
        BaselineRecord {
            delta: sum.delta / n,
            theta: sum.theta / n,
            alpha: sum.alpha / n,
            beta: sum.beta / n,
            theta_alpha: sum.theta_alpha / n,
            alpha_beta: sum.alpha_beta / n,
            entropy: sum.entropy / n,
            sample_count: sum.sample_count,
        }
    }
}

/// Group -> baseline map. Groups with no samples are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeGroupBaselines {
    groups: BTreeMap<AgeGroup, BaselineRecord>,
}

impl AgeGroupBaselines {
    pub fn new(groups: BTreeMap<AgeGroup, BaselineRecord>) -> Self {
        Self { groups }
    }

    /// Group rows by age group and average each feature column
    pub fn aggregate(dataset: &EegDataset) -> Self {
        let mut buckets: BTreeMap<AgeGroup, Vec<&EegRecord>> = BTreeMap::new();
        for record in &dataset.records {
            buckets.entry(record.age_group).or_default().push(record);
        }

        let groups = buckets
            .into_iter()
            .map(|(group, rows)| (group, BaselineRecord::mean_of(rows)))
            .collect();

        Self { groups }
    }

    pub fn get(&self, group: AgeGroup) -> Option<&BaselineRecord> {
        self.groups.get(&group)
    }

    /// Baseline for `group`, or the all-zero record when the group is absent
    pub fn get_or_default(&self, group: AgeGroup) -> BaselineRecord {
        self.groups.get(&group).copied().unwrap_or_default()
    }

    pub fn insert(&mut self, group: AgeGroup, record: BaselineRecord) {
        self.groups.insert(group, record);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgeGroup, &BaselineRecord)> {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use crate::types::{EegFeatures, DEFAULT_SEED};

    fn record(age: u32, beta: f64, entropy: f64) -> EegRecord {
        EegRecord::new(
            age,
            EegFeatures {
                delta: 2.0,
                theta: 3.0,
                alpha: 4.0,
                beta,
                theta_alpha: 0.75,
                alpha_beta: 4.0 / beta,
                entropy,
            },
        )
    }

    #[test]
    fn test_means_per_group() {
        let dataset = EegDataset::new(vec![
            record(8, 1.0, 0.5),
            record(10, 3.0, 0.7),
            record(40, 2.0, 0.75),
        ]);
        let baselines = AgeGroupBaselines::aggregate(&dataset);

        let child = baselines.get(AgeGroup::Child).unwrap();
        assert_eq!(child.sample_count, 2);
        assert!((child.beta - 2.0).abs() < 1e-12);
        assert!((child.entropy - 0.6).abs() < 1e-12);
        assert!((child.theta - 3.0).abs() < 1e-12);

        let adult = baselines.get(AgeGroup::Adult).unwrap();
        assert_eq!(adult.sample_count, 1);
        assert!((adult.beta - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_group_is_absent_and_defaults_to_zero() {
        let dataset = EegDataset::new(vec![record(30, 2.0, 0.75)]);
        let baselines = AgeGroupBaselines::aggregate(&dataset);

        assert_eq!(baselines.len(), 1);
        assert!(baselines.get(AgeGroup::Senior).is_none());
        assert_eq!(
            baselines.get_or_default(AgeGroup::Senior),
            BaselineRecord::default()
        );
    }

    #[test]
    fn test_empty_dataset() {
        let baselines = AgeGroupBaselines::aggregate(&EegDataset::default());
        assert!(baselines.is_empty());
        assert_eq!(BaselineRecord::mean_of(std::iter::empty()), BaselineRecord::default());
    }

    #[test]
    fn test_synthetic_trends_visible_in_baselines() {
        let dataset = EegDataset::generate(2000, &mut SeededRandom::new(DEFAULT_SEED));
        let baselines = AgeGroupBaselines::aggregate(&dataset);

        let child = baselines.get_or_default(AgeGroup::Child);
        let senior = baselines.get_or_default(AgeGroup::Senior);
        assert!(child.delta > senior.delta, "delta should decline with age");
        assert!(child.beta < senior.beta, "beta should rise with age");
        assert!(child.entropy < senior.entropy, "entropy should rise then plateau");

        let total: usize = baselines.iter().map(|(_, b)| b.sample_count).sum();
        assert_eq!(total, 2000);
    }

    #[test]
    fn test_json_keys_are_group_names() {
        let dataset = EegDataset::new(vec![record(70, 2.5, 0.8)]);
        let json = serde_json::to_string(&AgeGroupBaselines::aggregate(&dataset)).unwrap();
        assert!(json.contains("\"Senior\""));
        assert!(json.contains("\"Beta\":2.5"));

        let back: AgeGroupBaselines = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get_or_default(AgeGroup::Senior).beta, 2.5);
    }
}
