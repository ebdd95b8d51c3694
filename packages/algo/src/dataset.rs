//! Dataset Assembler
//!
//! Draws ages, synthesizes one feature vector per age and labels each row with
//! its [`AgeGroup`]. Tables round-trip through CSV for the offline pipeline.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::random::RandomSource;
use crate::synth::synthesize;
use crate::types::{AgeGroup, EegRecord, MAX_AGE, MIN_AGE};

/// Labeled synthetic EEG table
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EegDataset {
    pub records: Vec<EegRecord>,
}

impl EegDataset {
    pub fn new(records: Vec<EegRecord>) -> Self {
        Self { records }
    }

    /// Generate `n_samples` rows.
    ///
    /// All ages are drawn first, then one feature vector per age in order.
    pub fn generate<R: RandomSource>(n_samples: usize, rng: &mut R) -> Self {
        let ages: Vec<u32> = (0..n_samples)
            .map(|_| rng.uniform_age(MIN_AGE, MAX_AGE))
            .collect();

        let records = ages
            .into_iter()
            .map(|age| EegRecord::new(age, synthesize(age, rng)))
            .collect();

        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row count per age group; groups without rows are omitted
    pub fn group_counts(&self) -> BTreeMap<AgeGroup, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.age_group).or_insert(0) += 1;
        }
        counts
    }

    /// Write the table as CSV with a header row
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let file = File::create(path.as_ref())?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table written by [`EegDataset::write_csv`].
    ///
    /// A nonexistent path is reported as [`EngineError::InputDataMissing`].
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::InputDataMissing(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));
        let records = reader
            .deserialize::<EegRecord>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use crate::types::DEFAULT_SEED;

    #[test]
    fn test_generate_size_and_labels() {
        let mut rng = SeededRandom::new(DEFAULT_SEED);
        let dataset = EegDataset::generate(500, &mut rng);

        assert_eq!(dataset.len(), 500);
        for record in &dataset.records {
            assert!((MIN_AGE..=MAX_AGE).contains(&record.age));
            assert_eq!(record.age_group, AgeGroup::from_age(record.age as i64));
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = EegDataset::generate(300, &mut SeededRandom::new(DEFAULT_SEED));
        let b = EegDataset::generate(300, &mut SeededRandom::new(DEFAULT_SEED));
        assert_eq!(a, b);

        let c = EegDataset::generate(300, &mut SeededRandom::new(DEFAULT_SEED + 1));
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_covers_every_group() {
        let dataset = EegDataset::generate(2000, &mut SeededRandom::new(DEFAULT_SEED));
        let counts = dataset.group_counts();
        for group in AgeGroup::ALL {
            assert!(counts.get(&group).copied().unwrap_or(0) > 0, "{group} missing");
        }
        assert_eq!(counts.values().sum::<usize>(), 2000);
    }

    #[test]
    fn test_empty_generation() {
        let dataset = EegDataset::generate(0, &mut SeededRandom::default());
        assert!(dataset.is_empty());
        assert!(dataset.group_counts().is_empty());
    }

    #[test]
    fn test_csv_roundtrip_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eeg_data.csv");
        let dataset = EegDataset::generate(50, &mut SeededRandom::new(DEFAULT_SEED));

        dataset.write_csv(&path).unwrap();
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with(
            "Age,Delta,Theta,Alpha,Beta,Theta_Alpha,Alpha_Beta,Entropy,AgeGroup"
        ));
        assert!(header.starts_with(&format!("Age,{},AgeGroup", crate::types::FEATURE_NAMES.join(","))));

        let loaded = EegDataset::read_csv(&path).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = EegDataset::read_csv(&path).unwrap_err();
        assert!(matches!(err, EngineError::InputDataMissing(p) if p == path));
    }
}
