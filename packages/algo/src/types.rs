//! Common Types and Constants
//!
//! Shared data structures used across the synthesizer, aggregator, classifier
//! and scorer.

use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Constants ====================

/// Seed used for batch dataset generation and classifier training
pub const DEFAULT_SEED: u64 = 42;

/// Default number of synthetic subjects per dataset
pub const DEFAULT_SAMPLE_COUNT: usize = 2000;

/// Youngest synthetic subject (inclusive)
pub const MIN_AGE: u32 = 6;

/// Oldest synthetic subject (inclusive)
pub const MAX_AGE: u32 = 80;

/// Lower bound applied to every band power
pub const BAND_POWER_FLOOR: f64 = 0.5;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

/// Number of classifier input features
pub const FEATURE_COUNT: usize = 7;

/// Feature column names, in classifier input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Delta",
    "Theta",
    "Alpha",
    "Beta",
    "Theta_Alpha",
    "Alpha_Beta",
    "Entropy",
];

// ==================== Age Groups ====================

/// Age bracket derived from a subject's age.
///
/// [`AgeGroup::from_age`] is the only age-to-group mapping in the crate. The
/// dataset labels, the baseline keys and the scorer lookup all go through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    Adolescent,
    Adult,
    Senior,
}

impl AgeGroup {
    /// All groups in ascending age order
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Child,
        AgeGroup::Adolescent,
        AgeGroup::Adult,
        AgeGroup::Senior,
    ];

    /// Map an age in years to its group.
    ///
    /// Thresholds: `<= 12` Child, `13..=18` Adolescent, `19..=60` Adult,
    /// `> 60` Senior. Total over all integers.
    pub fn from_age(age: i64) -> Self {
        if age <= 12 {
            AgeGroup::Child
        } else if age <= 18 {
            AgeGroup::Adolescent
        } else if age <= 60 {
            AgeGroup::Adult
        } else {
            AgeGroup::Senior
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Child => "Child",
            AgeGroup::Adolescent => "Adolescent",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Child" => Some(AgeGroup::Child),
            "Adolescent" => Some(AgeGroup::Adolescent),
            "Adult" => Some(AgeGroup::Adult),
            "Senior" => Some(AgeGroup::Senior),
            _ => None,
        }
    }

    /// Dense class index used by the classifier
    pub fn to_index(&self) -> usize {
        match self {
            AgeGroup::Child => 0,
            AgeGroup::Adolescent => 1,
            AgeGroup::Adult => 2,
            AgeGroup::Senior => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== EEG Features ====================

/// Simulated band-power profile of one subject
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EegFeatures {
    /// Delta band power (>= 0.5)
    pub delta: f64,
    /// Theta band power (>= 0.5)
    pub theta: f64,
    /// Alpha band power (>= 0.5)
    pub alpha: f64,
    /// Beta band power (>= 0.5)
    pub beta: f64,
    /// Theta / Alpha, 0 when Alpha <= 0
    pub theta_alpha: f64,
    /// Alpha / Beta, 0 when Beta <= 0
    pub alpha_beta: f64,
    /// Signal complexity proxy, not floored
    pub entropy: f64,
}

impl EegFeatures {
    /// Classifier input vector, ordered as [`FEATURE_NAMES`]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.delta,
            self.theta,
            self.alpha,
            self.beta,
            self.theta_alpha,
            self.alpha_beta,
            self.entropy,
        ]
    }
}

/// One labeled row of the synthetic dataset.
///
/// Serialized field names match the CSV header
/// `Age,Delta,Theta,Alpha,Beta,Theta_Alpha,Alpha_Beta,Entropy,AgeGroup`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EegRecord {
    #[serde(rename = "Age")]
    pub age: u32,
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
    #[serde(rename = "AgeGroup")]
    pub age_group: AgeGroup,
}

impl EegRecord {
    pub fn new(age: u32, features: EegFeatures) -> Self {
        Self {
            age,
            delta: features.delta,
            theta: features.theta,
            alpha: features.alpha,
            beta: features.beta,
            theta_alpha: features.theta_alpha,
            alpha_beta: features.alpha_beta,
            entropy: features.entropy,
            age_group: AgeGroup::from_age(age as i64),
        }
    }

    pub fn features(&self) -> EegFeatures {
        EegFeatures {
            delta: self.delta,
            theta: self.theta,
            alpha: self.alpha,
            beta: self.beta,
            theta_alpha: self.theta_alpha,
            alpha_beta: self.alpha_beta,
            entropy: self.entropy,
        }
    }
}

// ==================== Cognitive State ====================

/// Verdict comparing a user's behavioral score with the group benchmark
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CognitiveState {
    Excelling,
    Consistent,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl CognitiveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CognitiveState::Excelling => "Excelling",
            CognitiveState::Consistent => "Consistent",
            CognitiveState::NeedsImprovement => "Needs Improvement",
        }
    }

    /// Verb phrase used by the interpretation sentence
    pub fn trend(&self) -> &'static str {
        match self {
            CognitiveState::Excelling => "exceeds",
            CognitiveState::Consistent => "aligns with",
            CognitiveState::NeedsImprovement => "falls below",
        }
    }
}

impl fmt::Display for CognitiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
