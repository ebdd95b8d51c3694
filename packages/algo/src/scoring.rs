//! Benchmark Scorer
//!
//! Compares a user's behavioral composite against the EEG benchmark of their
//! age group.
//!
//! Pipeline:
//! 1. Age group from [`AgeGroup::from_age`]
//! 2. Group baseline, all zero when the group is absent
//! 3. `neural_benchmark = clamp(beta * 20 + entropy * 50)`
//! 4. `rxn_score = clamp((1000 - reaction_time_ms) / 8)`
//! 5. `overall = mean(memory, rxn, attention, spatial, symbol_match)`
//! 6. State from `overall - neural_benchmark` against +/-10
//! 7. `focus_index = beta / theta`, rounded to 2 decimals
//!
//! Scoring is pure. Readiness of the baselines is checked by the caller (see
//! [`crate::artifacts::ModelRegistry::analyze`]) before this module runs.

use serde::{Deserialize, Serialize};

use crate::baseline::{AgeGroupBaselines, BaselineRecord};
use crate::interpret::interpretation;
use crate::sanitize::{clamp_score, round_to, safe_ratio};
use crate::types::{AgeGroup, CognitiveState};

// ==================== Constants ====================

/// Benchmark points per unit of mean Beta power
pub const BETA_WEIGHT: f64 = 20.0;

/// Benchmark points per unit of mean entropy
pub const ENTROPY_WEIGHT: f64 = 50.0;

/// Reaction times at or above this many milliseconds score 0
pub const REACTION_CEILING_MS: f64 = 1000.0;

/// Milliseconds per reaction-score point
pub const REACTION_MS_PER_POINT: f64 = 8.0;

/// Half-width of the "Consistent" band around the benchmark
pub const STATE_MARGIN: f64 = 10.0;

/// Number of behavioral dimensions averaged into the overall score
pub const DIMENSIONS: f64 = 5.0;

// ==================== Input / Output ====================

/// Behavioral test results submitted by a user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSubmission {
    pub name: String,
    pub age: i64,
    pub memory_score: f64,
    /// Mean reaction time in milliseconds
    pub reaction_time: f64,
    pub attention_score: f64,
    #[serde(default)]
    pub spatial_score: f64,
    #[serde(default)]
    pub symbol_match_score: f64,
}

/// Full-precision scorer output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkScore {
    pub age_group: AgeGroup,
    pub baseline: BaselineRecord,
    pub neural_benchmark: f64,
    pub reaction_score: f64,
    pub overall_score: f64,
    pub diff: f64,
    pub state: CognitiveState,
    /// Beta / Theta of the group baseline, 2 decimals
    pub focus_index: f64,
}

/// Typical band powers and headline scores, keyed the way the web client reads them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EegComparison {
    pub user_score: i64,
    pub neural_benchmark: i64,
    pub typical_delta: f64,
    pub typical_theta: f64,
    pub typical_alpha: f64,
    pub typical_beta: f64,
    pub focus_index: f64,
}

/// Response for one submission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub age_group: AgeGroup,
    pub predicted_cognitive_state: CognitiveState,
    pub eeg_comparison: EegComparison,
    pub interpretation: String,
    /// Persistence reference, empty when the result was not stored
    #[serde(default)]
    pub result_id: String,
}

// ==================== Scoring ====================

/// `clamp(0, 100, (1000 - reaction_time_ms) / 8)`
pub fn reaction_score(reaction_time_ms: f64) -> f64 {
    clamp_score((REACTION_CEILING_MS - reaction_time_ms) / REACTION_MS_PER_POINT)
}

/// `clamp(0, 100, beta * 20 + entropy * 50)`
pub fn neural_benchmark(baseline: &BaselineRecord) -> f64 {
    clamp_score(baseline.beta * BETA_WEIGHT + baseline.entropy * ENTROPY_WEIGHT)
}

/// Strict inequalities: a difference of exactly +/-10 stays `Consistent`
pub fn classify_state(diff: f64) -> CognitiveState {
    if diff > STATE_MARGIN {
        CognitiveState::Excelling
    } else if diff < -STATE_MARGIN {
        CognitiveState::NeedsImprovement
    } else {
        CognitiveState::Consistent
    }
}

/// Score a submission against the baseline map.
///
/// A group missing from `baselines` scores against an all-zero record.
pub fn score_submission(submission: &UserSubmission, baselines: &AgeGroupBaselines) -> BenchmarkScore {
    let age_group = AgeGroup::from_age(submission.age);
    let baseline = baselines.get_or_default(age_group);

    let neural_benchmark = neural_benchmark(&baseline);
    let reaction_score = reaction_score(submission.reaction_time);
    let overall_score = (submission.memory_score
        + reaction_score
        + submission.attention_score
        + submission.spatial_score
        + submission.symbol_match_score)
        / DIMENSIONS;

    let diff = overall_score - neural_benchmark;
    let focus_index = round_to(safe_ratio(baseline.beta, baseline.theta), 2);

    BenchmarkScore {
        age_group,
        baseline,
        neural_benchmark,
        reaction_score,
        overall_score,
        diff,
        state: classify_state(diff),
        focus_index,
    }
}

impl BenchmarkScore {
    pub fn interpretation(&self) -> String {
        interpretation(self.overall_score, self.age_group, self.neural_benchmark, self.state)
    }

    pub fn comparison(&self) -> EegComparison {
        EegComparison {
            user_score: self.overall_score as i64,
            neural_benchmark: self.neural_benchmark as i64,
            typical_delta: self.baseline.delta,
            typical_theta: self.baseline.theta,
            typical_alpha: self.baseline.alpha,
            typical_beta: self.baseline.beta,
            focus_index: self.focus_index,
        }
    }

    /// Render the response; `result_id` starts empty until persisted
    pub fn to_result(&self) -> AnalysisResult {
        AnalysisResult {
            age_group: self.age_group,
            predicted_cognitive_state: self.state,
            eeg_comparison: self.comparison(),
            interpretation: self.interpretation(),
            result_id: String::new(),
        }
    }
}

/// Score and render in one step
pub fn analyze(submission: &UserSubmission, baselines: &AgeGroupBaselines) -> AnalysisResult {
    score_submission(submission, baselines).to_result()
}

// ==================== Persistence Event ====================

/// Per-dimension scores as stored by the persistence collaborator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub memory_score: f64,
    pub reaction_score: f64,
    pub attention_score: f64,
    pub spatial_score: f64,
    pub symbol_match_score: f64,
    pub overall_score: f64,
}

/// Everything an external store needs to record one scored submission.
///
/// The timestamp is supplied by the caller so scoring itself stays pure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultEvent {
    pub name: String,
    pub age: i64,
    pub age_group: AgeGroup,
    pub scores: ScoreBreakdown,
    pub neural_benchmark: f64,
    pub focus_index: f64,
    pub predicted_state: CognitiveState,
    pub interpretation: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

impl ResultEvent {
    pub fn new(submission: &UserSubmission, score: &BenchmarkScore, timestamp_ms: i64) -> Self {
        Self {
            name: submission.name.clone(),
            age: submission.age,
            age_group: score.age_group,
            scores: ScoreBreakdown {
                memory_score: submission.memory_score,
                reaction_score: score.reaction_score,
                attention_score: submission.attention_score,
                spatial_score: submission.spatial_score,
                symbol_match_score: submission.symbol_match_score,
                overall_score: score.overall_score,
            },
            neural_benchmark: score.neural_benchmark,
            focus_index: score.focus_index,
            predicted_state: score.state,
            interpretation: score.interpretation(),
            timestamp_ms,
        }
    }
}
