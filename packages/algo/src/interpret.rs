use crate::types::{AgeGroup, CognitiveState};

/// Render the verdict sentence. Scores are truncated toward zero.
pub fn interpretation(
    overall_score: f64,
    age_group: AgeGroup,
    neural_benchmark: f64,
    state: CognitiveState,
) -> String {
    format!(
        "Your cognitive profile across 5 dimensions (Memory, Reaction, Attention, Spatial, Processing) \
         yields an aggregate score of {}/100. \
         Compared to the '{}' EEG benchmark ({}/100) derived from typical Beta/Entropy levels, \
         your performance {} expected patterns.",
        overall_score as i64,
        age_group,
        neural_benchmark as i64,
        state.trend(),
    )
}
