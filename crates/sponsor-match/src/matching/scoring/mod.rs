mod config;
mod explanation;
mod factors;

pub use config::ScoringWeights;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CandidateProfile, MatchCriteria};

/// Stateless scorer applying the weighted five-factor rubric to a
/// (requester criteria, candidate profile) pair. Deterministic: the caller
/// supplies `today`, so no wall-clock reads happen inside scoring.
pub struct CompatibilityScorer {
    weights: ScoringWeights,
}

impl CompatibilityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        criteria: &MatchCriteria,
        candidate: &CandidateProfile,
        today: NaiveDate,
    ) -> CompatibilityReport {
        let factors = CompatibilityFactors {
            recovery_program_match: factors::recovery_program_match(
                &criteria.recovery_program,
                &candidate.recovery_program,
            ),
            location_proximity: factors::location_proximity(
                &criteria.location,
                &candidate.location,
            ),
            availability_overlap: factors::availability_overlap(
                &criteria.availability,
                &candidate.availability,
            ),
            preference_alignment: factors::preference_alignment(
                &criteria.preferences,
                &candidate.preferences,
            ),
            experience_level: factors::experience_level(candidate.sobriety_start_date, today),
        };

        let weighted = f64::from(factors.recovery_program_match) * self.weights.recovery_program
            + f64::from(factors.location_proximity) * self.weights.location
            + f64::from(factors.availability_overlap) * self.weights.availability
            + f64::from(factors.preference_alignment) * self.weights.preferences
            + f64::from(factors.experience_level) * self.weights.experience;
        let total_score = weighted.round().clamp(0.0, 100.0) as u8;

        let explanation = explanation::describe(&factors);

        CompatibilityReport {
            total_score,
            factors,
            explanation,
        }
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

/// The five independently computed sub-scores, each on a 0-100 scale. Never
/// persisted separately from the rolled-up total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityFactors {
    pub recovery_program_match: u8,
    pub location_proximity: u8,
    pub availability_overlap: u8,
    pub preference_alignment: u8,
    pub experience_level: u8,
}

/// Scorer output: rolled-up total, the factor breakdown, and a short
/// human-readable explanation for the suggestion card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub total_score: u8,
    pub factors: CompatibilityFactors,
    pub explanation: String,
}
