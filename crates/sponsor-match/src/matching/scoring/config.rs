use serde::{Deserialize, Serialize};

/// Weights applied to each compatibility factor. The defaults are the
/// production constants; they sum to 1.0 so the weighted total stays on the
/// 0-100 scale of the individual factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub recovery_program: f64,
    pub location: f64,
    pub availability: f64,
    pub preferences: f64,
    pub experience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            recovery_program: 0.30,
            location: 0.20,
            availability: 0.20,
            preferences: 0.15,
            experience: 0.15,
        }
    }
}
