//! Compatibility scoring and match lifecycle management.
//!
//! The scorer produces a deterministic 0-100 score from five weighted
//! factors; the lifecycle service is its only consumer and owns every
//! status transition, the daily request quota, and the decline cooldown
//! bookkeeping.

pub mod analysis;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateProfile, Location, MatchCriteria, MatchId, MatchRecord, MatchStatus, MatchView,
    PreferenceMap, PreferenceValue, SponsorRole, UserId,
};
pub use repository::{MatchRepository, RepositoryError};
pub use router::match_router;
pub use scoring::{CompatibilityFactors, CompatibilityReport, CompatibilityScorer, ScoringWeights};
pub use service::{
    Clock, MatchLifecycleService, MatchPolicy, MatchServiceError, SystemClock,
};
