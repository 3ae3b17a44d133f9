use chrono::{DateTime, Utc};

use super::domain::{MatchId, MatchRecord, UserId};

/// Storage abstraction so the lifecycle service can be exercised in
/// isolation. Implementations must enforce (user, candidate) pair
/// uniqueness on insert.
pub trait MatchRepository: Send + Sync {
    fn insert(&self, record: MatchRecord) -> Result<MatchRecord, RepositoryError>;
    fn update(&self, record: MatchRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &MatchId) -> Result<Option<MatchRecord>, RepositoryError>;
    fn find_pair(
        &self,
        user_id: &UserId,
        candidate_id: &UserId,
    ) -> Result<Option<MatchRecord>, RepositoryError>;
    /// All suggested matches for the user. Ordering is left to the service.
    fn list_suggested(&self, user_id: &UserId) -> Result<Vec<MatchRecord>, RepositoryError>;
    /// Count of the user's matches in `requested` status whose
    /// `requested_at` falls at or after `cutoff`.
    fn count_requested_since(
        &self,
        user_id: &UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures. `Unavailable` carries the
/// backing store's message through verbatim.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("match already exists for this pair")]
    Conflict,
    #[error("match not found")]
    NotFound,
    #[error("match store unavailable: {0}")]
    Unavailable(String),
}
