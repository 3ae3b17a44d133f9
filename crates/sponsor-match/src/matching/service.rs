use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    CandidateProfile, MatchCriteria, MatchId, MatchRecord, MatchStatus, MatchView, UserId,
};
use super::repository::{MatchRepository, RepositoryError};
use super::scoring::CompatibilityScorer;

/// Clock seam so quota windows and experience scoring are testable with a
/// fixed now.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Business-rule knobs for the lifecycle service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Outbound connection requests allowed per UTC day.
    pub daily_request_limit: u8,
    /// Days after a decline before the cooldown expiry shown to clients.
    pub decline_cooldown_days: u16,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            daily_request_limit: 5,
            decline_cooldown_days: 30,
        }
    }
}

/// Service owning all match state transitions. The scorer has no other
/// consumer: every stored `compatibility_score` is produced here at
/// suggestion time and never recalculated.
pub struct MatchLifecycleService<R> {
    repository: Arc<R>,
    scorer: CompatibilityScorer,
    policy: MatchPolicy,
    clock: Arc<dyn Clock>,
}

impl<R> MatchLifecycleService<R>
where
    R: MatchRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        scorer: CompatibilityScorer,
        policy: MatchPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            scorer,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Score a candidate against the requester's criteria and persist a new
    /// suggested match. The score is fixed here for the record's lifetime.
    pub fn suggest(
        &self,
        user_id: UserId,
        criteria: &MatchCriteria,
        candidate: &CandidateProfile,
    ) -> Result<MatchRecord, MatchServiceError> {
        if user_id == candidate.user_id {
            return Err(MatchServiceError::Validation(
                "a user cannot be matched with themselves".to_string(),
            ));
        }
        if self
            .repository
            .find_pair(&user_id, &candidate.user_id)?
            .is_some()
        {
            return Err(MatchServiceError::Repository(RepositoryError::Conflict));
        }

        let now = self.clock.now();
        let report = self.scorer.score(criteria, candidate, now.date_naive());

        let record = MatchRecord {
            id: MatchId::generate(),
            user_id,
            candidate_id: candidate.user_id,
            compatibility_score: report.total_score,
            status: MatchStatus::Suggested,
            last_shown_at: Some(now),
            requested_at: None,
            declined_at: None,
            connected_at: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            match_id = %stored.id.0,
            score = stored.compatibility_score,
            "suggested match created"
        );
        Ok(stored)
    }

    /// Suggested matches for the user, highest compatibility first. Ties
    /// may land in any order.
    pub fn list_suggested(&self, user_id: &UserId) -> Result<Vec<MatchRecord>, MatchServiceError> {
        let mut matches = self.repository.list_suggested(user_id)?;
        matches.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));
        Ok(matches)
    }

    /// Transition suggested -> requested for a match the user owns,
    /// enforcing the daily outbound request quota. Quota counting and the
    /// write are not atomic across processes; the limit is best-effort
    /// under concurrent sessions (the backing store would need a
    /// serializable transaction for a hard guarantee).
    pub fn request_connection(
        &self,
        match_id: &MatchId,
        user_id: &UserId,
    ) -> Result<MatchRecord, MatchServiceError> {
        let mut record = self.owned_match(match_id, user_id, Ownership::Requester)?;
        ensure_transition(&record, MatchStatus::Requested)?;

        let now = self.clock.now();
        let sent_today = self
            .repository
            .count_requested_since(user_id, start_of_utc_day(now))?;
        let limit = usize::from(self.policy.daily_request_limit);
        if sent_today >= limit {
            warn!(user_id = %user_id.0, sent_today, limit, "daily request quota reached");
            return Err(MatchServiceError::QuotaExceeded {
                count: sent_today,
                limit,
            });
        }

        record.status = MatchStatus::Requested;
        record.requested_at = Some(now);
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Transition suggested -> declined. The cooldown expiry is derived on
    /// read, not enforced as a re-suggestion filter.
    pub fn decline(
        &self,
        match_id: &MatchId,
        user_id: &UserId,
    ) -> Result<MatchRecord, MatchServiceError> {
        let mut record = self.owned_match(match_id, user_id, Ownership::Requester)?;
        ensure_transition(&record, MatchStatus::Declined)?;

        record.status = MatchStatus::Declined;
        record.declined_at = Some(self.clock.now());
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Transition requested -> connected, invoked from the candidate's side
    /// when they accept the request.
    pub fn accept_connection(
        &self,
        match_id: &MatchId,
        candidate_id: &UserId,
    ) -> Result<MatchRecord, MatchServiceError> {
        let mut record = self.owned_match(match_id, candidate_id, Ownership::Candidate)?;
        ensure_transition(&record, MatchStatus::Connected)?;

        record.status = MatchStatus::Connected;
        record.connected_at = Some(self.clock.now());
        self.repository.update(record.clone())?;
        Ok(record)
    }

    pub fn view(&self, record: &MatchRecord) -> MatchView {
        record.view(self.policy.decline_cooldown_days)
    }

    fn owned_match(
        &self,
        match_id: &MatchId,
        owner: &UserId,
        side: Ownership,
    ) -> Result<MatchRecord, MatchServiceError> {
        let record = self
            .repository
            .fetch(match_id)?
            .ok_or(MatchServiceError::NotFound)?;
        let actual_owner = match side {
            Ownership::Requester => record.user_id,
            Ownership::Candidate => record.candidate_id,
        };
        if actual_owner != *owner {
            return Err(MatchServiceError::Forbidden);
        }
        Ok(record)
    }
}

enum Ownership {
    Requester,
    Candidate,
}

fn ensure_transition(record: &MatchRecord, to: MatchStatus) -> Result<(), MatchServiceError> {
    if record.status.can_transition(to) {
        Ok(())
    } else {
        Err(MatchServiceError::InvalidTransition {
            from: record.status.label(),
            to: to.label(),
        })
    }
}

/// Midnight of the current UTC day; the quota window boundary.
fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Error raised by the lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Daily connection request limit reached ({count}/{limit}). Try again tomorrow.")]
    QuotaExceeded { count: usize, limit: usize },
    #[error("match not found")]
    NotFound,
    #[error("match belongs to another user")]
    Forbidden,
    #[error("cannot transition a {from} match to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
