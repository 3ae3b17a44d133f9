use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::matching::domain::{
    CandidateProfile, Location, MatchCriteria, MatchId, MatchRecord, MatchStatus, SponsorRole,
    UserId,
};
use crate::matching::repository::{MatchRepository, RepositoryError};
use crate::matching::router::match_router;
use crate::matching::scoring::{CompatibilityScorer, ScoringWeights};
use crate::matching::service::{Clock, MatchLifecycleService, MatchPolicy};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 14, 15, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn today() -> NaiveDate {
    fixed_now().date_naive()
}

pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn user_id() -> UserId {
    UserId(Uuid::new_v4())
}

pub(super) fn springfield() -> Location {
    Location {
        city: Some("Springfield".to_string()),
        state: Some("IL".to_string()),
        country: "USA".to_string(),
    }
}

pub(super) fn criteria() -> MatchCriteria {
    MatchCriteria {
        recovery_program: "AA".to_string(),
        location: springfield(),
        availability: vec!["Weekday Evenings".to_string()],
        preferences: BTreeMap::new(),
    }
}

/// Candidate matching the worked example: same program, same city, full
/// availability overlap, 400 days sober. Scores 96 against `criteria()`.
pub(super) fn candidate(user_id: UserId) -> CandidateProfile {
    CandidateProfile {
        user_id,
        recovery_program: "AA".to_string(),
        location: springfield(),
        availability: vec![
            "Weekday Evenings".to_string(),
            "Weekend Mornings".to_string(),
        ],
        sobriety_start_date: Some(today() - Duration::days(400)),
        preferences: BTreeMap::new(),
        role: SponsorRole::Sponsor,
    }
}

pub(super) fn scorer() -> CompatibilityScorer {
    CompatibilityScorer::new(ScoringWeights::default())
}

pub(super) fn suggested_record(user_id: UserId, candidate_id: UserId, score: u8) -> MatchRecord {
    MatchRecord {
        id: MatchId::generate(),
        user_id,
        candidate_id,
        compatibility_score: score,
        status: MatchStatus::Suggested,
        last_shown_at: Some(fixed_now()),
        requested_at: None,
        declined_at: None,
        connected_at: None,
    }
}

pub(super) fn requested_record(
    user_id: UserId,
    candidate_id: UserId,
    requested_at: DateTime<Utc>,
) -> MatchRecord {
    MatchRecord {
        id: MatchId::generate(),
        user_id,
        candidate_id,
        compatibility_score: 80,
        status: MatchStatus::Requested,
        last_shown_at: Some(requested_at),
        requested_at: Some(requested_at),
        declined_at: None,
        connected_at: None,
    }
}

pub(super) fn build_service() -> (
    MatchLifecycleService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = MatchLifecycleService::new(
        repository.clone(),
        scorer(),
        MatchPolicy::default(),
        Arc::new(FixedClock(fixed_now())),
    );
    (service, repository)
}

pub(super) fn build_router() -> (axum::Router, Arc<MemoryRepository>) {
    let (service, repository) = build_service();
    (match_router(Arc::new(service)), repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<MatchId, MatchRecord>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, record: MatchRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.id, record);
    }

    pub(super) fn get(&self, id: &MatchId) -> Option<MatchRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl MatchRepository for MemoryRepository {
    fn insert(&self, record: MatchRecord) -> Result<MatchRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let duplicate_pair = guard.values().any(|existing| {
            existing.user_id == record.user_id && existing.candidate_id == record.candidate_id
        });
        if duplicate_pair || guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, record: MatchRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &MatchId) -> Result<Option<MatchRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_pair(
        &self,
        user_id: &UserId,
        candidate_id: &UserId,
    ) -> Result<Option<MatchRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| record.user_id == *user_id && record.candidate_id == *candidate_id)
            .cloned())
    }

    fn list_suggested(&self, user_id: &UserId) -> Result<Vec<MatchRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.user_id == *user_id && record.status == MatchStatus::Suggested
            })
            .cloned()
            .collect())
    }

    fn count_requested_since(
        &self,
        user_id: &UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.user_id == *user_id
                    && record.status == MatchStatus::Requested
                    && record.requested_at.is_some_and(|at| at >= cutoff)
            })
            .count())
    }
}

pub(super) struct UnavailableRepository;

impl MatchRepository for UnavailableRepository {
    fn insert(&self, _record: MatchRecord) -> Result<MatchRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: MatchRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &MatchId) -> Result<Option<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_pair(
        &self,
        _user_id: &UserId,
        _candidate_id: &UserId,
    ) -> Result<Option<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_suggested(&self, _user_id: &UserId) -> Result<Vec<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count_requested_since(
        &self,
        _user_id: &UserId,
        _cutoff: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
