use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use sponsor_match::matching::{
    CandidateProfile, Clock, CompatibilityScorer, Location, MatchCriteria, MatchId,
    MatchLifecycleService, MatchPolicy, MatchRecord, MatchRepository, MatchStatus,
    RepositoryError, SponsorRole, UserId,
};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
struct MemoryRepository {
    records: Mutex<HashMap<MatchId, MatchRecord>>,
}

impl MatchRepository for MemoryRepository {
    fn insert(&self, record: MatchRecord) -> Result<MatchRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.user_id == record.user_id && existing.candidate_id == record.candidate_id
        });
        if duplicate || guard.contains_key(&record.id) {
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
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned())
    }

    fn find_pair(
        &self,
        user_id: &UserId,
        candidate_id: &UserId,
    ) -> Result<Option<MatchRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .find(|record| record.user_id == *user_id && record.candidate_id == *candidate_id)
            .cloned())
    }

    fn list_suggested(&self, user_id: &UserId) -> Result<Vec<MatchRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .filter(|record| record.user_id == *user_id && record.status == MatchStatus::Suggested)
            .cloned()
            .collect())
    }

    fn count_requested_since(
        &self,
        user_id: &UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .filter(|record| {
                record.user_id == *user_id
                    && record.status == MatchStatus::Requested
                    && record.requested_at.is_some_and(|at| at >= cutoff)
            })
            .count())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 14, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn service() -> MatchLifecycleService<MemoryRepository> {
    MatchLifecycleService::new(
        Arc::new(MemoryRepository::default()),
        CompatibilityScorer::default(),
        MatchPolicy::default(),
        Arc::new(FixedClock(now())),
    )
}

fn criteria() -> MatchCriteria {
    MatchCriteria {
        recovery_program: "AA".to_string(),
        location: Location {
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            country: "USA".to_string(),
        },
        availability: vec!["Weekday Evenings".to_string()],
        preferences: BTreeMap::new(),
    }
}

fn sponsor(program: &str, city: &str, days_sober: i64) -> CandidateProfile {
    CandidateProfile {
        user_id: UserId(Uuid::new_v4()),
        recovery_program: program.to_string(),
        location: Location {
            city: Some(city.to_string()),
            state: Some("IL".to_string()),
            country: "USA".to_string(),
        },
        availability: vec!["Weekday Evenings".to_string()],
        sobriety_start_date: Some(now().date_naive() - Duration::days(days_sober)),
        preferences: BTreeMap::new(),
        role: SponsorRole::Sponsor,
    }
}

#[test]
fn suggest_rank_request_accept_flow() {
    let service = service();
    let requester = UserId(Uuid::new_v4());

    let strong = sponsor("AA", "Springfield", 400);
    let weaker = sponsor("NA", "Chicago", 40);

    let strong_match = service
        .suggest(requester, &criteria(), &strong)
        .expect("strong suggestion stored");
    let weaker_match = service
        .suggest(requester, &criteria(), &weaker)
        .expect("weaker suggestion stored");
    assert!(strong_match.compatibility_score > weaker_match.compatibility_score);

    let ranked = service.list_suggested(&requester).expect("list succeeds");
    assert_eq!(ranked[0].id, strong_match.id);
    assert_eq!(ranked[1].id, weaker_match.id);

    let requested = service
        .request_connection(&strong_match.id, &requester)
        .expect("request succeeds");
    assert_eq!(requested.status, MatchStatus::Requested);
    assert_eq!(requested.requested_at, Some(now()));

    // The requested match leaves the suggestion list; the score is frozen.
    let remaining = service.list_suggested(&requester).expect("list succeeds");
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        remaining[0].compatibility_score,
        weaker_match.compatibility_score
    );

    let connected = service
        .accept_connection(&strong_match.id, &strong.user_id)
        .expect("candidate accepts");
    assert_eq!(connected.status, MatchStatus::Connected);
    assert_eq!(connected.connected_at, Some(now()));
    assert_eq!(connected.requested_at, Some(now()));
    assert_eq!(
        connected.compatibility_score,
        strong_match.compatibility_score
    );
}

#[test]
fn declined_pair_stays_terminal() {
    let service = service();
    let requester = UserId(Uuid::new_v4());
    let profile = sponsor("AA", "Springfield", 365);

    let suggestion = service
        .suggest(requester, &criteria(), &profile)
        .expect("suggestion stored");
    let declined = service
        .decline(&suggestion.id, &requester)
        .expect("decline succeeds");
    assert_eq!(declined.status, MatchStatus::Declined);

    // The pair's single row blocks any re-suggestion.
    assert!(service.suggest(requester, &criteria(), &profile).is_err());
    // And the declined match cannot be revived.
    assert!(service
        .request_connection(&suggestion.id, &requester)
        .is_err());
}
