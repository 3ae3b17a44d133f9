use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use sponsor_match::matching::{
    MatchId, MatchRecord, MatchRepository, MatchStatus, RepositoryError, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded map standing in for the hosted match store. The lock
/// serializes the quota read-then-write, so in-process the daily limit
/// behaves as a hard cap.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchRepository {
    records: Arc<Mutex<HashMap<MatchId, MatchRecord>>>,
}

impl MatchRepository for InMemoryMatchRepository {
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
            .filter(|record| record.user_id == *user_id && record.status == MatchStatus::Suggested)
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

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
