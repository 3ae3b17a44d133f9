use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for registered users on either side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

/// Identifier wrapper for persisted match records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Coarse place description used for proximity scoring. Country is the only
/// required field; city/state granularity is whatever the profile supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
}

/// Typed value for the free-form preference map, so alignment scoring can
/// consume structured data instead of opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl PreferenceValue {
    /// Comparison contract for preference alignment. Text compares
    /// case-insensitively; numbers within f64 epsilon count as aligned.
    pub fn aligns_with(&self, other: &PreferenceValue) -> bool {
        match (self, other) {
            (PreferenceValue::Boolean(a), PreferenceValue::Boolean(b)) => a == b,
            (PreferenceValue::Number(a), PreferenceValue::Number(b)) => {
                (a - b).abs() < f64::EPSILON
            }
            (PreferenceValue::Text(a), PreferenceValue::Text(b)) => {
                a.trim().eq_ignore_ascii_case(b.trim())
            }
            _ => false,
        }
    }
}

pub type PreferenceMap = BTreeMap<String, PreferenceValue>;

/// Which side of a sponsorship a profile is open to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SponsorRole {
    Sponsor,
    Sponsee,
    Both,
}

/// Candidate profile fields consumed by the scorer. Optional fields degrade
/// to default sub-scores rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub user_id: UserId,
    pub recovery_program: String,
    pub location: Location,
    pub availability: Vec<String>,
    pub sobriety_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub preferences: PreferenceMap,
    pub role: SponsorRole,
}

/// Requester-side criteria, derived from the requesting user's profile per
/// scoring call. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    pub recovery_program: String,
    pub location: Location,
    pub availability: Vec<String>,
    #[serde(default)]
    pub preferences: PreferenceMap,
}

/// Match workflow status. Transitions are monotonic: a match never returns
/// to `Suggested`, and `Declined`/`Connected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Suggested,
    Requested,
    Declined,
    Connected,
}

impl MatchStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MatchStatus::Suggested => "suggested",
            MatchStatus::Requested => "requested",
            MatchStatus::Declined => "declined",
            MatchStatus::Connected => "connected",
        }
    }

    /// Legal transition table: suggested -> requested -> connected, or
    /// suggested -> declined.
    pub const fn can_transition(self, to: MatchStatus) -> bool {
        matches!(
            (self, to),
            (MatchStatus::Suggested, MatchStatus::Requested)
                | (MatchStatus::Suggested, MatchStatus::Declined)
                | (MatchStatus::Requested, MatchStatus::Connected)
        )
    }
}

/// Persisted match record. `compatibility_score` is fixed at creation time
/// and never recalculated; the timestamp for the current status is always
/// populated, and earlier timestamps are kept for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub user_id: UserId,
    pub candidate_id: UserId,
    pub compatibility_score: u8,
    pub status: MatchStatus,
    pub last_shown_at: Option<DateTime<Utc>>,
    pub requested_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub connected_at: Option<DateTime<Utc>>,
}

impl MatchRecord {
    /// Cooldown expiry derived from the decline timestamp. Informational
    /// only: nothing in the matching flow re-filters on it, and a pair's
    /// single match row already prevents re-suggestion.
    pub fn decline_cooldown_expires_at(&self, cooldown_days: u16) -> Option<DateTime<Utc>> {
        self.declined_at
            .map(|declined| declined + Duration::days(i64::from(cooldown_days)))
    }

    pub fn view(&self, cooldown_days: u16) -> MatchView {
        MatchView {
            match_id: self.id,
            user_id: self.user_id,
            candidate_id: self.candidate_id,
            compatibility_score: self.compatibility_score,
            status: self.status.label(),
            last_shown_at: self.last_shown_at,
            requested_at: self.requested_at,
            declined_at: self.declined_at,
            connected_at: self.connected_at,
            decline_cooldown_expires_at: self.decline_cooldown_expires_at(cooldown_days),
        }
    }
}

/// Sanitized representation of a match for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub match_id: MatchId,
    pub user_id: UserId,
    pub candidate_id: UserId,
    pub compatibility_score: u8,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_shown_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decline_cooldown_expires_at: Option<DateTime<Utc>>,
}
