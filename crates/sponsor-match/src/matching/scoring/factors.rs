use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::super::domain::{Location, PreferenceMap};

/// Slot labels that mean "any schedule works". Either party advertising one
/// of these short-circuits the overlap calculation.
const FLEXIBLE_SENTINELS: [&str; 2] = ["anytime", "flexible"];

/// Fixed placeholder until per-field preference comparison ships.
const PREFERENCE_DEFAULT: u8 = 75;

/// Neutral sub-score used when an optional input is missing or malformed.
const NEUTRAL: u8 = 50;

pub(crate) fn recovery_program_match(requested: &str, candidate: &str) -> u8 {
    if requested.trim().eq_ignore_ascii_case(candidate.trim()) {
        100
    } else {
        50
    }
}

pub(crate) fn location_proximity(requester: &Location, candidate: &Location) -> u8 {
    if !field_matches(Some(&requester.country), Some(&candidate.country)) {
        return 0;
    }
    if !field_matches(requester.state.as_deref(), candidate.state.as_deref()) {
        return 50;
    }
    if !field_matches(requester.city.as_deref(), candidate.city.as_deref()) {
        return 75;
    }
    100
}

fn field_matches(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

pub(crate) fn availability_overlap(requester: &[String], candidate: &[String]) -> u8 {
    if is_flexible(requester) || is_flexible(candidate) {
        return 100;
    }

    let requester_slots = normalized_slots(requester);
    if requester_slots.is_empty() {
        return NEUTRAL;
    }

    let candidate_slots = normalized_slots(candidate);
    let overlap = requester_slots.intersection(&candidate_slots).count();
    let ratio = overlap as f64 / requester_slots.len() as f64 * 100.0;
    ratio.round().min(100.0) as u8
}

fn is_flexible(slots: &[String]) -> bool {
    slots.iter().any(|slot| {
        let slot = slot.trim().to_ascii_lowercase();
        FLEXIBLE_SENTINELS.contains(&slot.as_str())
    })
}

fn normalized_slots(slots: &[String]) -> BTreeSet<String> {
    slots
        .iter()
        .map(|slot| slot.trim().to_ascii_lowercase())
        .filter(|slot| !slot.is_empty())
        .collect()
}

pub(crate) fn preference_alignment(_requester: &PreferenceMap, _candidate: &PreferenceMap) -> u8 {
    // TODO(matching): replace with per-key PreferenceValue::aligns_with
    // comparison once profile preferences carry structured data in
    // production.
    PREFERENCE_DEFAULT
}

pub(crate) fn experience_level(sobriety_start: Option<NaiveDate>, today: NaiveDate) -> u8 {
    let Some(start) = sobriety_start else {
        return NEUTRAL;
    };

    let days = (today - start).num_days();
    if days >= 365 {
        100
    } else if days >= 180 {
        85
    } else if days >= 90 {
        70
    } else if days >= 30 {
        55
    } else {
        40
    }
}
