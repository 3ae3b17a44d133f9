use super::CompatibilityFactors;

/// Qualitative labels surfaced when a factor clears its highlight threshold.
pub(crate) fn describe(factors: &CompatibilityFactors) -> String {
    let mut highlights = Vec::new();

    if factors.recovery_program_match == 100 {
        highlights.push("Same recovery program");
    }
    if factors.location_proximity >= 75 {
        highlights.push("Nearby location");
    }
    if factors.availability_overlap >= 75 {
        highlights.push("Compatible schedules");
    }
    if factors.experience_level >= 85 {
        highlights.push("Experienced in recovery");
    }

    if highlights.is_empty() {
        "Potential match based on your recovery profiles".to_string()
    } else {
        highlights.join(", ")
    }
}
