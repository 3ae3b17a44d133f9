//! Category-aware program affinity, kept separate from the live scorer.
//!
//! The live rubric treats program match as a binary 100/50 signal. This
//! graded variant gives partial credit (80) when two different programs
//! share a recovery philosophy, and is used by analysis tooling such as the
//! CLI `score` command. It deliberately does not feed stored
//! `compatibility_score` values: merging it into the live rubric would
//! silently shift every persisted score.

/// Recovery philosophy groupings used for partial credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgramCategory {
    TwelveStep,
    Secular,
    FaithBased,
}

const TWELVE_STEP: [&str; 7] = ["aa", "na", "ca", "ma", "ha", "oa", "al-anon"];
const SECULAR: [&str; 4] = [
    "smart recovery",
    "lifering",
    "secular organizations for sobriety",
    "moderation management",
];
const FAITH_BASED: [&str; 2] = ["celebrate recovery", "calix society"];

fn category(program: &str) -> Option<ProgramCategory> {
    let normalized = program.trim().to_ascii_lowercase();
    let name = normalized.as_str();
    if TWELVE_STEP.contains(&name) {
        Some(ProgramCategory::TwelveStep)
    } else if SECULAR.contains(&name) {
        Some(ProgramCategory::Secular)
    } else if FAITH_BASED.contains(&name) {
        Some(ProgramCategory::FaithBased)
    } else {
        None
    }
}

/// Graded program affinity: 100 for the same program, 80 for different
/// programs in the same category, 50 otherwise.
pub fn program_affinity(a: &str, b: &str) -> u8 {
    if a.trim().eq_ignore_ascii_case(b.trim()) {
        return 100;
    }
    match (category(a), category(b)) {
        (Some(left), Some(right)) if left == right => 80,
        _ => 50,
    }
}
