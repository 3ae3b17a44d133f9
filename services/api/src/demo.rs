use chrono::{Local, NaiveDate};
use clap::Args;
use std::collections::BTreeMap;
use uuid::Uuid;

use sponsor_match::error::AppError;
use sponsor_match::matching::analysis::program_affinity;
use sponsor_match::matching::{
    CandidateProfile, CompatibilityScorer, Location, MatchCriteria, ScoringWeights, SponsorRole,
    UserId,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Requester's recovery program
    #[arg(long, default_value = "AA")]
    pub(crate) program: String,
    /// Requester location as CITY,STATE,COUNTRY
    #[arg(long, default_value = "Springfield,IL,USA")]
    pub(crate) location: String,
    /// Requester availability slot (repeat for multiple)
    #[arg(long = "slot", default_value = "Weekday Evenings")]
    pub(crate) slots: Vec<String>,
    /// Candidate's recovery program
    #[arg(long, default_value = "AA")]
    pub(crate) candidate_program: String,
    /// Candidate location as CITY,STATE,COUNTRY
    #[arg(long, default_value = "Springfield,IL,USA")]
    pub(crate) candidate_location: String,
    /// Candidate availability slot (repeat for multiple)
    #[arg(long = "candidate-slot", default_value = "Flexible")]
    pub(crate) candidate_slots: Vec<String>,
    /// Candidate sobriety start date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) sobriety_start: Option<NaiveDate>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let criteria = MatchCriteria {
        recovery_program: args.program.clone(),
        location: parse_location(&args.location),
        availability: args.slots.clone(),
        preferences: BTreeMap::new(),
    };
    let candidate = CandidateProfile {
        user_id: UserId(Uuid::new_v4()),
        recovery_program: args.candidate_program.clone(),
        location: parse_location(&args.candidate_location),
        availability: args.candidate_slots.clone(),
        sobriety_start_date: args.sobriety_start,
        preferences: BTreeMap::new(),
        role: SponsorRole::Sponsor,
    };

    let scorer = CompatibilityScorer::new(ScoringWeights::default());
    let report = scorer.score(&criteria, &candidate, Local::now().date_naive());

    println!("Compatibility: {}/100", report.total_score);
    println!("  program match      {}", report.factors.recovery_program_match);
    println!("  location proximity {}", report.factors.location_proximity);
    println!("  availability       {}", report.factors.availability_overlap);
    println!("  preferences        {}", report.factors.preference_alignment);
    println!("  experience         {}", report.factors.experience_level);
    println!("Why: {}", report.explanation);

    let affinity = program_affinity(&args.program, &args.candidate_program);
    println!(
        "Category-aware program affinity (analysis only): {affinity}/100"
    );

    Ok(())
}

/// CITY,STATE,COUNTRY with leading fields optional: "Springfield,IL,USA",
/// "IL,USA", or just "USA".
fn parse_location(raw: &str) -> Location {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [city, state, country] => Location {
            city: Some((*city).to_string()),
            state: Some((*state).to_string()),
            country: (*country).to_string(),
        },
        [state, country] => Location {
            city: None,
            state: Some((*state).to_string()),
            country: (*country).to_string(),
        },
        [country] => Location {
            city: None,
            state: None,
            country: (*country).to_string(),
        },
        _ => Location {
            city: None,
            state: None,
            country: raw.trim().to_string(),
        },
    }
}
