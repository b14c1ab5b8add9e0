//! Input validation and schedule auditing.
//!
//! [`validate_parameters`] checks the structural integrity of scheduling
//! parameters before a model is built. Detects:
//! - Teams whose club has no home-date entry
//! - Negative rest gap or host capacity
//! - Duplicate teams
//!
//! [`audit_schedule`] checks a produced schedule against the parameters it
//! was built from, independently of how it was produced:
//! 1. Every required fixture appears exactly once
//! 2. No team plays twice within `min_gap_days` (matches must be strictly
//!    more than `min_gap_days` apart, the rule the model enforces)
//! 3. No club hosts more fixtures on a date than allowed
//! 4. Every fixture is on a host date and not on an away blackout date

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::models::{Fixture, Parameters, ScheduledFixture, Team, Violation, ViolationType};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The same team is listed twice.
    DuplicateTeam,
    /// A team's club has no entry in the home-dates mapping.
    MissingHomeDates,
    /// A numeric setting that must be non-negative is negative.
    NegativeValue,
    /// A fraction lies outside `[0, 1]`.
    FractionOutOfRange,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates scheduling parameters.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_parameters(params: &Parameters) -> ValidationResult {
    let mut errors = Vec::new();

    if params.min_gap_days < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("min_gap_days must be non-negative, got {}", params.min_gap_days),
        ));
    }

    if params.max_concurrent_home_matches < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!(
                "max_concurrent_home_matches must be non-negative, got {}",
                params.max_concurrent_home_matches
            ),
        ));
    }

    let mut seen = HashSet::new();
    let mut reported_clubs = HashSet::new();
    for team in &params.teams {
        if !seen.insert(team) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTeam,
                format!("Duplicate team: {} (division {})", team, team.division),
            ));
        }

        if !params.home_dates.contains_key(&team.club) && reported_clubs.insert(&team.club) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingHomeDates,
                format!("Club '{}' (team {}) has no home dates entry", team.club, team),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Audits a schedule against the parameters it should satisfy.
///
/// Returns every violation found; an empty list means the schedule is a
/// complete, valid solution.
pub fn audit_schedule(params: &Parameters, fixtures: &[ScheduledFixture]) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Coverage
    let mut counts: HashMap<&Fixture, usize> = HashMap::new();
    for sf in fixtures {
        *counts.entry(&sf.fixture).or_insert(0) += 1;
    }
    let required = params.required_fixtures();
    for fixture in &required {
        match counts.get(fixture).copied().unwrap_or(0) {
            0 => violations.push(Violation::new(
                ViolationType::MissingFixture,
                fixture.to_string(),
                format!("Fixture {fixture} is not scheduled"),
            )),
            1 => {}
            n => violations.push(Violation::new(
                ViolationType::DuplicateFixture,
                fixture.to_string(),
                format!("Fixture {fixture} is scheduled {n} times"),
            )),
        }
    }

    let required: HashSet<&Fixture> = required.iter().collect();
    for sf in fixtures {
        let f = &sf.fixture;
        if f.home_team == f.away_team || f.home_team.division != f.away_team.division {
            violations.push(Violation::new(
                ViolationType::CrossDivision,
                f.to_string(),
                format!(
                    "Fixture {} pairs division {} with division {}",
                    f, f.home_team.division, f.away_team.division
                ),
            ));
        } else if !required.contains(f) {
            // Same division but at least one team is not entered.
            violations.push(Violation::new(
                ViolationType::UnexpectedFixture,
                f.to_string(),
                format!("Fixture {f} is not required by the parameters"),
            ));
        }

        let host_ok = params
            .home_dates_for(sf.host_club())
            .is_some_and(|dates| dates.contains(&sf.date));
        if !host_ok {
            violations.push(Violation::new(
                ViolationType::NotHomeDate,
                sf.host_club(),
                format!("{} cannot host {} on {}", sf.host_club(), f, sf.date),
            ));
        }

        if params.is_away_blackout(&sf.away_team().club, sf.date) {
            violations.push(Violation::new(
                ViolationType::AwayBlackout,
                sf.away_team().club.as_str(),
                format!(
                    "{} cannot travel on {} for {}",
                    sf.away_team().club,
                    sf.date,
                    f
                ),
            ));
        }
    }

    // Rest gaps
    let mut team_dates: BTreeMap<&Team, Vec<NaiveDate>> = BTreeMap::new();
    for sf in fixtures {
        team_dates.entry(sf.home_team()).or_default().push(sf.date);
        team_dates.entry(sf.away_team()).or_default().push(sf.date);
    }
    for (team, dates) in &mut team_dates {
        dates.sort();
        for pair in dates.windows(2) {
            let gap = (pair[1] - pair[0]).num_days();
            if gap <= params.min_gap_days.max(0) {
                violations.push(Violation::new(
                    ViolationType::RestGap,
                    team.to_string(),
                    format!(
                        "{} plays on {} and {} ({} days apart, must be more than {})",
                        team, pair[0], pair[1], gap, params.min_gap_days
                    ),
                ));
            }
        }
    }

    // Host capacity
    let mut hosted: BTreeMap<(&str, NaiveDate), i64> = BTreeMap::new();
    for sf in fixtures {
        *hosted.entry((sf.host_club(), sf.date)).or_insert(0) += 1;
    }
    for ((club, date), count) in hosted {
        if count > params.max_concurrent_home_matches {
            violations.push(Violation::new(
                ViolationType::CapacityExceeded,
                club,
                format!(
                    "{} hosts {} fixtures on {} (limit {})",
                    club, count, date, params.max_concurrent_home_matches
                ),
            ));
        }
    }

    violations
}
