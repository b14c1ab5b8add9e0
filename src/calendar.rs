//! Synthetic season calendars.
//!
//! Produces candidate home dates and away blackout dates for the scheduler
//! from declarative rules: "every Thursday except the first of each month",
//! "every Tuesday outside December", "half of all Thursdays, at random".
//!
//! A [`LeagueConfig`] combines a [`Season`], the teams, and one
//! [`DateRule`] per club into ready-to-solve [`Parameters`]. Nothing here
//! is compiled in: rosters and calendars come from the caller, typically
//! deserialized from a configuration file.
//!
//! # Occurrence numbering
//! The nth occurrence of a weekday is counted within its calendar month
//! (days 1-7 are the first occurrence, 8-14 the second, ...), independent
//! of where the season starts.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::ScheduleError;
use crate::models::{Parameters, Team, DEFAULT_MAX_CONCURRENT_HOME_MATCHES, DEFAULT_MIN_GAP_DAYS};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Occurrence of `date`'s weekday within its calendar month (1-based).
///
/// Counted from the 1st of the month, never from a season or range start:
/// the 15th is always a third occurrence.
#[inline]
pub fn month_occurrence(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// Every `weekday` in `[from, to]`, skipping the listed monthly occurrences.
///
/// Occurrences follow [`month_occurrence`], so a range starting mid-month
/// does not renumber that month: with `from` on the 10th, excluding `[1]`
/// skips nothing in the first month.
///
/// # Example
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use fixture_schedule::calendar::weekly_dates;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
/// // Tuesdays in Jan-Feb 2025 without the 1st and 3rd of each month
/// let dates = weekly_dates(d(1, 1), d(2, 28), Weekday::Tue, &[1, 3]);
/// assert_eq!(dates, vec![d(1, 14), d(1, 28), d(2, 11), d(2, 25)]);
/// ```
pub fn weekly_dates(
    from: NaiveDate,
    to: NaiveDate,
    weekday: Weekday,
    exclude_month_occurrences: &[u32],
) -> Vec<NaiveDate> {
    let offset =
        (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    let mut current = from.checked_add_days(Days::new(u64::from(offset)));

    let mut result = Vec::new();
    while let Some(date) = current.filter(|d| *d <= to) {
        if !exclude_month_occurrences.contains(&month_occurrence(date)) {
            result.push(date);
        }
        current = date.checked_add_days(Days::new(7));
    }
    result
}

/// Randomly drops a fraction of `dates`.
///
/// Keeps `floor(len * (1 - drop_fraction))` dates, returned sorted.
///
/// # Errors
/// [`ScheduleError::Configuration`] if `drop_fraction` is outside `[0, 1]`.
pub fn thin_dates<R>(
    dates: &[NaiveDate],
    drop_fraction: f64,
    rng: &mut R,
) -> Result<Vec<NaiveDate>, ScheduleError>
where
    R: Rng + ?Sized,
{
    if !(0.0..=1.0).contains(&drop_fraction) {
        return Err(ScheduleError::configuration(ValidationError::new(
            ValidationErrorKind::FractionOutOfRange,
            format!("drop fraction must be within [0, 1], got {drop_fraction}"),
        )));
    }

    let keep = (dates.len() as f64 * (1.0 - drop_fraction)) as usize;
    let mut result = dates.to_vec();
    result.shuffle(rng);
    result.truncate(keep);
    result.sort_unstable();
    Ok(result)
}

/// A declarative rule for a club's dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRule {
    /// Day of the week.
    pub weekday: Weekday,
    /// Monthly occurrences to skip (1 = first of the month).
    #[serde(default)]
    pub exclude_month_occurrences: Vec<u32>,
    /// Months to skip entirely (1 = January).
    #[serde(default)]
    pub exclude_months: Vec<u32>,
    /// Fraction of the remaining dates to drop at random.
    #[serde(default)]
    pub drop_fraction: f64,
}

impl DateRule {
    /// Every occurrence of `weekday`.
    pub fn weekly(weekday: Weekday) -> Self {
        Self {
            weekday,
            exclude_month_occurrences: Vec::new(),
            exclude_months: Vec::new(),
            drop_fraction: 0.0,
        }
    }

    /// Skips the given monthly occurrences.
    pub fn except_occurrences(mut self, occurrences: Vec<u32>) -> Self {
        self.exclude_month_occurrences = occurrences;
        self
    }

    /// Skips the given months.
    pub fn except_months(mut self, months: Vec<u32>) -> Self {
        self.exclude_months = months;
        self
    }

    /// Drops a random fraction of the dates.
    pub fn thinned(mut self, drop_fraction: f64) -> Self {
        self.drop_fraction = drop_fraction;
        self
    }
}

/// First and last day (inclusive) on which fixtures may be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl Season {
    /// Creates a season.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Every `weekday` in the season.
    pub fn weekly(&self, weekday: Weekday) -> Vec<NaiveDate> {
        weekly_dates(self.start, self.end, weekday, &[])
    }

    /// The season's dates matching `rule`.
    ///
    /// # Errors
    /// [`ScheduleError::Configuration`] if the rule's drop fraction is outside `[0, 1]`.
    pub fn dates<R>(&self, rule: &DateRule, rng: &mut R) -> Result<Vec<NaiveDate>, ScheduleError>
    where
        R: Rng + ?Sized,
    {
        let dates: Vec<NaiveDate> = weekly_dates(
            self.start,
            self.end,
            rule.weekday,
            &rule.exclude_month_occurrences,
        )
        .into_iter()
        .filter(|d| !rule.exclude_months.contains(&d.month()))
        .collect();

        if rule.drop_fraction == 0.0 {
            return Ok(dates);
        }
        thin_dates(&dates, rule.drop_fraction, rng)
    }
}

/// A league description from which scheduling parameters are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// Playing season.
    pub season: Season,
    /// Entered teams.
    pub teams: Vec<Team>,
    /// Club → rule for its home nights.
    pub home_nights: BTreeMap<String, DateRule>,
    /// Club → rule for dates its teams cannot travel.
    #[serde(default)]
    pub away_blackouts: BTreeMap<String, DateRule>,
    /// Minimum rest gap in days.
    #[serde(default = "default_min_gap_days")]
    pub min_gap_days: i64,
    /// Host capacity per club per date.
    #[serde(default = "default_max_concurrent_home_matches")]
    pub max_concurrent_home_matches: i64,
}

fn default_min_gap_days() -> i64 {
    DEFAULT_MIN_GAP_DAYS
}

fn default_max_concurrent_home_matches() -> i64 {
    DEFAULT_MAX_CONCURRENT_HOME_MATCHES
}

impl LeagueConfig {
    /// Generates scheduling parameters, drawing random thinning from `rng`.
    ///
    /// Rules are evaluated in club order, so a seeded `rng` gives
    /// reproducible parameters.
    ///
    /// # Errors
    /// [`ScheduleError::Configuration`] if a rule's drop fraction is invalid.
    pub fn build_parameters<R>(&self, rng: &mut R) -> Result<Parameters, ScheduleError>
    where
        R: Rng + ?Sized,
    {
        let mut params = Parameters::new(self.teams.clone())
            .with_min_gap_days(self.min_gap_days)
            .with_max_concurrent_home_matches(self.max_concurrent_home_matches);

        for (club, rule) in &self.home_nights {
            let dates = self.season.dates(rule, rng)?;
            debug!(club = %club, dates = dates.len(), "home dates generated");
            params = params.with_home_dates(club.clone(), dates);
        }
        for (club, rule) in &self.away_blackouts {
            let dates = self.season.dates(rule, rng)?;
            debug!(club = %club, dates = dates.len(), "away blackouts generated");
            params = params.with_unavailable_away_dates(club.clone(), dates);
        }

        Ok(params)
    }
}
