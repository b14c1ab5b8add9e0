//! Scheduling parameters (problem input).
//!
//! Everything a single solve needs: the teams, each club's candidate home
//! dates, the dates on which each club's teams cannot travel, and the two
//! numeric limits (rest gap and host capacity).
//!
//! Parameters are plain data. They deserialize from any serde format, so a
//! caller can keep a season's configuration in a file:
//!
//! ```
//! use fixture_schedule::models::Parameters;
//!
//! let json = r#"{
//!     "teams": [
//!         { "division": 1, "club": "Albany", "index": 1 },
//!         { "division": 1, "club": "Hackney", "index": 1 }
//!     ],
//!     "home_dates": {
//!         "Albany": ["2025-09-01", "2025-09-15"],
//!         "Hackney": ["2025-09-03"]
//!     }
//! }"#;
//! let params: Parameters = serde_json::from_str(json).unwrap();
//! assert_eq!(params.min_gap_days, 7);
//! assert_eq!(params.max_concurrent_home_matches, 2);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Fixture, Team};

/// Default minimum number of days between two matches of the same team.
pub const DEFAULT_MIN_GAP_DAYS: i64 = 7;

/// Default number of home fixtures a club can host on one date.
pub const DEFAULT_MAX_CONCURRENT_HOME_MATCHES: i64 = 2;

/// Input configuration for a fixture schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// All teams, across all divisions.
    pub teams: Vec<Team>,
    /// Club → dates on which the club can host.
    pub home_dates: BTreeMap<String, Vec<NaiveDate>>,
    /// Club → dates on which the club's teams cannot play away.
    #[serde(default)]
    pub unavailable_away_dates: BTreeMap<String, Vec<NaiveDate>>,
    /// Two matches of the same team must be at least this many days apart.
    #[serde(default = "default_min_gap_days")]
    pub min_gap_days: i64,
    /// Upper bound on home fixtures per club per date.
    #[serde(default = "default_max_concurrent_home_matches")]
    pub max_concurrent_home_matches: i64,
}

fn default_min_gap_days() -> i64 {
    DEFAULT_MIN_GAP_DAYS
}

fn default_max_concurrent_home_matches() -> i64 {
    DEFAULT_MAX_CONCURRENT_HOME_MATCHES
}

impl Parameters {
    /// Creates parameters for the given teams with no dates and default limits.
    pub fn new(teams: Vec<Team>) -> Self {
        Self {
            teams,
            home_dates: BTreeMap::new(),
            unavailable_away_dates: BTreeMap::new(),
            min_gap_days: DEFAULT_MIN_GAP_DAYS,
            max_concurrent_home_matches: DEFAULT_MAX_CONCURRENT_HOME_MATCHES,
        }
    }

    /// Sets the candidate home dates of a club.
    pub fn with_home_dates(mut self, club: impl Into<String>, dates: Vec<NaiveDate>) -> Self {
        self.home_dates.insert(club.into(), dates);
        self
    }

    /// Sets the away blackout dates of a club.
    pub fn with_unavailable_away_dates(
        mut self,
        club: impl Into<String>,
        dates: Vec<NaiveDate>,
    ) -> Self {
        self.unavailable_away_dates.insert(club.into(), dates);
        self
    }

    /// Sets the minimum rest gap in days.
    pub fn with_min_gap_days(mut self, days: i64) -> Self {
        self.min_gap_days = days;
        self
    }

    /// Sets the host capacity per club per date.
    pub fn with_max_concurrent_home_matches(mut self, max: i64) -> Self {
        self.max_concurrent_home_matches = max;
        self
    }

    /// Teams grouped by division, in input order within each division.
    pub fn teams_by_division(&self) -> BTreeMap<u32, Vec<&Team>> {
        let mut map: BTreeMap<u32, Vec<&Team>> = BTreeMap::new();
        for team in &self.teams {
            map.entry(team.division).or_default().push(team);
        }
        map
    }

    /// Every fixture a complete schedule must contain: one per ordered
    /// pair of distinct teams sharing a division.
    pub fn required_fixtures(&self) -> Vec<Fixture> {
        let mut fixtures = Vec::new();
        for teams in self.teams_by_division().values() {
            for home in teams {
                for away in teams {
                    if home != away {
                        fixtures.push(Fixture::new((*home).clone(), (*away).clone()));
                    }
                }
            }
        }
        fixtures
    }

    /// Candidate home dates of a club, if configured.
    pub fn home_dates_for(&self, club: &str) -> Option<&[NaiveDate]> {
        self.home_dates.get(club).map(Vec::as_slice)
    }

    /// Whether the club's teams cannot travel on `date`.
    pub fn is_away_blackout(&self, club: &str, date: NaiveDate) -> bool {
        self.unavailable_away_dates
            .get(club)
            .is_some_and(|dates| dates.contains(&date))
    }
}
