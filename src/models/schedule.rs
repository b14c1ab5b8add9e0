//! Scheduled fixtures and schedule violations.
//!
//! A schedule is the list of fixtures, each bound to one date. Violations
//! describe ways in which a list of scheduled fixtures fails to be a valid
//! schedule for a set of parameters (see [`crate::validation::audit_schedule`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Fixture, Team};

/// A fixture bound to a match date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduledFixture {
    /// The pairing being played.
    pub fixture: Fixture,
    /// Match date (always one of the host club's home dates).
    pub date: NaiveDate,
}

impl ScheduledFixture {
    /// Creates a new scheduled fixture.
    pub fn new(fixture: Fixture, date: NaiveDate) -> Self {
        Self { fixture, date }
    }

    /// Hosting team.
    #[inline]
    pub fn home_team(&self) -> &Team {
        &self.fixture.home_team
    }

    /// Travelling team.
    #[inline]
    pub fn away_team(&self) -> &Team {
        &self.fixture.away_team
    }

    /// Club providing the venue.
    #[inline]
    pub fn host_club(&self) -> &str {
        &self.fixture.home_team.club
    }
}

/// A rule broken by a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (team, club or fixture display name).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// A required fixture is not scheduled.
    MissingFixture,
    /// A fixture is scheduled more than once.
    DuplicateFixture,
    /// A fixture involves a team that is not entered.
    UnexpectedFixture,
    /// A fixture pairs teams from different divisions (or a team with itself).
    CrossDivision,
    /// A team plays twice within the minimum rest gap.
    RestGap,
    /// A club hosts more fixtures on one date than allowed.
    CapacityExceeded,
    /// A fixture is on a date the home club cannot host.
    NotHomeDate,
    /// A fixture is on a date the away club cannot travel.
    AwayBlackout,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_fixture_accessors() {
        let home = Team::new(1, "Albany", 1);
        let away = Team::new(1, "Hackney", 1);
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let sf = ScheduledFixture::new(Fixture::new(home.clone(), away.clone()), date);

        assert_eq!(sf.home_team(), &home);
        assert_eq!(sf.away_team(), &away);
        assert_eq!(sf.host_club(), "Albany");
        assert_eq!(sf.date, date);
    }

    #[test]
    fn test_violation_new() {
        let v = Violation::new(ViolationType::RestGap, "Albany 1", "too close");
        assert_eq!(v.violation_type, ViolationType::RestGap);
        assert_eq!(v.entity_id, "Albany 1");
        assert_eq!(v.message, "too close");
    }
}
