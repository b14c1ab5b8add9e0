//! Team and fixture models.
//!
//! A team belongs to exactly one club and plays in exactly one division.
//! Clubs may field several teams, distinguished by a per-club index
//! ("Hendon 1", "Hendon 2", ...). A fixture is a directed pairing: the
//! first team hosts, the second travels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A team entered in a league division.
///
/// Identity is the full `(division, club, index)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team {
    /// Division the team plays in.
    pub division: u32,
    /// Owning club (also the venue for home fixtures).
    pub club: String,
    /// Team number within the club.
    pub index: u32,
}

impl Team {
    /// Creates a new team.
    pub fn new(division: u32, club: impl Into<String>, index: u32) -> Self {
        Self {
            division,
            club: club.into(),
            index,
        }
    }

    /// Display name, e.g. `"Hendon 2"`.
    pub fn name(&self) -> String {
        format!("{} {}", self.club, self.index)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A directed home/away pairing of two teams in the same division.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fixture {
    /// Hosting team.
    pub home_team: Team,
    /// Travelling team.
    pub away_team: Team,
}

impl Fixture {
    /// Creates a new fixture.
    pub fn new(home_team: Team, away_team: Team) -> Self {
        Self {
            home_team,
            away_team,
        }
    }

    /// Whether `team` plays in this fixture (home or away).
    #[inline]
    pub fn involves(&self, team: &Team) -> bool {
        &self.home_team == team || &self.away_team == team
    }

    /// Division of the home team.
    #[inline]
    pub fn division(&self) -> u32 {
        self.home_team.division
    }

    /// The return fixture (venue swapped).
    pub fn reversed(&self) -> Self {
        Self::new(self.away_team.clone(), self.home_team.clone())
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.home_team, self.away_team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_team_name() {
        let team = Team::new(2, "Willesden & Brent", 1);
        assert_eq!(team.name(), "Willesden & Brent 1");
        assert_eq!(team.to_string(), team.name());
    }

    #[test]
    fn test_team_identity() {
        let a = Team::new(1, "Hendon", 1);
        let b = Team::new(2, "Hendon", 1); // same club and index, other division
        assert_ne!(a, b);

        let set: HashSet<Team> = [a.clone(), b, a.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_fixture_involves() {
        let home = Team::new(1, "Albany", 1);
        let away = Team::new(1, "Hackney", 1);
        let other = Team::new(1, "Hendon", 1);
        let fixture = Fixture::new(home.clone(), away.clone());

        assert!(fixture.involves(&home));
        assert!(fixture.involves(&away));
        assert!(!fixture.involves(&other));
        assert_eq!(fixture.division(), 1);
    }

    #[test]
    fn test_fixture_reversed() {
        let fixture = Fixture::new(Team::new(1, "Albany", 1), Team::new(1, "Hackney", 1));
        let back = fixture.reversed();

        assert_ne!(fixture, back);
        assert_eq!(back.home_team, fixture.away_team);
        assert_eq!(back.reversed(), fixture);
        assert_eq!(fixture.to_string(), "Albany 1 vs Hackney 1");
    }
}
