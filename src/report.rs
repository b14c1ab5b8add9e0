//! Human-readable fixture lists.
//!
//! Groups a schedule by club and by team, in date order, with the number
//! of days since the previous entry. The [`Display`](std::fmt::Display)
//! rendering looks like:
//!
//! ```text
//! Fixtures by club:
//! Albany
//!   Mon 2025-09-01: Albany 1 Home vs Hackney 1
//!   Wed 2025-09-10: Albany 1 Away vs Hackney 1 (+9d)
//!
//! Fixtures by team:
//! Albany 1
//!   Mon 2025-09-01: Home vs Hackney 1
//!   Wed 2025-09-10: Away vs Hackney 1 (+9d)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{ScheduledFixture, Team};

/// Which side of a fixture a team is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Venue {
    /// The team hosts.
    Home,
    /// The team travels.
    Away,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Home => "Home",
            Self::Away => "Away",
        })
    }
}

/// One line of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Match date.
    pub date: NaiveDate,
    /// The club's (or listed) team.
    pub team: Team,
    /// Home or away for `team`.
    pub venue: Venue,
    /// The other team.
    pub opponent: Team,
    /// Days since the previous fixture in the same list. `None` for the first.
    pub gap_days: Option<i64>,
}

/// A schedule grouped for reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureReport {
    by_club: BTreeMap<String, Vec<ReportEntry>>,
    by_team: Vec<(Team, Vec<ReportEntry>)>,
}

impl FixtureReport {
    /// Builds the report.
    pub fn new(fixtures: &[ScheduledFixture]) -> Self {
        let mut sorted: Vec<&ScheduledFixture> = fixtures.iter().collect();
        sorted.sort_by(|a, b| (a.date, &a.fixture).cmp(&(b.date, &b.fixture)));

        let mut by_club: BTreeMap<String, Vec<ReportEntry>> = BTreeMap::new();
        let mut club_last: BTreeMap<&str, NaiveDate> = BTreeMap::new();
        let mut by_team: BTreeMap<(&str, u32, u32), (&Team, Vec<ReportEntry>)> = BTreeMap::new();

        for sf in sorted {
            let home = sf.home_team();
            let away = sf.away_team();
            let sides = [(home, Venue::Home, away), (away, Venue::Away, home)];

            // A club appears once per fixture, even when it provides both teams.
            let mut clubs: Vec<&str> = vec![home.club.as_str(), away.club.as_str()];
            clubs.dedup();
            for club in clubs {
                let gap_days = club_last.insert(club, sf.date).map(|last| (sf.date - last).num_days());
                let entries = by_club.entry(club.to_string()).or_default();
                for (team, venue, opponent) in sides.iter().filter(|(t, _, _)| t.club == club) {
                    entries.push(ReportEntry {
                        date: sf.date,
                        team: (*team).clone(),
                        venue: *venue,
                        opponent: (*opponent).clone(),
                        gap_days,
                    });
                }
            }

            for (team, venue, opponent) in sides {
                let (_, entries) = by_team
                    .entry((team.club.as_str(), team.index, team.division))
                    .or_insert_with(|| (team, Vec::new()));
                let gap_days = entries.last().map(|e| (sf.date - e.date).num_days());
                entries.push(ReportEntry {
                    date: sf.date,
                    team: team.clone(),
                    venue,
                    opponent: opponent.clone(),
                    gap_days,
                });
            }
        }

        Self {
            by_club,
            by_team: by_team
                .into_values()
                .map(|(team, entries)| (team.clone(), entries))
                .collect(),
        }
    }

    /// Entries per club, clubs in name order, entries in date order.
    pub fn by_club(&self) -> &BTreeMap<String, Vec<ReportEntry>> {
        &self.by_club
    }

    /// Entries per team, teams ordered by club then index.
    pub fn by_team(&self) -> &[(Team, Vec<ReportEntry>)] {
        &self.by_team
    }

    /// Entries for a single team.
    pub fn team_entries(&self, team: &Team) -> Option<&[ReportEntry]> {
        self.by_team
            .iter()
            .find(|(t, _)| t == team)
            .map(|(_, entries)| entries.as_slice())
    }
}

fn gap_suffix(gap_days: Option<i64>) -> String {
    gap_days.map(|g| format!(" (+{g}d)")).unwrap_or_default()
}

impl fmt::Display for FixtureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fixtures by club:")?;
        for (club, entries) in &self.by_club {
            writeln!(f, "{club}")?;
            for e in entries {
                writeln!(
                    f,
                    "  {}: {} {} vs {}{}",
                    e.date.format("%a %Y-%m-%d"),
                    e.team,
                    e.venue,
                    e.opponent,
                    gap_suffix(e.gap_days)
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Fixtures by team:")?;
        for (team, entries) in &self.by_team {
            writeln!(f, "{team}")?;
            for e in entries {
                writeln!(
                    f,
                    "  {}: {} vs {}{}",
                    e.date.format("%a %Y-%m-%d"),
                    e.venue,
                    e.opponent,
                    gap_suffix(e.gap_days)
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fixture;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn sample() -> Vec<ScheduledFixture> {
        let albany = Team::new(1, "Albany", 1);
        let hackney = Team::new(1, "Hackney", 1);
        vec![
            ScheduledFixture::new(Fixture::new(hackney.clone(), albany.clone()), d(9, 10)),
            ScheduledFixture::new(Fixture::new(albany, hackney), d(9, 1)),
        ]
    }

    #[test]
    fn test_by_team_sorted_with_gaps() {
        let report = FixtureReport::new(&sample());
        let albany = Team::new(1, "Albany", 1);

        let entries = report.team_entries(&albany).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, d(9, 1));
        assert_eq!(entries[0].venue, Venue::Home);
        assert_eq!(entries[0].gap_days, None);
        assert_eq!(entries[1].venue, Venue::Away);
        assert_eq!(entries[1].gap_days, Some(9));
        assert_eq!(report.by_team()[0].0, albany);
    }

    #[test]
    fn test_same_club_fixture_listed_once() {
        let h2 = Team::new(2, "Hendon", 2);
        let h3 = Team::new(2, "Hendon", 3);
        let fixtures = vec![ScheduledFixture::new(Fixture::new(h2, h3), d(9, 4))];

        let report = FixtureReport::new(&fixtures);
        let hendon = &report.by_club()["Hendon"];
        // One line per Hendon team, not one per club side
        assert_eq!(hendon.len(), 2);
        assert_eq!(hendon[0].venue, Venue::Home);
        assert_eq!(hendon[1].venue, Venue::Away);
    }

    #[test]
    fn test_display() {
        let text = FixtureReport::new(&sample()).to_string();
        let expected = "\
Fixtures by club:
Albany
  Mon 2025-09-01: Albany 1 Home vs Hackney 1
  Wed 2025-09-10: Albany 1 Away vs Hackney 1 (+9d)
Hackney
  Mon 2025-09-01: Hackney 1 Away vs Albany 1
  Wed 2025-09-10: Hackney 1 Home vs Albany 1 (+9d)

Fixtures by team:
Albany 1
  Mon 2025-09-01: Home vs Hackney 1
  Wed 2025-09-10: Away vs Hackney 1 (+9d)
Hackney 1
  Mon 2025-09-01: Away vs Albany 1
  Wed 2025-09-10: Home vs Albany 1 (+9d)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_report() {
        let report = FixtureReport::new(&[]);
        assert!(report.by_club().is_empty());
        assert!(report.by_team().is_empty());
        assert_eq!(report.to_string(), "Fixtures by club:\n\nFixtures by team:\n");
    }
}
