//! League scheduling domain models.
//!
//! Provides the value types for describing a fixture scheduling problem
//! and its solution.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Team`] | A club's team entered in one division |
//! | [`Fixture`] | Directed home/away pairing within a division |
//! | [`ScheduledFixture`] | A fixture bound to a match date |
//! | [`Parameters`] | Teams, venue dates, blackouts, rest and capacity limits |
//! | [`Violation`] | A rule broken by a candidate schedule |

mod parameters;
mod schedule;
mod team;

pub use parameters::{Parameters, DEFAULT_MAX_CONCURRENT_HOME_MATCHES, DEFAULT_MIN_GAP_DAYS};
pub use schedule::{ScheduledFixture, Violation, ViolationType};
pub use team::{Fixture, Team};
