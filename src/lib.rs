//! Round-robin league fixture scheduling.
//!
//! Given teams grouped into divisions, the nights each club can host, and
//! the nights each club cannot travel, produces a double round-robin
//! schedule: every team in a division hosts every other team once, with a
//! minimum rest gap between a team's matches and a cap on the fixtures a
//! club hosts on one night.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `Fixture`, `Parameters`,
//!   `ScheduledFixture`, `Violation`
//! - **`windows`**: Maximal date windows used for rest constraints
//! - **`solver`**: Boolean constraint model and the `CpSolver` contract,
//!   with the bundled `SimpleCpSolver`
//! - **`cp`**: Fixture formulation (coverage, rest, host capacity) and
//!   decoding
//! - **`validation`**: Parameter checks and schedule audits
//! - **`calendar`**: Home-night generation from weekly rules
//! - **`report`**: Per-club and per-team fixture lists
//!
//! # Example
//! ```
//! use chrono::NaiveDate;
//! use fixture_schedule::models::{Parameters, Team};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2025, 9, day).unwrap();
//! let params = Parameters::new(vec![Team::new(1, "Albany", 1), Team::new(1, "Hackney", 1)])
//!     .with_home_dates("Albany", vec![d(1), d(15)])
//!     .with_home_dates("Hackney", vec![d(3), d(24)])
//!     .with_min_gap_days(7);
//!
//! let fixtures = fixture_schedule::solve(&params).unwrap();
//! assert_eq!(fixtures.len(), 2);
//! assert!(fixture_schedule::validation::audit_schedule(&params, &fixtures).is_empty());
//! ```
//!
//! # References
//!
//! - Rasmussen & Trick (2008), "Round robin scheduling – a survey"
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

pub mod calendar;
pub mod cp;
pub mod error;
pub mod models;
pub mod report;
pub mod solver;
pub mod validation;
pub mod windows;

pub use cp::{solve, solve_with, FixtureCpBuilder};
pub use error::ScheduleError;
