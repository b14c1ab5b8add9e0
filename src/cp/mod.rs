//! CP-based fixture scheduling formulation.
//!
//! Bridges the league domain models to the boolean [`solver`](crate::solver)
//! contract. Builds a [`CpModel`] from [`Parameters`], solves it with any
//! [`CpSolver`], and decodes the answer into scheduled fixtures.
//!
//! # Formulation
//!
//! One boolean variable per candidate `(fixture, date)`: the home club can
//! host on the date and the away club can travel. Then:
//!
//! 1. **Coverage**: each required fixture takes exactly one of its dates.
//! 2. **Rest**: for each team, the dates it could play on are partitioned
//!    into maximal windows of `min_gap_days` ([`date_windows`]); each window
//!    holds at most one of the team's matches.
//! 3. **Host capacity**: each club hosts at most
//!    `max_concurrent_home_matches` fixtures per date.
//!
//! There is no objective: any satisfying assignment is a valid schedule.
//!
//! Before any constraint is emitted, each team's candidate dates are
//! checked for room: the most dates pairwise more than `min_gap_days`
//! apart (taken earliest first) must cover the team's `2 * (n - 1)`
//! matches. Leagues failing this are rejected as infeasible without search.
//!
//! # Reference
//! - Rasmussen & Trick (2008), "Round robin scheduling – a survey"

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::models::{Fixture, Parameters, ScheduledFixture, Team};
use crate::solver::{BoolVar, CpModel, CpSolver, SimpleCpSolver, SolverConfig, SolverStatus};
use crate::validation::validate_parameters;
use crate::windows::date_windows;

/// Wall-clock limit used by [`solve`].
pub const DEFAULT_TIME_LIMIT_MS: u64 = 60_000;

/// A candidate `(fixture, date)` decision variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Fixture this variable would schedule.
    pub fixture: Fixture,
    /// Date this variable would schedule it on.
    pub date: NaiveDate,
    /// Model variable.
    pub var: BoolVar,
}

/// A built model together with the mapping back to fixtures.
#[derive(Debug, Clone)]
pub struct FixtureModel {
    /// The constraint model handed to the solver.
    pub model: CpModel,
    /// Candidate variables, in declaration order (`candidates[i].var.index() == i`).
    pub candidates: Vec<Candidate>,
    /// Number of fixtures a complete schedule contains.
    pub required_fixtures: usize,
    /// Number of coverage, rest and capacity constraints emitted.
    pub stats: ModelStats,
}

/// Constraint counts per family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    /// Exactly-one constraints (one per required fixture).
    pub coverage: usize,
    /// At-most-one constraints over rest windows.
    pub rest: usize,
    /// At-most-k constraints per club and date.
    pub capacity: usize,
}

/// Variable indices assembled in a single pass over the candidates.
#[derive(Default)]
struct Indices<'a> {
    by_fixture: BTreeMap<(&'a Team, &'a Team), Vec<BoolVar>>,
    by_team_date: BTreeMap<&'a Team, BTreeMap<NaiveDate, Vec<BoolVar>>>,
    by_club_date: BTreeMap<(&'a str, NaiveDate), Vec<BoolVar>>,
}

/// Builds and solves the fixture scheduling model.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use fixture_schedule::cp::FixtureCpBuilder;
/// use fixture_schedule::models::{Parameters, Team};
/// use fixture_schedule::solver::{SimpleCpSolver, SolverConfig};
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 9, day).unwrap();
/// let params = Parameters::new(vec![Team::new(1, "Albany", 1), Team::new(1, "Hackney", 1)])
///     .with_home_dates("Albany", vec![d(1), d(15)])
///     .with_home_dates("Hackney", vec![d(3), d(24)]);
///
/// let fixtures = FixtureCpBuilder::new(&params)
///     .solve(&SimpleCpSolver::new(), &SolverConfig::default())
///     .unwrap();
/// assert_eq!(fixtures.len(), 2);
/// ```
pub struct FixtureCpBuilder<'a> {
    params: &'a Parameters,
}

impl<'a> FixtureCpBuilder<'a> {
    /// Creates a new builder.
    pub fn new(params: &'a Parameters) -> Self {
        Self { params }
    }

    /// Validates the parameters and builds the model.
    ///
    /// # Errors
    /// - [`ScheduleError::Configuration`] if the parameters are malformed.
    /// - [`ScheduleError::Unsatisfiable`] (status `Infeasible`) if some team
    ///   has fewer rest-spaced candidate dates than matches to play.
    pub fn build(&self) -> Result<FixtureModel, ScheduleError> {
        validate_parameters(self.params).map_err(ScheduleError::Configuration)?;

        let params = self.params;
        let mut model = CpModel::new("fixtures");
        let mut candidates = Vec::new();
        let mut indices = Indices::default();
        let mut stats = ModelStats::default();

        // Candidate variables
        let divisions = params.teams_by_division();
        for teams in divisions.values() {
            for &home in teams {
                let home_dates: BTreeSet<NaiveDate> = params
                    .home_dates_for(&home.club)
                    .unwrap_or_default()
                    .iter()
                    .copied()
                    .collect();

                for &away in teams {
                    if home == away {
                        continue;
                    }
                    let fixture_vars = indices.by_fixture.entry((home, away)).or_default();

                    for &date in &home_dates {
                        if params.is_away_blackout(&away.club, date) {
                            continue;
                        }
                        let var = model.new_bool_var(format!("{home}_vs_{away}_{date}"));
                        fixture_vars.push(var);
                        indices
                            .by_team_date
                            .entry(home)
                            .or_default()
                            .entry(date)
                            .or_default()
                            .push(var);
                        indices
                            .by_team_date
                            .entry(away)
                            .or_default()
                            .entry(date)
                            .or_default()
                            .push(var);
                        indices
                            .by_club_date
                            .entry((home.club.as_str(), date))
                            .or_default()
                            .push(var);
                        candidates.push(Candidate {
                            fixture: Fixture::new(home.clone(), away.clone()),
                            date,
                            var,
                        });
                    }
                }
            }
        }

        // Rest packing
        for teams in divisions.values() {
            let required = 2 * teams.len().saturating_sub(1);
            for &team in teams {
                let playable = indices.by_team_date.get(team).map_or(0, |dates| {
                    max_spaced_dates(dates.keys().copied(), params.min_gap_days)
                });
                if playable < required {
                    warn!(team = %team, required, playable, "too few rest-spaced dates");
                    return Err(ScheduleError::Unsatisfiable {
                        status: SolverStatus::Infeasible,
                    });
                }
            }
        }

        // 1. Coverage: every required fixture exactly once, even with no
        //    candidate dates (which makes the model infeasible).
        for ((home, away), vars) in &indices.by_fixture {
            if vars.is_empty() {
                warn!(home = %home, away = %away, "fixture has no eligible date");
            }
            model.add_exactly(format!("cover_{home}_vs_{away}"), vars.clone(), 1);
            stats.coverage += 1;
        }

        // 2. Rest: at most one match per team per window.
        for (team, vars_by_date) in &indices.by_team_date {
            for window in date_windows(vars_by_date.keys().copied(), params.min_gap_days)? {
                let window_vars: Vec<BoolVar> = window
                    .iter()
                    .filter_map(|d| vars_by_date.get(d))
                    .flatten()
                    .copied()
                    .collect();
                if window_vars.len() <= 1 {
                    continue;
                }
                model.add_at_most(format!("rest_{team}_{}", stats.rest), window_vars, 1);
                stats.rest += 1;
            }
        }

        // 3. Host capacity per club and date.
        for ((club, date), vars) in &indices.by_club_date {
            if vars.len() as i64 <= params.max_concurrent_home_matches {
                continue;
            }
            model.add_at_most(
                format!("host_{club}_{date}"),
                vars.clone(),
                params.max_concurrent_home_matches,
            );
            stats.capacity += 1;
        }

        debug!(
            divisions = divisions.len(),
            teams = params.teams.len(),
            fixtures = stats.coverage,
            vars = model.var_count(),
            coverage = stats.coverage,
            rest = stats.rest,
            capacity = stats.capacity,
            "fixture model built"
        );

        Ok(FixtureModel {
            model,
            candidates,
            required_fixtures: stats.coverage,
            stats,
        })
    }

    /// Builds the model, solves it and decodes the schedule.
    ///
    /// # Errors
    /// - [`ScheduleError::Configuration`] if the parameters are malformed.
    /// - [`ScheduleError::Unsatisfiable`] if the solver finds no assignment.
    /// - [`ScheduleError::InconsistentSolution`] if the solver's assignment
    ///   breaks the model.
    pub fn solve<S: CpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<Vec<ScheduledFixture>, ScheduleError> {
        let built = self.build()?;
        let solution = solver.solve(&built.model, config);

        info!(
            solver = solver.name(),
            status = %solution.status,
            nodes = solution.nodes,
            elapsed_ms = solution.elapsed_ms,
            "fixture model solved"
        );

        if !solution.is_solution_found() {
            return Err(ScheduleError::Unsatisfiable {
                status: solution.status,
            });
        }
        if let Some(broken) = built.model.first_violation(&solution.values) {
            return Err(ScheduleError::InconsistentSolution(format!(
                "constraint '{}' does not hold ({} values for {} variables)",
                broken.name,
                solution.values.len(),
                built.model.var_count()
            )));
        }

        Ok(decode_solution(built, &solution.values))
    }
}

/// Most of `dates` (ascending) that are pairwise more than `min_gap_days` apart.
fn max_spaced_dates<I>(dates: I, min_gap_days: i64) -> usize
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut count = 0;
    let mut last: Option<NaiveDate> = None;
    for date in dates {
        if last.map_or(true, |prev| (date - prev).num_days() > min_gap_days) {
            count += 1;
            last = Some(date);
        }
    }
    count
}

/// Collects the true candidates, ordered by date then fixture.
fn decode_solution(built: FixtureModel, values: &[bool]) -> Vec<ScheduledFixture> {
    let mut fixtures: Vec<ScheduledFixture> = built
        .candidates
        .into_iter()
        .filter(|c| values.get(c.var.index()).copied().unwrap_or(false))
        .map(|c| ScheduledFixture::new(c.fixture, c.date))
        .collect();
    fixtures.sort_by(|a, b| (a.date, &a.fixture).cmp(&(b.date, &b.fixture)));
    fixtures
}

/// Schedules the parameters with the bundled [`SimpleCpSolver`], giving up
/// after [`DEFAULT_TIME_LIMIT_MS`].
///
/// # Errors
/// As [`FixtureCpBuilder::solve`]. Hitting the time limit yields
/// [`ScheduleError::Unsatisfiable`] with status `Unknown`.
pub fn solve(params: &Parameters) -> Result<Vec<ScheduledFixture>, ScheduleError> {
    let config = SolverConfig::new().with_time_limit_ms(DEFAULT_TIME_LIMIT_MS);
    solve_with(params, &SimpleCpSolver::new(), &config)
}

/// Schedules the parameters with the given solver and configuration.
pub fn solve_with<S: CpSolver>(
    params: &Parameters,
    solver: &S,
    config: &SolverConfig,
) -> Result<Vec<ScheduledFixture>, ScheduleError> {
    FixtureCpBuilder::new(params).solve(solver, config)
}
