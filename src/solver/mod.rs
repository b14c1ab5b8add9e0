//! Solver engine contract.
//!
//! The fixture builder talks to a solver only through [`CpSolver`]: it
//! declares boolean variables and coefficient-1 linear constraints on a
//! [`CpModel`], makes one blocking `solve` call, and reads back a value per
//! variable. Any engine honouring that contract can be plugged in.
//!
//! [`SimpleCpSolver`] is the bundled engine: a complete depth-first search
//! with bound propagation, adequate for league-sized instances.
//!
//! # Reference
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming", Ch. 3-4

mod model;
mod simple;

pub use model::{BoolVar, CpModel, LinearConstraint};
pub use simple::SimpleCpSolver;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverStatus {
    /// A solution was found and proven best (any solution, without an objective).
    Optimal,
    /// A solution was found.
    Feasible,
    /// No solution exists.
    Infeasible,
    /// Search stopped (time or node limit) before reaching a conclusion.
    Unknown,
}

impl SolverStatus {
    /// Whether the status carries a usable assignment.
    #[inline]
    pub fn is_solution_found(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Optimal => "optimal",
            Self::Feasible => "feasible",
            Self::Infeasible => "infeasible",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Search limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock limit in milliseconds. `None` = unlimited.
    pub time_limit_ms: Option<u64>,
    /// Maximum number of search nodes. `None` = unlimited.
    pub node_limit: Option<u64>,
}

impl SolverConfig {
    /// Creates an unlimited configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }
}

/// Result of a solve call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpSolution {
    /// Search outcome.
    pub status: SolverStatus,
    /// One value per model variable. Empty unless a solution was found.
    pub values: Vec<bool>,
    /// Search nodes explored.
    pub nodes: u64,
    /// Wall-clock time spent (ms).
    pub elapsed_ms: u64,
}

impl CpSolution {
    /// Creates a solution without an assignment.
    pub fn without_assignment(status: SolverStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            nodes: 0,
            elapsed_ms: 0,
        }
    }

    /// Whether an assignment is available.
    #[inline]
    pub fn is_solution_found(&self) -> bool {
        self.status.is_solution_found()
    }

    /// Value of a variable (false when no assignment is available).
    #[inline]
    pub fn value(&self, var: BoolVar) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }
}

/// A boolean satisfaction engine.
pub trait CpSolver {
    /// Engine name for diagnostics.
    fn name(&self) -> &'static str;

    /// Solves the model. Blocks until a conclusion or a configured limit.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_solution_found() {
        assert!(SolverStatus::Optimal.is_solution_found());
        assert!(SolverStatus::Feasible.is_solution_found());
        assert!(!SolverStatus::Infeasible.is_solution_found());
        assert!(!SolverStatus::Unknown.is_solution_found());
    }

    #[test]
    fn test_config_builder() {
        let config = SolverConfig::new()
            .with_time_limit_ms(500)
            .with_node_limit(10_000);
        assert_eq!(config.time_limit_ms, Some(500));
        assert_eq!(config.node_limit, Some(10_000));
        assert_eq!(SolverConfig::default().time_limit_ms, None);
    }

    #[test]
    fn test_solution_value() {
        let mut model = CpModel::new("m");
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");

        let solution = CpSolution {
            status: SolverStatus::Feasible,
            values: vec![true, false],
            nodes: 1,
            elapsed_ms: 0,
        };
        assert!(solution.value(a));
        assert!(!solution.value(b));

        let none = CpSolution::without_assignment(SolverStatus::Infeasible);
        assert!(!none.is_solution_found());
        assert!(!none.value(a));
    }
}
