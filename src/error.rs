//! Crate error type.

use thiserror::Error;

use crate::solver::SolverStatus;
use crate::validation::ValidationError;

/// Errors returned by scheduling operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Parameters are structurally invalid. Raised before any model is built.
    #[error("invalid configuration: {}", join_messages(.0))]
    Configuration(Vec<ValidationError>),

    /// The model has no assignment satisfying every constraint, or the
    /// solver stopped before finding one.
    #[error("no feasible schedule (solver status: {status})")]
    Unsatisfiable { status: SolverStatus },

    /// The solver reported success with an assignment that breaks the model.
    #[error("solver returned an inconsistent assignment: {0}")]
    InconsistentSolution(String),
}

impl ScheduleError {
    /// Wraps a single validation error.
    pub fn configuration(error: ValidationError) -> Self {
        Self::Configuration(vec![error])
    }

    /// Whether this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this is an unsatisfiability error.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::Unsatisfiable { .. })
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
