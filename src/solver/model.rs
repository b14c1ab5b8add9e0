//! Boolean constraint model.
//!
//! A model is a set of boolean decision variables plus linear constraints
//! of the form `lower <= x_1 + x_2 + ... + x_n <= upper`, every coefficient
//! being 1. This is all a fixture schedule needs: exact cover ("exactly
//! one date per fixture") and cardinality limits ("at most one match per
//! rest window", "at most k home fixtures per club and date").

use serde::{Deserialize, Serialize};

/// Handle to a boolean variable of a [`CpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoolVar(usize);

impl BoolVar {
    /// Position of the variable in its model (and in solution value vectors).
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// `lower <= sum(vars) <= upper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// Label for diagnostics.
    pub name: String,
    /// Summed variables.
    pub vars: Vec<BoolVar>,
    /// Inclusive lower bound on the number of true variables.
    pub lower: i64,
    /// Inclusive upper bound on the number of true variables.
    pub upper: i64,
}

impl LinearConstraint {
    /// Whether the constraint holds under `values`.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        let ones = self
            .vars
            .iter()
            .filter(|v| values.get(v.index()).copied().unwrap_or(false))
            .count() as i64;
        self.lower <= ones && ones <= self.upper
    }
}

/// A boolean satisfaction model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpModel {
    name: String,
    var_names: Vec<String>,
    constraints: Vec<LinearConstraint>,
}

impl CpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_names: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a new boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        self.var_names.push(name.into());
        BoolVar(self.var_names.len() - 1)
    }

    /// Adds `lower <= sum(vars) <= upper`.
    pub fn add_linear(
        &mut self,
        name: impl Into<String>,
        vars: Vec<BoolVar>,
        lower: i64,
        upper: i64,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            vars,
            lower,
            upper,
        });
    }

    /// Adds `sum(vars) == count`.
    pub fn add_exactly(&mut self, name: impl Into<String>, vars: Vec<BoolVar>, count: i64) {
        self.add_linear(name, vars, count, count);
    }

    /// Adds `sum(vars) <= max`.
    pub fn add_at_most(&mut self, name: impl Into<String>, vars: Vec<BoolVar>, max: i64) {
        self.add_linear(name, vars, 0, max);
    }

    /// Number of declared variables.
    pub fn var_count(&self) -> usize {
        self.var_names.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// All constraints, in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Name a variable was declared with.
    pub fn var_name(&self, var: BoolVar) -> Option<&str> {
        self.var_names.get(var.index()).map(String::as_str)
    }

    /// First constraint violated by `values`, if any.
    ///
    /// A value vector of the wrong length is reported as a violation of
    /// the first constraint.
    pub fn first_violation(&self, values: &[bool]) -> Option<&LinearConstraint> {
        if values.len() != self.var_count() {
            return self.constraints.first();
        }
        self.constraints.iter().find(|c| !c.is_satisfied_by(values))
    }

    /// Whether `values` (one per variable) satisfies every constraint.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        values.len() == self.var_count() && self.first_violation(values).is_none()
    }
}
