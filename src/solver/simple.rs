//! Depth-first search engine for boolean cardinality models.
//!
//! # Algorithm
//!
//! Each constraint tracks how many of its variables are true (`ones`) and
//! how many are unassigned (`free`). After every assignment the touched
//! constraints are propagated:
//!
//! - `ones > upper` or `ones + free < lower` → conflict
//! - `ones == upper` → every free variable is forced false
//! - `ones + free == lower` → every free variable is forced true
//!
//! Branching picks the constraint with an unmet lower bound that has the
//! fewest free variables (most-constrained first) and tries its first free
//! variable true, then false. When no lower bound is unmet, the remaining
//! free variables are set false, which cannot break any upper bound.
//!
//! The search is complete: without limits it always ends in a solution or
//! a proof of infeasibility. Decisions live on an explicit stack, so deep
//! searches do not grow the call stack.

use std::time::{Duration, Instant};

use tracing::debug;

use super::{CpModel, CpSolution, CpSolver, SolverConfig, SolverStatus};

/// Nodes between two wall-clock checks.
const CLOCK_CHECK_INTERVAL: u64 = 64;

/// Complete depth-first search with bound propagation.
///
/// # Example
/// ```
/// use fixture_schedule::solver::{CpModel, CpSolver, SimpleCpSolver, SolverConfig};
///
/// let mut model = CpModel::new("pick-one");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// model.add_exactly("one", vec![a, b], 1);
///
/// let solution = SimpleCpSolver::new().solve(&model, &SolverConfig::default());
/// assert!(solution.is_solution_found());
/// assert!(solution.value(a) ^ solution.value(b));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCpSolver;

impl SimpleCpSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for SimpleCpSolver {
    fn name(&self) -> &'static str {
        "simple-dfs"
    }

    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        let started = Instant::now();
        let mut search = Search::new(model, config, started);
        let outcome = search.run();

        let status = match outcome {
            // Without an objective every solution is optimal.
            Outcome::Found => SolverStatus::Optimal,
            Outcome::Exhausted => SolverStatus::Infeasible,
            Outcome::Aborted => SolverStatus::Unknown,
        };
        let values = if status.is_solution_found() {
            search.assign.iter().map(|v| v.unwrap_or(false)).collect()
        } else {
            Vec::new()
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        debug!(
            model = model.name(),
            vars = model.var_count(),
            constraints = model.constraint_count(),
            nodes = search.nodes,
            elapsed_ms,
            %status,
            "search finished"
        );

        CpSolution {
            status,
            values,
            nodes: search.nodes,
            elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Found,
    Exhausted,
    Aborted,
}

#[derive(Debug, Clone, Copy)]
struct Decision {
    var: usize,
    /// Trail length before the decision.
    mark: usize,
    /// The `false` branch has been tried.
    retried: bool,
}

struct Search<'m> {
    model: &'m CpModel,
    /// Variable → constraints it appears in.
    watches: Vec<Vec<usize>>,
    assign: Vec<Option<bool>>,
    ones: Vec<i64>,
    free: Vec<i64>,
    trail: Vec<usize>,
    pending: Vec<usize>,
    nodes: u64,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
}

impl<'m> Search<'m> {
    fn new(model: &'m CpModel, config: &SolverConfig, started: Instant) -> Self {
        let constraints = model.constraints();
        let mut watches = vec![Vec::new(); model.var_count()];
        for (ci, c) in constraints.iter().enumerate() {
            for var in &c.vars {
                watches[var.index()].push(ci);
            }
        }

        Self {
            model,
            watches,
            assign: vec![None; model.var_count()],
            ones: vec![0; constraints.len()],
            free: constraints.iter().map(|c| c.vars.len() as i64).collect(),
            trail: Vec::new(),
            pending: (0..constraints.len()).collect(),
            nodes: 0,
            deadline: config
                .time_limit_ms
                .map(|ms| started + Duration::from_millis(ms)),
            node_limit: config.node_limit,
        }
    }

    fn run(&mut self) -> Outcome {
        if !self.propagate() {
            return Outcome::Exhausted;
        }

        let mut stack: Vec<Decision> = Vec::new();
        loop {
            self.nodes += 1;
            if self.limit_reached() {
                return Outcome::Aborted;
            }

            let Some(var) = self.pick_branch_var() else {
                return Outcome::Found;
            };
            stack.push(Decision {
                var,
                mark: self.trail.len(),
                retried: false,
            });
            self.set(var, true);
            if self.propagate() {
                continue;
            }

            // Conflict: unwind until a decision can be flipped to false.
            loop {
                let Some(decision) = stack.last_mut() else {
                    return Outcome::Exhausted;
                };
                let Decision { var, mark, retried } = *decision;
                decision.retried = true;
                self.undo(mark);

                if retried {
                    stack.pop();
                    continue;
                }
                self.set(var, false);
                if self.propagate() {
                    break;
                }
            }
        }
    }

    fn limit_reached(&self) -> bool {
        if self.node_limit.is_some_and(|limit| self.nodes > limit) {
            return true;
        }
        match self.deadline {
            Some(deadline) if self.nodes % CLOCK_CHECK_INTERVAL == 0 => Instant::now() >= deadline,
            _ => false,
        }
    }

    /// Assigns an unassigned variable and queues its constraints.
    fn set(&mut self, var: usize, value: bool) {
        self.assign[var] = Some(value);
        self.trail.push(var);
        for &ci in &self.watches[var] {
            self.free[ci] -= 1;
            if value {
                self.ones[ci] += 1;
            }
            self.pending.push(ci);
        }
    }

    /// Reverts assignments back to trail length `mark`.
    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(var) = self.trail.pop() else {
                break;
            };
            let value = self.assign[var].take().unwrap_or(false);
            for &ci in &self.watches[var] {
                self.free[ci] += 1;
                if value {
                    self.ones[ci] -= 1;
                }
            }
        }
    }

    /// Propagates queued constraints to a fixpoint. Returns `false` on conflict.
    fn propagate(&mut self) -> bool {
        let model = self.model;
        while let Some(ci) = self.pending.pop() {
            let c = &model.constraints()[ci];
            let (ones, free) = (self.ones[ci], self.free[ci]);

            if ones > c.upper || ones + free < c.lower {
                self.pending.clear();
                return false;
            }
            if free == 0 {
                continue;
            }

            let forced = if ones == c.upper {
                false
            } else if ones + free == c.lower {
                true
            } else {
                continue;
            };
            for var in &c.vars {
                if self.assign[var.index()].is_none() {
                    self.set(var.index(), forced);
                }
            }
        }
        true
    }

    /// First free variable of the most constrained unmet lower bound.
    fn pick_branch_var(&self) -> Option<usize> {
        let constraints = self.model.constraints();
        let ci = (0..constraints.len())
            .filter(|&ci| self.ones[ci] < constraints[ci].lower && self.free[ci] > 0)
            .min_by_key(|&ci| self.free[ci])?;

        constraints[ci]
            .vars
            .iter()
            .map(|v| v.index())
            .find(|&v| self.assign[v].is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::BoolVar;

    fn solve(model: &CpModel) -> CpSolution {
        SimpleCpSolver::new().solve(model, &SolverConfig::default())
    }

    /// Pigeons → holes, each pigeon in exactly one hole, each hole at most one pigeon.
    fn pigeonhole(pigeons: usize, holes: usize) -> CpModel {
        let mut model = CpModel::new("pigeonhole");
        let vars: Vec<Vec<BoolVar>> = (0..pigeons)
            .map(|p| {
                (0..holes)
                    .map(|h| model.new_bool_var(format!("p{p}_h{h}")))
                    .collect()
            })
            .collect();
        for (p, row) in vars.iter().enumerate() {
            model.add_exactly(format!("pigeon{p}"), row.clone(), 1);
        }
        for h in 0..holes {
            let column = vars.iter().map(|row| row[h]).collect();
            model.add_at_most(format!("hole{h}"), column, 1);
        }
        model
    }

    #[test]
    fn test_empty_model() {
        let solution = solve(&CpModel::new("empty"));
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_exactly_one() {
        let mut model = CpModel::new("m");
        let vars: Vec<BoolVar> = (0..4).map(|i| model.new_bool_var(format!("x{i}"))).collect();
        model.add_exactly("one", vars.clone(), 1);

        let solution = solve(&model);
        assert!(solution.is_solution_found());
        assert_eq!(vars.iter().filter(|v| solution.value(**v)).count(), 1);
        assert!(model.is_satisfied_by(&solution.values));
    }

    #[test]
    fn test_lower_bound_forces_true() {
        let mut model = CpModel::new("m");
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.add_linear("both", vec![a, b], 2, 2);

        let solution = solve(&model);
        assert!(solution.value(a) && solution.value(b));
    }

    #[test]
    fn test_empty_exactly_one_is_infeasible() {
        let mut model = CpModel::new("m");
        model.new_bool_var("unused");
        model.add_exactly("nothing", Vec::new(), 1);

        let solution = solve(&model);
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_pigeonhole_feasible() {
        let model = pigeonhole(4, 4);
        let solution = solve(&model);
        assert!(solution.is_solution_found());
        assert!(model.is_satisfied_by(&solution.values));
    }

    #[test]
    fn test_pigeonhole_infeasible() {
        let solution = solve(&pigeonhole(4, 3));
        assert_eq!(solution.status, SolverStatus::Infeasible);
    }

    #[test]
    fn test_node_limit_gives_unknown() {
        let config = SolverConfig::new().with_node_limit(1);
        let solution = SimpleCpSolver::new().solve(&pigeonhole(7, 6), &config);
        assert_eq!(solution.status, SolverStatus::Unknown);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_solver_name() {
        assert_eq!(SimpleCpSolver::new().name(), "simple-dfs");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        type Spec = (usize, Vec<(Vec<usize>, i64, i64)>);

        fn model_strategy() -> impl Strategy<Value = Spec> {
            (1usize..8).prop_flat_map(|n| {
                let constraint = (prop::collection::vec(0..n, 0..6), 0i64..3, 0i64..4);
                (Just(n), prop::collection::vec(constraint, 0..8))
            })
        }

        fn build(spec: &Spec) -> CpModel {
            let (n, constraints) = spec;
            let mut model = CpModel::new("random");
            let vars: Vec<BoolVar> = (0..*n).map(|i| model.new_bool_var(format!("x{i}"))).collect();
            for (i, (members, lower, upper)) in constraints.iter().enumerate() {
                let members = members.iter().map(|&m| vars[m]).collect();
                model.add_linear(format!("c{i}"), members, *lower, *upper);
            }
            model
        }

        fn brute_force_satisfiable(model: &CpModel) -> bool {
            let n = model.var_count();
            (0u32..(1 << n)).any(|mask| {
                let values: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
                model.is_satisfied_by(&values)
            })
        }

        proptest! {
            /// Property: the search agrees with exhaustive enumeration
            #[test]
            fn prop_complete_and_sound(spec in model_strategy()) {
                let model = build(&spec);
                let solution = solve(&model);

                prop_assert_ne!(solution.status, SolverStatus::Unknown);
                prop_assert_eq!(solution.is_solution_found(), brute_force_satisfiable(&model));
                if solution.is_solution_found() {
                    prop_assert!(model.is_satisfied_by(&solution.values));
                }
            }
        }
    }
}
