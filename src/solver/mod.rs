//! Local-search solving for roster problems.
//!
//! # Algorithm
//!
//! [`MinConflictsSolver`] draws a random complete assignment and repairs
//! conflicted slots one at a time until every constraint holds or the
//! step ceiling is hit. It is a satisficing heuristic: it returns the
//! first feasible roster it reaches, not an optimal one, and it may fail
//! on a satisfiable instance.
//!
//! # Randomness
//!
//! Every entry point takes the generator explicitly, so a seeded
//! generator reproduces a run step for step.
//!
//! # References
//!
//! - Minton et al. (1992), "Minimizing conflicts: a heuristic repair
//!   method for constraint satisfaction and scheduling problems"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern
//!   Approach", Ch. 6.4

mod min_conflicts;
mod stats;

pub use min_conflicts::{
    random_assignment, MinConflictsSolver, RepairStep, SolveOutcome, SolveResult, SolverConfig,
    SolverState, Termination, DEFAULT_MAX_STEPS,
};
pub use stats::SolverStats;
