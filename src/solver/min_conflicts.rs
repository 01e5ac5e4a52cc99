//! Min-conflicts local search.
//!
//! # Algorithm
//!
//! 1. **Initializing**: bind every slot to a uniformly random value of its
//!    own domain.
//! 2. **Repairing**: while some slot takes part in a violated constraint,
//!    pick one such slot uniformly at random and rebind it to the value
//!    minimising the total violation count, breaking ties uniformly at
//!    random (keeping the current value is allowed).
//! 3. **Terminal**: `Success` once no constraint is violated, `Exhausted`
//!    once the step ceiling is reached.
//!
//! The search is incomplete: it can exhaust on a satisfiable roster.
//! Retrying with fresh randomness is up to the caller.
//!
//! # Complexity
//! Per step O(C + d·r) where C is the cost of evaluating every constraint,
//! d the domain size and r the number of constraints relevant to the slot.
//!
//! # Reference
//! Minton et al. (1992), "Minimizing conflicts: a heuristic repair method
//! for constraint satisfaction and scheduling problems"

use std::time::Instant;

use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use super::SolverStats;
use crate::constraints::ConstraintSet;
use crate::models::{Assignee, Assignment, RosterModel, Solution};

/// Default repair-step ceiling.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Min-conflicts settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Repair steps before giving up.
    pub max_steps: u64,
    /// Whether to record every repair step in [`SolveResult::trace`].
    pub record_trace: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            record_trace: false,
        }
    }
}

impl SolverConfig {
    /// Sets the step ceiling.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Enables or disables step recording.
    pub fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }
}

/// Solver state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolverState {
    /// Drawing the random initial assignment.
    Initializing,
    /// Repairing conflicted slots.
    Repairing,
    /// Finished.
    Terminal(Termination),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// No constraint is violated.
    Success,
    /// The step ceiling was reached first.
    Exhausted,
}

/// Result value of a run: a complete roster or an explicit failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SolveOutcome {
    /// Every constraint holds.
    Success(Solution),
    /// Step ceiling reached; no roster is returned.
    Exhausted,
}

/// One repair step, as recorded when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepairStep {
    /// Slot that was repaired.
    pub slot: usize,
    /// Value before the step.
    pub from: Assignee,
    /// Value after the step.
    pub to: Assignee,
    /// Size of the conflicted set the slot was drawn from.
    pub conflicted: usize,
}

/// Outcome plus run diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    /// Terminal outcome.
    pub outcome: SolveOutcome,
    /// Run statistics.
    pub stats: SolverStats,
    /// Repair steps (empty unless [`SolverConfig::record_trace`]).
    pub trace: Vec<RepairStep>,
}

impl SolveResult {
    /// Whether a roster was found.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SolveOutcome::Success(_))
    }

    /// The roster, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            SolveOutcome::Success(solution) => Some(solution),
            SolveOutcome::Exhausted => None,
        }
    }

    /// Consumes the result, returning the roster if one was found.
    pub fn into_solution(self) -> Option<Solution> {
        match self.outcome {
            SolveOutcome::Success(solution) => Some(solution),
            SolveOutcome::Exhausted => None,
        }
    }
}

/// Min-conflicts solver.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_roster::constraints::ConstraintSet;
/// use u_roster::models::{Participant, Quota, RosterModel, RosterRequest, SlotInput};
/// use u_roster::solver::MinConflictsSolver;
///
/// let slots = (0..4)
///     .map(|i| {
///         let start = NaiveDate::from_ymd_opt(2024, 3, 4 + i as u32)
///             .unwrap()
///             .and_hms_opt(9, 0, 0)
///             .unwrap();
///         SlotInput::new(i, start).with_candidate("P1").with_candidate("P2")
///     })
///     .collect();
/// let participants = vec![
///     Participant::new("P1").with_quota(Quota::exactly(2)),
///     Participant::new("P2").with_quota(Quota::at_least(0)),
/// ];
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let model = RosterModel::build(&RosterRequest::new(slots, participants), &mut rng).unwrap();
/// let constraints = ConstraintSet::from_model(&model);
///
/// let result = MinConflictsSolver::default().solve(&model, &constraints, &mut rng);
/// let solution = result.solution().unwrap();
/// assert_eq!(solution.count_for(0), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MinConflictsSolver {
    config: SolverConfig,
}

impl MinConflictsSolver {
    /// Creates a solver with the given settings.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs one search from a fresh random assignment.
    ///
    /// Never fails: exhaustion is reported as [`SolveOutcome::Exhausted`].
    pub fn solve<R: Rng + ?Sized>(
        &self,
        model: &RosterModel,
        constraints: &ConstraintSet,
        rng: &mut R,
    ) -> SolveResult {
        let started = Instant::now();
        let mut stats = SolverStats::default();
        let mut trace = Vec::new();
        let mut assignment = Assignment::for_model(model);
        let mut state = SolverState::Initializing;

        let termination = loop {
            state = match state {
                SolverState::Initializing => {
                    assignment = random_assignment(model, rng);
                    SolverState::Repairing
                }
                SolverState::Repairing => {
                    let conflicted = constraints.conflicted_slots(model, &assignment);
                    stats.on_conflicts(conflicted.len());
                    if conflicted.is_empty() && constraints.is_satisfied(&assignment) {
                        SolverState::Terminal(Termination::Success)
                    } else if conflicted.is_empty() || stats.steps >= self.config.max_steps {
                        // Violated with nothing to repair only happens on a
                        // slotless model whose minimums cannot be met.
                        SolverState::Terminal(Termination::Exhausted)
                    } else {
                        let step = repair(model, constraints, &mut assignment, &conflicted, rng, &mut stats);
                        if let Some(step) = step {
                            trace!(
                                step = stats.steps,
                                slot = step.slot,
                                from = ?step.from,
                                to = ?step.to,
                                conflicted = step.conflicted,
                                "repair"
                            );
                            if self.config.record_trace {
                                trace.push(step);
                            }
                        }
                        SolverState::Repairing
                    }
                }
                SolverState::Terminal(termination) => break termination,
            };
        };

        stats.final_violations = constraints.total_violations(&assignment);
        stats.elapsed = started.elapsed();

        let outcome = match (termination, assignment.to_solution()) {
            (Termination::Success, Some(solution)) => SolveOutcome::Success(solution),
            _ => SolveOutcome::Exhausted,
        };

        info!(
            success = matches!(outcome, SolveOutcome::Success(_)),
            steps = stats.steps,
            violations = stats.final_violations,
            elapsed_ms = u64::try_from(stats.elapsed.as_millis()).unwrap_or(u64::MAX),
            "min-conflicts finished"
        );

        SolveResult {
            outcome,
            stats,
            trace,
        }
    }
}

/// Binds every slot to a uniformly random value of its own domain.
pub fn random_assignment<R: Rng + ?Sized>(model: &RosterModel, rng: &mut R) -> Assignment {
    let mut assignment = Assignment::for_model(model);
    for slot in model.slots() {
        if let Some(&value) = slot.domain().choose(rng) {
            assignment.bind(slot.index, value);
        }
    }
    assignment
}

/// Performs one repair step on a slot drawn from `conflicted`.
fn repair<R: Rng + ?Sized>(
    model: &RosterModel,
    constraints: &ConstraintSet,
    assignment: &mut Assignment,
    conflicted: &[usize],
    rng: &mut R,
    stats: &mut SolverStats,
) -> Option<RepairStep> {
    let &slot = conflicted.choose(rng)?;
    let current = assignment.get(slot)?;
    let domain = model.slots().get(slot)?.domain();

    let mut best = u32::MAX;
    let mut minimizers: Vec<Assignee> = Vec::with_capacity(domain.len());
    for &value in domain {
        assignment.bind(slot, value);
        stats.on_candidate();
        let score = constraints.local_violations(slot, assignment);
        if score < best {
            best = score;
            minimizers.clear();
            minimizers.push(value);
        } else if score == best {
            minimizers.push(value);
        }
    }

    let chosen = minimizers.choose(rng).copied().unwrap_or(current);
    assignment.bind(slot, chosen);
    stats.on_step(chosen == current);

    Some(RepairStep {
        slot,
        from: current,
        to: chosen,
        conflicted: conflicted.len(),
    })
}
