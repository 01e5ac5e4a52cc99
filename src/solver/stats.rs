//! Statistics for min-conflicts runs.
//!
//! Counters are updated in the repair loop with saturating arithmetic so
//! a long run never overflows.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Aggregate metrics of one solver invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolverStats {
    /// Repair steps performed.
    pub steps: u64,
    /// Candidate values scored across all steps.
    pub candidate_evaluations: u64,
    /// Steps whose chosen value equalled the current one.
    pub unchanged_steps: u64,
    /// Largest conflicted-slot set seen.
    pub peak_conflicts: usize,
    /// Total violation count of the final assignment.
    pub final_violations: u32,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl SolverStats {
    /// Called once per repair step.
    #[inline]
    pub fn on_step(&mut self, kept_value: bool) {
        self.steps = self.steps.saturating_add(1);
        if kept_value {
            self.unchanged_steps = self.unchanged_steps.saturating_add(1);
        }
    }

    /// Called for each candidate value scored.
    #[inline]
    pub fn on_candidate(&mut self) {
        self.candidate_evaluations = self.candidate_evaluations.saturating_add(1);
    }

    /// Records the size of the current conflicted set.
    #[inline]
    pub fn on_conflicts(&mut self, conflicted: usize) {
        self.peak_conflicts = self.peak_conflicts.max(conflicted);
    }

    /// Steps that actually moved a slot to a different value.
    #[inline]
    pub fn changed_steps(&self) -> u64 {
        self.steps.saturating_sub(self.unchanged_steps)
    }
}

impl fmt::Display for SolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Min-Conflicts Statistics:")?;
        writeln!(f, "   Steps:                 {}", self.steps)?;
        writeln!(f, "   Changed Steps:         {}", self.changed_steps())?;
        writeln!(f, "   Candidate Evaluations: {}", self.candidate_evaluations)?;
        writeln!(f, "   Peak Conflicts:        {}", self.peak_conflicts)?;
        writeln!(f, "   Final Violations:      {}", self.final_violations)?;
        writeln!(f, "   Total Time:            {:?}", self.elapsed)?;
        Ok(())
    }
}
