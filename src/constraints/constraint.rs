//! Roster constraints.
//!
//! Two rules, evaluated through one interface:
//!
//! - **Day-uniqueness**: nobody works two slots of the same day group.
//!   Sentinels are exempt, so several empty shifts may share a day.
//! - **Frequency-bound**: a participant's total number of slots stays
//!   within their quota.
//!
//! Each constraint reports a violation *count* (0 = satisfied) so that
//! local search can tell a nearly-satisfied rule from a badly broken one.
//!
//! # Partial assignments
//! Day-uniqueness only compares bound members. Frequency-bound prunes a
//! partial assignment only when the outcome is already settled: the
//! participant exceeds their ceiling, or holds more slots than the
//! other participants' minimums leave available. Falling short of the
//! minimum is never reported before the assignment is complete.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Assignee, Assignment, Quota, RosterModel};

/// How an assignment is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// All slots bound: every bound is final.
    Complete,
    /// Some slots unbound: only irreversible violations count.
    Partial,
}

impl EvaluationMode {
    /// Mode matching the assignment's completeness.
    #[inline]
    pub fn of(assignment: &Assignment) -> Self {
        if assignment.is_complete() {
            Self::Complete
        } else {
            Self::Partial
        }
    }
}

/// A roster constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// Bound non-sentinel values in `slots` must be pairwise distinct.
    DayUniqueness {
        /// Calendar day of the group.
        date: NaiveDate,
        /// Member slot indices.
        slots: Vec<usize>,
    },

    /// Occurrences of `participant` must lie within `quota`.
    FrequencyBound {
        /// Participant table index.
        participant: usize,
        /// Allowed range.
        quota: Quota,
        /// Partial-mode ceiling: total slots minus every other
        /// participant's minimum.
        partial_cap: u32,
    },
}

impl Constraint {
    /// Creates a day-uniqueness constraint.
    pub fn day_uniqueness(date: NaiveDate, slots: Vec<usize>) -> Self {
        Self::DayUniqueness { date, slots }
    }

    /// Creates a frequency-bound constraint.
    pub fn frequency_bound(participant: usize, quota: Quota, partial_cap: u32) -> Self {
        Self::FrequencyBound {
            participant,
            quota,
            partial_cap,
        }
    }

    /// Violation count, judged in the mode the assignment's completeness
    /// implies.
    #[inline]
    pub fn violations(&self, assignment: &Assignment) -> u32 {
        self.violations_in(assignment, EvaluationMode::of(assignment))
    }

    /// Violation count in an explicit mode.
    pub fn violations_in(&self, assignment: &Assignment, mode: EvaluationMode) -> u32 {
        match self {
            Self::DayUniqueness { slots, .. } => duplicate_count(slots, assignment),
            Self::FrequencyBound {
                participant,
                quota,
                partial_cap,
            } => {
                let count = assignment.count(*participant);
                match mode {
                    EvaluationMode::Complete => quota.distance(count),
                    EvaluationMode::Partial => partial_excess(count, quota, *partial_cap),
                }
            }
        }
    }

    /// Whether the constraint holds for the assignment.
    #[inline]
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.violations(assignment) == 0
    }

    /// Slots whose binding takes part in a violation of this constraint.
    ///
    /// For day-uniqueness these are the members holding a repeated
    /// participant. For a frequency bound that is exceeded, the slots held
    /// by the participant; for one that falls short, the eligible slots
    /// held by someone else. When a shortfall has no such slot, the
    /// constraint's scope is reported instead (every slot if the scope is
    /// empty), so a violated constraint never yields an empty set unless
    /// the model has no slots.
    pub fn conflicted_slots(&self, model: &RosterModel, assignment: &Assignment, out: &mut Vec<usize>) {
        match self {
            Self::DayUniqueness { slots, .. } => {
                for &slot in slots {
                    let Some(Assignee::Person(p)) = assignment.get(slot) else {
                        continue;
                    };
                    let repeated = slots
                        .iter()
                        .any(|&other| other != slot && assignment.get(other) == Some(Assignee::Person(p)));
                    if repeated {
                        out.push(slot);
                    }
                }
            }
            Self::FrequencyBound {
                participant,
                quota,
                partial_cap,
            } => {
                let count = assignment.count(*participant);
                let mine = Assignee::Person(*participant);
                let over = match EvaluationMode::of(assignment) {
                    EvaluationMode::Complete => quota.max.is_some_and(|max| count > max),
                    EvaluationMode::Partial => partial_excess(count, quota, *partial_cap) > 0,
                };
                if over {
                    out.extend((0..assignment.len()).filter(|&s| assignment.get(s) == Some(mine)));
                } else if assignment.is_complete() && count < quota.min {
                    let before = out.len();
                    out.extend(model.slots().iter().filter_map(|slot| {
                        (slot.admits(&mine) && assignment.get(slot.index) != Some(mine))
                            .then_some(slot.index)
                    }));
                    // Unreachable minimum: keep the violation visible.
                    if out.len() == before {
                        let scope = self.scope(model);
                        if scope.is_empty() {
                            out.extend(0..assignment.len());
                        } else {
                            out.extend(scope);
                        }
                    }
                }
            }
        }
    }

    /// Slots whose rebinding can change this constraint's violation count.
    pub fn scope(&self, model: &RosterModel) -> Vec<usize> {
        match self {
            Self::DayUniqueness { slots, .. } => slots.clone(),
            Self::FrequencyBound { participant, .. } => model
                .slots()
                .iter()
                .filter(|s| s.admits_person(*participant))
                .map(|s| s.index)
                .collect(),
        }
    }
}

/// Surplus occurrences of real participants among bound members.
fn duplicate_count(slots: &[usize], assignment: &Assignment) -> u32 {
    let mut seen: Vec<usize> = Vec::with_capacity(slots.len());
    let mut duplicates = 0;
    for &slot in slots {
        if let Some(Assignee::Person(p)) = assignment.get(slot) {
            if seen.contains(&p) {
                duplicates += 1;
            } else {
                seen.push(p);
            }
        }
    }
    duplicates
}

/// Irreversible over-assignment of a partial assignment.
///
/// A ceiling is checked for every quota; the cap derived from the other
/// participants' minimums only for quotas with a positive minimum.
fn partial_excess(count: u32, quota: &Quota, partial_cap: u32) -> u32 {
    let over_max = quota.max.map_or(0, |max| count.saturating_sub(max));
    let over_cap = if quota.min > 0 {
        count.saturating_sub(partial_cap)
    } else {
        0
    };
    over_max.max(over_cap)
}
