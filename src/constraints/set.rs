//! Constraint set derived from a roster model.

use serde::Serialize;
use tracing::debug;

use super::Constraint;
use crate::models::{Assignment, RosterModel};

/// All constraints of a roster, with a per-slot relevance index.
///
/// Derived once from a [`RosterModel`]:
/// - one [`Constraint::DayUniqueness`] per day group,
/// - one [`Constraint::FrequencyBound`] per participant with a quota.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    /// slot → indices of constraints whose count can change when the slot
    /// is rebound.
    #[serde(skip)]
    by_slot: Vec<Vec<usize>>,
}

impl ConstraintSet {
    /// Derives the constraints of `model`.
    pub fn from_model(model: &RosterModel) -> Self {
        let mut constraints: Vec<Constraint> = model
            .day_groups()
            .iter()
            .map(|g| Constraint::day_uniqueness(g.date, g.slots.clone()))
            .collect();
        let day_count = constraints.len();

        let total_slots = u64::try_from(model.slot_count()).unwrap_or(u64::MAX);
        let min_sum: u64 = model
            .participants()
            .iter()
            .map(|p| u64::from(p.min_slots()))
            .sum();

        for (index, participant) in model.participants().iter().enumerate() {
            let Some(quota) = participant.quota else {
                continue;
            };
            let others_min = min_sum - u64::from(quota.min);
            let cap = total_slots.saturating_sub(others_min);
            let partial_cap = u32::try_from(cap).unwrap_or(u32::MAX);
            constraints.push(Constraint::frequency_bound(index, quota, partial_cap));
        }

        let mut by_slot = vec![Vec::new(); model.slot_count()];
        for (ci, constraint) in constraints.iter().enumerate() {
            for slot in constraint.scope(model) {
                by_slot[slot].push(ci);
            }
        }

        debug!(
            day_uniqueness = day_count,
            frequency_bound = constraints.len() - day_count,
            "constraint set derived"
        );

        Self { constraints, by_slot }
    }

    /// All constraints; day-uniqueness first.
    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of constraints.
    #[inline]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether there are no constraints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraints affected by rebinding `slot`.
    pub fn relevant(&self, slot: usize) -> impl Iterator<Item = &Constraint> {
        self.by_slot
            .get(slot)
            .into_iter()
            .flatten()
            .map(move |&ci| &self.constraints[ci])
    }

    /// Sum of all constraints' violation counts.
    pub fn total_violations(&self, assignment: &Assignment) -> u32 {
        self.constraints.iter().map(|c| c.violations(assignment)).sum()
    }

    /// Sum of violation counts over the constraints relevant to `slot`.
    ///
    /// Differs from [`total_violations`](Self::total_violations) by a
    /// term that does not depend on `slot`'s value, so comparing it across
    /// candidate values ranks them the same way.
    pub fn local_violations(&self, slot: usize, assignment: &Assignment) -> u32 {
        self.relevant(slot).map(|c| c.violations(assignment)).sum()
    }

    /// Constraints currently violated.
    pub fn violated<'a>(&'a self, assignment: &'a Assignment) -> impl Iterator<Item = &'a Constraint> {
        self.constraints.iter().filter(move |c| !c.is_satisfied(assignment))
    }

    /// Whether no constraint is violated.
    ///
    /// On a partial assignment this is the consistency (pruning) check.
    pub fn is_satisfied(&self, assignment: &Assignment) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(assignment))
    }

    /// Sorted, de-duplicated slots taking part in at least one violation.
    pub fn conflicted_slots(&self, model: &RosterModel, assignment: &Assignment) -> Vec<usize> {
        let mut out = Vec::new();
        for constraint in self.violated(assignment) {
            constraint.conflicted_slots(model, assignment, &mut out);
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuotaConfig;
    use crate::constraints::EvaluationMode;
    use crate::models::{Assignee, Participant, Quota, RosterRequest, SlotInput};
    use chrono::{NaiveDate, NaiveDateTime};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn build(slots: Vec<SlotInput>, participants: Vec<Participant>, quotas: QuotaConfig) -> RosterModel {
        let request = RosterRequest::new(slots, participants).with_quotas(quotas);
        RosterModel::build(&request, &mut SmallRng::seed_from_u64(5)).unwrap()
    }

    fn both(index: usize, day: u32, hour: u32) -> SlotInput {
        SlotInput::new(index, at(day, hour))
            .with_candidate("P1")
            .with_candidate("P2")
    }

    fn pair() -> Vec<Participant> {
        vec![Participant::new("P1"), Participant::new("P2")]
    }

    #[test]
    fn test_derivation_counts() {
        let quotas = QuotaConfig::new().with_quota("P1", Quota::exactly(1));
        let model = build(
            vec![both(0, 4, 9), both(1, 4, 14), both(2, 5, 9), SlotInput::new(3, at(5, 14))],
            pair(),
            quotas,
        );
        let set = ConstraintSet::from_model(&model);
        assert_eq!(set.len(), 2);
        assert!(matches!(set.constraints()[0], Constraint::DayUniqueness { .. }));
        assert!(matches!(
            set.constraints()[1],
            Constraint::FrequencyBound { participant: 0, .. }
        ));
    }

    #[test]
    fn test_partial_cap_uses_other_minimums() {
        let quotas = QuotaConfig::new()
            .with_quota("P1", Quota::at_least(1))
            .with_quota("P2", Quota::at_least(3));
        let model = build((0..5).map(|i| both(i, 4 + i as u32, 9)).collect(), pair(), quotas);
        let set = ConstraintSet::from_model(&model);
        let caps: Vec<u32> = set
            .constraints()
            .iter()
            .filter_map(|c| match c {
                Constraint::FrequencyBound { partial_cap, .. } => Some(*partial_cap),
                _ => None,
            })
            .collect();
        assert_eq!(caps, vec![2, 4]);
    }

    #[test]
    fn test_partial_cap_saturates() {
        let quotas = QuotaConfig::new()
            .with_quota("P1", Quota::at_least(1))
            .with_quota("P2", Quota::at_least(9));
        let model = build(vec![both(0, 4, 9)], pair(), quotas);
        let set = ConstraintSet::from_model(&model);
        assert!(matches!(
            set.constraints()[0],
            Constraint::FrequencyBound { partial_cap: 0, .. }
        ));
    }

    #[test]
    fn test_relevance_index() {
        let quotas = QuotaConfig::new().with_quota("P2", Quota::at_most(1));
        let model = build(
            vec![
                both(0, 4, 9),
                SlotInput::new(1, at(4, 14)).with_candidate("P1"),
                SlotInput::new(2, at(5, 9)),
            ],
            pair(),
            quotas,
        );
        let set = ConstraintSet::from_model(&model);
        assert_eq!(set.relevant(0).count(), 2);
        assert_eq!(set.relevant(1).count(), 1);
        assert_eq!(set.relevant(2).count(), 0);
        assert_eq!(set.relevant(99).count(), 0);
    }

    #[test]
    fn test_conflicted_slots_union() {
        let quotas = QuotaConfig::new().with_quota("P2", Quota::at_least(1));
        let model = build(vec![both(0, 4, 9), both(1, 4, 14), both(2, 5, 9)], pair(), quotas);
        let set = ConstraintSet::from_model(&model);
        let mut a = Assignment::for_model(&model);
        for s in 0..3 {
            a.bind(s, Assignee::Person(0));
        }
        assert_eq!(set.total_violations(&a), 2);
        assert_eq!(set.violated(&a).count(), 2);
        assert_eq!(set.conflicted_slots(&model, &a), vec![0, 1, 2]);

        a.bind(1, Assignee::Person(1));
        assert!(set.is_satisfied(&a));
        assert!(set.conflicted_slots(&model, &a).is_empty());
    }

    #[test]
    fn test_local_violations_track_total() {
        let quotas = QuotaConfig::new().with_quota("P1", Quota::exactly(1));
        let model = build(vec![both(0, 4, 9), both(1, 4, 14), both(2, 5, 9)], pair(), quotas);
        let set = ConstraintSet::from_model(&model);
        let mut a = Assignment::for_model(&model);
        for s in 0..3 {
            a.bind(s, Assignee::Person(0));
        }
        let before_total = set.total_violations(&a);
        let before_local = set.local_violations(2, &a);
        a.bind(2, Assignee::Person(1));
        let after_total = set.total_violations(&a);
        let after_local = set.local_violations(2, &a);
        assert_eq!(
            i64::from(before_total) - i64::from(after_total),
            i64::from(before_local) - i64::from(after_local)
        );
    }

    /// Enumerates every complete assignment of a small instance and checks
    /// that no prefix of a feasible one is rejected in partial mode.
    #[test]
    fn test_partial_pruning_never_rejects_feasible_prefix() {
        let quotas = QuotaConfig::new()
            .with_quota("P1", Quota::new(1, Some(2)))
            .with_quota("P2", Quota::at_least(1))
            .with_quota("P3", Quota::at_most(1));
        let participants = vec![Participant::new("P1"), Participant::new("P2"), Participant::new("P3")];
        let slots = vec![
            SlotInput::new(0, at(4, 9)).with_candidates(vec!["P1".into(), "P2".into(), "P3".into()]),
            SlotInput::new(1, at(4, 14)).with_candidates(vec!["P1".into(), "P2".into()]),
            SlotInput::new(2, at(5, 9)).with_candidates(vec!["P2".into(), "P3".into()]),
            SlotInput::new(3, at(5, 14)),
            SlotInput::new(4, at(6, 9)).with_candidates(vec!["P1".into(), "P3".into()]),
        ];
        let model = build(slots, participants, quotas);
        let set = ConstraintSet::from_model(&model);
        let domains: Vec<&[Assignee]> = model.slots().iter().map(|s| s.domain()).collect();
        let n = domains.len();

        let mut feasible = 0;
        let mut choice = vec![0usize; n];
        loop {
            let mut complete = Assignment::for_model(&model);
            for (s, &c) in choice.iter().enumerate() {
                complete.bind(s, domains[s][c]);
            }
            if set.is_satisfied(&complete) {
                feasible += 1;
                for mask in 0u32..(1 << n) {
                    let mut partial = complete.clone();
                    for s in 0..n {
                        if mask & (1 << s) != 0 {
                            partial.unbind(s);
                        }
                    }
                    if partial.is_complete() {
                        continue;
                    }
                    for c in set.constraints() {
                        assert_eq!(
                            c.violations_in(&partial, EvaluationMode::Partial),
                            0,
                            "feasible prefix pruned by {c:?}"
                        );
                    }
                }
            }

            // Odometer over domain choices.
            let mut s = 0;
            while s < n {
                choice[s] += 1;
                if choice[s] < domains[s].len() {
                    break;
                }
                choice[s] = 0;
                s += 1;
            }
            if s == n {
                break;
            }
        }
        assert!(feasible > 0);
    }

    #[test]
    fn test_partial_pruning_catches_over_assignment() {
        let quotas = QuotaConfig::new()
            .with_quota("P1", Quota::at_least(1))
            .with_quota("P2", Quota::at_least(2));
        let model = build((0..3).map(|i| both(i, 4 + i as u32, 9)).collect(), pair(), quotas);
        let set = ConstraintSet::from_model(&model);
        let mut a = Assignment::for_model(&model);
        a.bind(0, Assignee::Person(0));
        assert!(set.is_satisfied(&a));
        a.bind(1, Assignee::Person(0));
        // P2 can no longer reach 2 of 3 slots.
        assert!(!set.is_satisfied(&a));
    }
}
