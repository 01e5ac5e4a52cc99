//! Roster model: slots, participants and derived day groups.
//!
//! Built once per run from a [`RosterRequest`] and immutable afterwards.
//! Construction validates the input, resolves participant IDs to table
//! positions, injects per-slot sentinels where nobody is eligible, and
//! derives the [`DayGroup`]s that the day-uniqueness constraints use.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Assignee, Participant, SentinelId, Slot, SlotInput};
use crate::config::QuotaConfig;
use crate::error::{Result, RosterError};
use crate::validation::validate_input;

/// Display name used for sentinel values.
pub const VACANT_NAME: &str = "<empty>";

/// Input container for model construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterRequest {
    /// Slots in chronological order.
    pub slots: Vec<SlotInput>,
    /// Declared participants.
    pub participants: Vec<Participant>,
    /// Quotas that override each participant's own quota.
    #[serde(default)]
    pub quotas: QuotaConfig,
}

impl RosterRequest {
    /// Creates a request without a quota table.
    pub fn new(slots: Vec<SlotInput>, participants: Vec<Participant>) -> Self {
        Self {
            slots,
            participants,
            quotas: QuotaConfig::new(),
        }
    }

    /// Sets the quota table.
    pub fn with_quotas(mut self, quotas: QuotaConfig) -> Self {
        self.quotas = quotas;
        self
    }
}

/// Slots on one calendar day whose assignees must be pairwise distinct.
///
/// Only slots with at least one real candidate are members, and only
/// groups with two or more members are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    /// Calendar day shared by all members.
    pub date: NaiveDate,
    /// Member slot indices, ascending.
    pub slots: Vec<usize>,
}

/// Immutable roster problem instance.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_roster::models::{Participant, RosterModel, RosterRequest, SlotInput};
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let request = RosterRequest::new(
///     vec![
///         SlotInput::new(0, day.and_hms_opt(9, 0, 0).unwrap()).with_candidate("P1"),
///         SlotInput::new(1, day.and_hms_opt(14, 0, 0).unwrap()).with_candidate("P1"),
///         SlotInput::new(2, day.and_hms_opt(18, 0, 0).unwrap()),
///     ],
///     vec![Participant::new("P1").with_name("Alice")],
/// );
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let model = RosterModel::build(&request, &mut rng).unwrap();
/// assert_eq!(model.slot_count(), 3);
/// assert!(model.slots()[2].is_vacant_only());
/// assert_eq!(model.day_groups()[0].slots, vec![0, 1]);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct RosterModel {
    slots: Vec<Slot>,
    participants: Vec<Participant>,
    #[serde(skip)]
    index_by_id: HashMap<String, usize>,
    day_groups: Vec<DayGroup>,
}

impl RosterModel {
    /// Validates `request` and builds the model.
    ///
    /// Sentinel IDs are drawn from `rng`.
    ///
    /// # Errors
    /// [`RosterError::ModelConstruction`] listing every structural issue.
    pub fn build<R: Rng + ?Sized>(request: &RosterRequest, rng: &mut R) -> Result<Self> {
        validate_input(&request.slots, &request.participants, &request.quotas)
            .map_err(RosterError::ModelConstruction)?;

        let participants: Vec<Participant> = request
            .participants
            .iter()
            .map(|p| match request.quotas.get(&p.id) {
                Some(quota) => p.clone().with_quota(quota),
                None => p.clone(),
            })
            .collect();

        let index_by_id: HashMap<String, usize> = participants
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        let mut inputs: Vec<&SlotInput> = request.slots.iter().collect();
        inputs.sort_by_key(|s| s.index);

        let mut used_sentinels = HashSet::new();
        let mut slots = Vec::with_capacity(inputs.len());
        for input in inputs {
            let mut people: Vec<usize> = Vec::with_capacity(input.eligible.len());
            for id in &input.eligible {
                // Validation guarantees every ID resolves.
                if let Some(&p) = index_by_id.get(id) {
                    if !people.contains(&p) {
                        people.push(p);
                    }
                }
            }

            if people.is_empty() {
                let sentinel = fresh_sentinel(rng, &mut used_sentinels);
                slots.push(Slot::vacant(input.index, input.start, sentinel));
            } else {
                slots.push(Slot::staffed(input.index, input.start, people));
            }
        }

        let day_groups = group_by_day(&slots);

        debug!(
            slots = slots.len(),
            participants = participants.len(),
            day_groups = day_groups.len(),
            sentinels = used_sentinels.len(),
            "roster model built"
        );

        Ok(Self {
            slots,
            participants,
            index_by_id,
            day_groups,
        })
    }

    /// All slots, by index.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot by index.
    pub fn slot(&self, index: usize) -> Result<&Slot> {
        self.slots.get(index).ok_or(RosterError::UnknownSlot(index))
    }

    /// Number of slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Participant table (quotas already merged from the request).
    #[inline]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Number of declared participants.
    #[inline]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Table position of a participant ID.
    pub fn participant_index(&self, id: &str) -> Result<usize> {
        self.index_by_id
            .get(id)
            .copied()
            .ok_or_else(|| RosterError::UnknownParticipant(id.to_string()))
    }

    /// Derived day groups, in chronological order.
    #[inline]
    pub fn day_groups(&self) -> &[DayGroup] {
        &self.day_groups
    }

    /// Number of slots whose domain is only a sentinel.
    pub fn vacant_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_vacant_only()).count()
    }

    /// Participant ID for a value; `None` for sentinels.
    pub fn participant_id(&self, value: &Assignee) -> Option<&str> {
        value
            .person()
            .and_then(|p| self.participants.get(p))
            .map(|p| p.id.as_str())
    }

    /// Display name for a value; sentinels render as [`VACANT_NAME`].
    pub fn display_name(&self, value: &Assignee) -> &str {
        value
            .person()
            .and_then(|p| self.participants.get(p))
            .map(Participant::display_name)
            .unwrap_or(VACANT_NAME)
    }
}

fn fresh_sentinel<R: Rng + ?Sized>(rng: &mut R, used: &mut HashSet<SentinelId>) -> SentinelId {
    loop {
        let candidate = SentinelId(rng.random());
        if used.insert(candidate) {
            return candidate;
        }
    }
}

/// Groups consecutive real slots by calendar day.
///
/// Sentinel-only slots are skipped entirely, so they neither join a group
/// nor break one. Groups of size <= 1 are dropped.
pub(crate) fn group_by_day(slots: &[Slot]) -> Vec<DayGroup> {
    let mut groups = Vec::new();
    let mut current: Option<DayGroup> = None;

    for slot in slots.iter().filter(|s| !s.is_vacant_only()) {
        let date = slot.date();
        if let Some(group) = current.as_mut().filter(|g| g.date == date) {
            group.slots.push(slot.index);
            continue;
        }
        if let Some(closed) = current.take() {
            if closed.slots.len() > 1 {
                groups.push(closed);
            }
        }
        current = Some(DayGroup {
            date,
            slots: vec![slot.index],
        });
    }

    if let Some(closed) = current {
        if closed.slots.len() > 1 {
            groups.push(closed);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quota;
    use crate::validation::ValidationErrorKind;
    use chrono::{NaiveDate, NaiveDateTime};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn slot(index: usize, day: u32, hour: u32, who: &[&str]) -> SlotInput {
        SlotInput::new(index, at(day, hour))
            .with_candidates(who.iter().map(|s| s.to_string()).collect())
    }

    fn people() -> Vec<Participant> {
        vec![
            Participant::new("P1").with_name("Alice"),
            Participant::new("P2").with_name("Bob"),
        ]
    }

    fn build(slots: Vec<SlotInput>) -> RosterModel {
        let mut rng = SmallRng::seed_from_u64(1);
        RosterModel::build(&RosterRequest::new(slots, people()), &mut rng).unwrap()
    }

    #[test]
    fn test_empty_eligibility_gets_sentinel() {
        let model = build(vec![slot(0, 4, 9, &["P1"]), slot(1, 4, 14, &[])]);
        let empty = &model.slots()[1];
        assert_eq!(empty.domain().len(), 1);
        assert!(empty.is_vacant_only());
        assert_eq!(model.vacant_slot_count(), 1);
        assert!(model.day_groups().is_empty());
    }

    #[test]
    fn test_sentinels_are_unique_per_slot() {
        let model = build(vec![
            slot(0, 4, 9, &[]),
            slot(1, 4, 12, &[]),
            slot(2, 4, 15, &[]),
            slot(3, 5, 9, &[]),
        ]);
        let sentinels: HashSet<SentinelId> =
            model.slots().iter().filter_map(Slot::sentinel).collect();
        assert_eq!(sentinels.len(), 4);
    }

    #[test]
    fn test_duplicate_candidates_collapsed() {
        let model = build(vec![slot(0, 4, 9, &["P2", "P1", "P2"])]);
        assert_eq!(
            model.slots()[0].domain(),
            &[Assignee::Person(1), Assignee::Person(0)]
        );
    }

    #[test]
    fn test_day_groups_basic() {
        let model = build(vec![
            slot(0, 4, 9, &["P1", "P2"]),
            slot(1, 4, 14, &["P1", "P2"]),
            slot(2, 5, 9, &["P1"]),
            slot(3, 6, 9, &["P1", "P2"]),
            slot(4, 6, 14, &["P2"]),
            slot(5, 6, 18, &["P1"]),
        ]);
        let groups = model.day_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(groups[0].slots, vec![0, 1]);
        assert_eq!(groups[1].slots, vec![3, 4, 5]);
    }

    #[test]
    fn test_day_groups_skip_vacant_slots() {
        // Empty slot between two real slots of the same day does not split them.
        let model = build(vec![
            slot(0, 4, 9, &["P1"]),
            slot(1, 4, 12, &[]),
            slot(2, 4, 15, &["P2"]),
        ]);
        assert_eq!(model.day_groups().len(), 1);
        assert_eq!(model.day_groups()[0].slots, vec![0, 2]);
    }

    #[test]
    fn test_day_groups_singletons_reset() {
        // A singleton day must not leak into the next day's group.
        let model = build(vec![
            slot(0, 4, 9, &["P1"]),
            slot(1, 5, 9, &["P1"]),
            slot(2, 5, 14, &["P2"]),
            slot(3, 6, 9, &["P2"]),
        ]);
        assert_eq!(model.day_groups().len(), 1);
        assert_eq!(model.day_groups()[0].slots, vec![1, 2]);
    }

    #[test]
    fn test_day_groups_same_day_of_month_different_month() {
        let march = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let april = NaiveDate::from_ymd_opt(2024, 4, 4).unwrap();
        let model = build(vec![
            SlotInput::new(0, march.and_hms_opt(9, 0, 0).unwrap()).with_candidate("P1"),
            SlotInput::new(1, april.and_hms_opt(9, 0, 0).unwrap()).with_candidate("P1"),
        ]);
        assert!(model.day_groups().is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let inputs = vec![
            slot(0, 4, 9, &["P1", "P2"]),
            slot(1, 4, 14, &[]),
            slot(2, 4, 18, &["P2"]),
            slot(3, 5, 9, &[]),
        ];
        let request = RosterRequest::new(inputs, people());
        let a = RosterModel::build(&request, &mut SmallRng::seed_from_u64(1)).unwrap();
        let b = RosterModel::build(&request, &mut SmallRng::seed_from_u64(99)).unwrap();

        assert_eq!(a.day_groups(), b.day_groups());
        for (sa, sb) in a.slots().iter().zip(b.slots()) {
            assert_eq!(sa.is_vacant_only(), sb.is_vacant_only());
            if !sa.is_vacant_only() {
                assert_eq!(sa.domain(), sb.domain());
            }
        }
    }

    #[test]
    fn test_slots_sorted_by_index() {
        let model = build(vec![slot(1, 4, 14, &["P2"]), slot(0, 4, 9, &["P1"])]);
        assert_eq!(model.slots()[0].index, 0);
        assert_eq!(model.slots()[1].index, 1);
    }

    #[test]
    fn test_quota_config_overrides_participant_quota() {
        let participants = vec![
            Participant::new("P1").with_quota(Quota::at_least(1)),
            Participant::new("P2").with_quota(Quota::at_most(3)),
        ];
        let mut quotas = QuotaConfig::new();
        quotas.set("P1", Quota::exactly(2));
        let request = RosterRequest::new(vec![slot(0, 4, 9, &["P1"])], participants)
            .with_quotas(quotas);
        let model = RosterModel::build(&request, &mut SmallRng::seed_from_u64(1)).unwrap();
        assert_eq!(model.participants()[0].quota, Some(Quota::exactly(2)));
        assert_eq!(model.participants()[1].quota, Some(Quota::at_most(3)));
    }

    #[test]
    fn test_build_rejects_invalid_input() {
        let participants = vec![Participant::new("P1").with_quota(Quota::new(3, Some(1)))];
        let request = RosterRequest::new(
            vec![slot(0, 4, 9, &["P1"]), slot(0, 4, 12, &["P9"])],
            participants,
        );
        let err = RosterModel::build(&request, &mut SmallRng::seed_from_u64(1)).unwrap_err();
        match err {
            RosterError::ModelConstruction(errors) => {
                let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
                assert!(kinds.contains(&ValidationErrorKind::DuplicateSlotIndex));
                assert!(kinds.contains(&ValidationErrorKind::UnknownParticipant));
                assert!(kinds.contains(&ValidationErrorKind::InvalidQuota));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lookups() {
        let model = build(vec![slot(0, 4, 9, &["P2"]), slot(1, 4, 12, &[])]);
        assert_eq!(model.participant_index("P2").unwrap(), 1);
        assert!(matches!(
            model.participant_index("nobody"),
            Err(RosterError::UnknownParticipant(_))
        ));
        assert!(matches!(model.slot(9), Err(RosterError::UnknownSlot(9))));

        let person = Assignee::Person(1);
        assert_eq!(model.participant_id(&person), Some("P2"));
        assert_eq!(model.display_name(&person), "Bob");

        let vacant = model.slots()[1].domain()[0];
        assert_eq!(model.participant_id(&vacant), None);
        assert_eq!(model.display_name(&vacant), VACANT_NAME);
    }
}
