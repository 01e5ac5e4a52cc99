//! Slot model.
//!
//! A slot is one schedulable shift: an ordinal index, a start time and
//! the domain of values it may be bound to.
//!
//! # Domain invariant
//! A built [`Slot`] never has an empty domain. When nobody is eligible,
//! the domain holds exactly one [`Assignee::Vacant`] sentinel that no
//! other slot shares.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Per-slot "nobody assigned" marker.
///
/// Drawn at model construction and unique within a model, so two empty
/// slots on the same day never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentinelId(pub u64);

/// A value a slot can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assignee {
    /// A real participant, by position in the model's participant table.
    Person(usize),
    /// The empty-shift sentinel of one particular slot.
    Vacant(SentinelId),
}

impl Assignee {
    /// Participant index if this is a real person.
    #[inline]
    pub fn person(&self) -> Option<usize> {
        match self {
            Self::Person(p) => Some(*p),
            Self::Vacant(_) => None,
        }
    }

    /// Whether this is a sentinel.
    #[inline]
    pub fn is_vacant(&self) -> bool {
        matches!(self, Self::Vacant(_))
    }
}

/// Raw slot input as delivered by poll ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotInput {
    /// Ordinal position (slots are indexed `0..n`).
    pub index: usize,
    /// Local wall-clock start time.
    pub start: NaiveDateTime,
    /// IDs of participants eligible for this slot.
    #[serde(default)]
    pub eligible: Vec<String>,
}

impl SlotInput {
    /// Creates a slot input with no eligible participants.
    pub fn new(index: usize, start: NaiveDateTime) -> Self {
        Self {
            index,
            start,
            eligible: Vec::new(),
        }
    }

    /// Creates a slot input from a millisecond Unix timestamp, shifted
    /// into the given UTC offset.
    ///
    /// Returns `None` if the timestamp is out of range.
    pub fn from_epoch_ms(index: usize, epoch_ms: i64, offset: FixedOffset) -> Option<Self> {
        let utc = DateTime::from_timestamp_millis(epoch_ms)?;
        Some(Self::new(index, utc.with_timezone(&offset).naive_local()))
    }

    /// Adds an eligible participant.
    pub fn with_candidate(mut self, participant_id: impl Into<String>) -> Self {
        self.eligible.push(participant_id.into());
        self
    }

    /// Sets all eligible participants.
    pub fn with_candidates(mut self, participant_ids: Vec<String>) -> Self {
        self.eligible = participant_ids;
        self
    }
}

/// A constructed slot with a non-empty domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    /// Ordinal position.
    pub index: usize,
    /// Local wall-clock start time.
    pub start: NaiveDateTime,
    domain: Vec<Assignee>,
}

impl Slot {
    /// Slot with real candidates. `people` must be non-empty.
    pub(crate) fn staffed(index: usize, start: NaiveDateTime, people: Vec<usize>) -> Self {
        debug_assert!(!people.is_empty());
        Self {
            index,
            start,
            domain: people.into_iter().map(Assignee::Person).collect(),
        }
    }

    /// Slot whose only value is its own sentinel.
    pub(crate) fn vacant(index: usize, start: NaiveDateTime, sentinel: SentinelId) -> Self {
        Self {
            index,
            start,
            domain: vec![Assignee::Vacant(sentinel)],
        }
    }

    /// Candidate values, in input order.
    #[inline]
    pub fn domain(&self) -> &[Assignee] {
        &self.domain
    }

    /// Calendar day of the start time.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Whether nobody real is eligible (domain is exactly the sentinel).
    pub fn is_vacant_only(&self) -> bool {
        self.domain.iter().all(Assignee::is_vacant)
    }

    /// The slot's sentinel, if it has one.
    pub fn sentinel(&self) -> Option<SentinelId> {
        self.domain.iter().find_map(|v| match v {
            Assignee::Vacant(s) => Some(*s),
            Assignee::Person(_) => None,
        })
    }

    /// Whether `value` is in the domain.
    #[inline]
    pub fn admits(&self, value: &Assignee) -> bool {
        self.domain.contains(value)
    }

    /// Whether participant `person` is eligible.
    #[inline]
    pub fn admits_person(&self, person: usize) -> bool {
        self.admits(&Assignee::Person(person))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_staffed_slot_domain() {
        let slot = Slot::staffed(0, at(4, 9), vec![2, 0]);
        assert_eq!(slot.domain(), &[Assignee::Person(2), Assignee::Person(0)]);
        assert!(!slot.is_vacant_only());
        assert!(slot.admits_person(0));
        assert!(!slot.admits_person(1));
        assert_eq!(slot.sentinel(), None);
    }

    #[test]
    fn test_vacant_slot_domain() {
        let slot = Slot::vacant(3, at(4, 14), SentinelId(42));
        assert_eq!(slot.domain(), &[Assignee::Vacant(SentinelId(42))]);
        assert!(slot.is_vacant_only());
        assert_eq!(slot.sentinel(), Some(SentinelId(42)));
        assert_eq!(slot.date(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_assignee_accessors() {
        assert_eq!(Assignee::Person(5).person(), Some(5));
        assert!(!Assignee::Person(5).is_vacant());
        assert_eq!(Assignee::Vacant(SentinelId(1)).person(), None);
        assert!(Assignee::Vacant(SentinelId(1)).is_vacant());
    }

    #[test]
    fn test_slot_input_from_epoch_ms() {
        // 2024-03-04T23:30:00Z
        let ms = 1_709_595_000_000;
        let utc = SlotInput::from_epoch_ms(0, ms, FixedOffset::east_opt(0).unwrap()).unwrap();
        assert_eq!(utc.start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(23, 30, 0).unwrap());

        // Same instant is already the next day at UTC+1.
        let cet = SlotInput::from_epoch_ms(0, ms, FixedOffset::east_opt(3600).unwrap()).unwrap();
        assert_eq!(cet.start.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_slot_input_builder() {
        let input = SlotInput::new(1, at(5, 9))
            .with_candidate("P1")
            .with_candidate("P2");
        assert_eq!(input.eligible, vec!["P1".to_string(), "P2".to_string()]);
        let replaced = input.with_candidates(vec!["P3".into()]);
        assert_eq!(replaced.eligible, vec!["P3".to_string()]);
    }
}
