//! Assignment (working state) and solution (result) models.
//!
//! An [`Assignment`] maps slots to values and may be partial. It keeps a
//! per-participant occurrence count up to date so that frequency checks
//! are O(1). A [`Solution`] is the frozen, complete form handed back to
//! callers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Assignee, RosterModel};
use crate::error::{Result, RosterError};

/// A (possibly partial) binding of slots to values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<Option<Assignee>>,
    counts: Vec<u32>,
    unbound: usize,
}

impl Assignment {
    /// Creates an assignment with every slot unbound.
    pub fn new(slot_count: usize, participant_count: usize) -> Self {
        Self {
            values: vec![None; slot_count],
            counts: vec![0; participant_count],
            unbound: slot_count,
        }
    }

    /// Creates an empty assignment sized for `model`.
    pub fn for_model(model: &RosterModel) -> Self {
        Self::new(model.slot_count(), model.participant_count())
    }

    /// Binds `slot` to `value`, returning the previous value.
    ///
    /// Domain membership is not checked here; callers draw values from
    /// the slot's domain.
    ///
    /// # Errors
    /// [`RosterError::UnknownSlot`] or
    /// [`RosterError::UnknownParticipantIndex`] when an index is out of
    /// range; the assignment is left untouched.
    pub fn try_bind(&mut self, slot: usize, value: Assignee) -> Result<Option<Assignee>> {
        if slot >= self.values.len() {
            return Err(RosterError::UnknownSlot(slot));
        }
        if let Assignee::Person(p) = value {
            if p >= self.counts.len() {
                return Err(RosterError::UnknownParticipantIndex(p));
            }
        }
        Ok(self.bind(slot, value))
    }

    /// Unbinds `slot`, returning the previous value.
    ///
    /// # Errors
    /// [`RosterError::UnknownSlot`] when `slot` is out of range.
    pub fn try_unbind(&mut self, slot: usize) -> Result<Option<Assignee>> {
        if slot >= self.values.len() {
            return Err(RosterError::UnknownSlot(slot));
        }
        Ok(self.unbind(slot))
    }

    /// Unchecked [`try_bind`](Self::try_bind) for values drawn from the
    /// model's own domains.
    pub(crate) fn bind(&mut self, slot: usize, value: Assignee) -> Option<Assignee> {
        let previous = self.values[slot].replace(value);
        match previous {
            Some(old) => self.forget(old),
            None => self.unbound -= 1,
        }
        if let Assignee::Person(p) = value {
            self.counts[p] += 1;
        }
        previous
    }

    pub(crate) fn unbind(&mut self, slot: usize) -> Option<Assignee> {
        let previous = self.values[slot].take();
        if let Some(old) = previous {
            self.forget(old);
            self.unbound += 1;
        }
        previous
    }

    fn forget(&mut self, value: Assignee) {
        if let Assignee::Person(p) = value {
            self.counts[p] -= 1;
        }
    }

    /// Current value of `slot`.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<Assignee> {
        self.values.get(slot).copied().flatten()
    }

    /// Number of slots bound to participant `person`.
    #[inline]
    pub fn count(&self, person: usize) -> u32 {
        self.counts.get(person).copied().unwrap_or(0)
    }

    /// Total number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of unbound slots.
    #[inline]
    pub fn unbound_count(&self) -> usize {
        self.unbound
    }

    /// Whether every slot is bound.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unbound == 0
    }

    /// Freezes a complete assignment into a [`Solution`].
    ///
    /// Returns `None` while any slot is unbound.
    pub fn to_solution(&self) -> Option<Solution> {
        self.values
            .iter()
            .copied()
            .collect::<Option<Vec<_>>>()
            .map(|values| Solution { values })
    }
}

/// A complete slot → value mapping produced by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    values: Vec<Assignee>,
}

/// One line of a solved roster, ready for a reporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry<'a> {
    /// Slot index.
    pub slot: usize,
    /// Slot start time.
    pub start: NaiveDateTime,
    /// Assigned participant ID; `None` for an empty shift.
    pub participant_id: Option<&'a str>,
    /// Display name (sentinels render as `<empty>`).
    pub name: &'a str,
}

impl Solution {
    /// Value bound to `slot`.
    pub fn get(&self, slot: usize) -> Result<Assignee> {
        self.values
            .get(slot)
            .copied()
            .ok_or(RosterError::UnknownSlot(slot))
    }

    /// Values by slot index.
    #[inline]
    pub fn values(&self) -> &[Assignee] {
        &self.values
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the solution covers no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of slots assigned to participant `person`.
    pub fn count_for(&self, person: usize) -> usize {
        self.values
            .iter()
            .filter(|v| **v == Assignee::Person(person))
            .count()
    }

    /// Number of slots left empty.
    pub fn vacant_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_vacant()).count()
    }

    /// Slot index → participant ID (`None` for empty shifts).
    pub fn participant_ids<'a>(&self, model: &'a RosterModel) -> Vec<Option<&'a str>> {
        self.values
            .iter()
            .map(|v| model.participant_id(v))
            .collect()
    }

    /// Ordered roster lines combining the solution with model data.
    pub fn entries<'a>(&self, model: &'a RosterModel) -> Vec<RosterEntry<'a>> {
        self.values
            .iter()
            .zip(model.slots())
            .map(|(value, slot)| RosterEntry {
                slot: slot.index,
                start: slot.start,
                participant_id: model.participant_id(value),
                name: model.display_name(value),
            })
            .collect()
    }
}
