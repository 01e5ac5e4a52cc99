//! Participant and workload quota models.
//!
//! A participant is a person who can be rostered onto slots. Each may
//! carry a quota bounding how many slots they receive in total.

use serde::{Deserialize, Serialize};

/// Workload bounds for one participant: `min ..= max` slots.
///
/// `max = None` means unbounded above. Callers are expected to supply
/// `max >= min`; [`validate_input`](crate::validation::validate_input)
/// rejects the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quota {
    /// Minimum number of slots (inclusive).
    #[serde(default)]
    pub min: u32,
    /// Maximum number of slots (inclusive). `None` = no ceiling.
    #[serde(default)]
    pub max: Option<u32>,
}

impl Quota {
    /// Creates a quota with both bounds.
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Exactly `n` slots.
    pub fn exactly(n: u32) -> Self {
        Self::new(n, Some(n))
    }

    /// At least `min` slots, no ceiling.
    pub fn at_least(min: u32) -> Self {
        Self::new(min, None)
    }

    /// At most `max` slots.
    pub fn at_most(max: u32) -> Self {
        Self::new(0, Some(max))
    }

    /// Whether `max >= min` (or no max).
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.max.map_or(true, |max| max >= self.min)
    }

    /// Whether `count` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, count: u32) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// How far `count` lies outside `[min, max]` (0 when inside).
    #[inline]
    pub fn distance(&self, count: u32) -> u32 {
        if count < self.min {
            self.min - count
        } else {
            match self.max {
                Some(max) if count > max => count - max,
                _ => 0,
            }
        }
    }
}

/// A person who can be assigned to slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique participant identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Workload quota. `None` = no frequency constraint.
    #[serde(default)]
    pub quota: Option<Quota>,
}

impl Participant {
    /// Creates a participant without a quota.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            quota: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the quota.
    pub fn with_quota(mut self, quota: Quota) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Display name, falling back to the ID when no name is set.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Minimum slot requirement (0 without a quota).
    #[inline]
    pub fn min_slots(&self) -> u32 {
        self.quota.map(|q| q.min).unwrap_or(0)
    }
}
