//! Input validation for roster problems.
//!
//! Checks structural integrity of slots, participants and quotas before
//! a model is built. Detects:
//! - Duplicate or non-contiguous slot indices
//! - Slots out of chronological order
//! - Duplicate participant IDs
//! - Eligibility or quota entries naming undeclared participants
//! - Quotas with `max < min`
//!
//! All issues are collected; validation does not stop at the first one.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::QuotaConfig;
use crate::models::{Participant, SlotInput};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two slots share the same index.
    DuplicateSlotIndex,
    /// Slot indices do not cover `0..n` exactly.
    SlotIndexGap,
    /// A slot starts before the slot preceding it.
    OutOfOrder,
    /// Two participants share the same ID.
    DuplicateParticipantId,
    /// A slot lists a participant that was not declared.
    UnknownParticipant,
    /// The quota table names a participant that was not declared.
    UnknownQuotaParticipant,
    /// A quota has `max < min`.
    InvalidQuota,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a roster problem.
///
/// Checks:
/// 1. No duplicate slot indices
/// 2. Slot indices are exactly `0..n`
/// 3. Slots ordered by index are also ordered by start time
/// 4. No duplicate participant IDs
/// 5. All eligibility references point to declared participants
/// 6. All quota table entries point to declared participants
/// 7. Every quota (on a participant or in the table) has `max >= min`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    slots: &[SlotInput],
    participants: &[Participant],
    quotas: &QuotaConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    // Slot indices
    let mut indices = HashSet::new();
    for slot in slots {
        if !indices.insert(slot.index) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSlotIndex,
                format!("Duplicate slot index: {}", slot.index),
            ));
        }
    }
    if let Some(missing) = (0..slots.len()).find(|i| !indices.contains(i)) {
        errors.push(ValidationError::new(
            ValidationErrorKind::SlotIndexGap,
            format!(
                "Slot indices must cover 0..{}; index {missing} is missing",
                slots.len()
            ),
        ));
    }

    // Chronological order
    let mut ordered: Vec<&SlotInput> = slots.iter().collect();
    ordered.sort_by_key(|s| s.index);
    for pair in ordered.windows(2) {
        if pair[1].start < pair[0].start {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfOrder,
                format!(
                    "Slot {} starts at {} before slot {} at {}",
                    pair[1].index, pair[1].start, pair[0].index, pair[0].start
                ),
            ));
        }
    }

    // Participants
    let mut participant_ids = HashSet::new();
    for p in participants {
        if !participant_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateParticipantId,
                format!("Duplicate participant ID: {}", p.id),
            ));
        }
        if let Some(quota) = p.quota {
            if !quota.is_well_formed() {
                errors.push(invalid_quota(&p.id, quota.min, quota.max));
            }
        }
    }

    // Eligibility references
    for slot in slots {
        for id in &slot.eligible {
            if !participant_ids.contains(id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownParticipant,
                    format!("Slot {} references unknown participant '{id}'", slot.index),
                ));
            }
        }
    }

    // Quota table
    for (id, quota) in quotas.iter() {
        if !participant_ids.contains(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownQuotaParticipant,
                format!("Quota configured for unknown participant '{id}'"),
            ));
        }
        if !quota.is_well_formed() {
            errors.push(invalid_quota(id, quota.min, quota.max));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn invalid_quota(id: &str, min: u32, max: Option<u32>) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::InvalidQuota,
        format!(
            "Quota for '{id}' has max {} < min {min}",
            max.map(|m| m.to_string()).unwrap_or_default()
        ),
    )
}
