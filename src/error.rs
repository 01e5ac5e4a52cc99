//! Error types for roster construction and configuration.
//!
//! Solver exhaustion is deliberately absent: running out of steps is a
//! regular [`SolveOutcome`](crate::solver::SolveOutcome), not an error.

use thiserror::Error;

use crate::validation::ValidationError;

/// Top-level error type for `u-roster` operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Slot or participant input is structurally inconsistent.
    ///
    /// Carries every issue found, not only the first one.
    #[error("invalid roster input: {}", join_messages(.0))]
    ModelConstruction(Vec<ValidationError>),

    /// Configuration JSON could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A slot index outside the model was requested.
    #[error("unknown slot index {0}")]
    UnknownSlot(usize),

    /// A participant table index outside the model was used.
    #[error("unknown participant index {0}")]
    UnknownParticipantIndex(usize),

    /// A participant ID not declared in the model was requested.
    #[error("unknown participant '{0}'")]
    UnknownParticipant(String),
}

/// Result type alias using [`RosterError`].
pub type Result<T> = std::result::Result<T, RosterError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
