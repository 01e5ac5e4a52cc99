//! Roster constraints and their evaluation.
//!
//! [`Constraint`] is a closed set of rule variants evaluated through a
//! single violation-count operation; [`ConstraintSet`] derives them from
//! a [`RosterModel`](crate::models::RosterModel) and indexes them by slot
//! for fast local re-evaluation.

mod constraint;
mod set;

pub use constraint::{Constraint, EvaluationMode};
pub use set::ConstraintSet;
