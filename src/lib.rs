//! Shift rostering for the U-Engine ecosystem.
//!
//! Assigns participants to a fixed sequence of time slots subject to
//! day-uniqueness rules and workload quotas, using min-conflicts local
//! search.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Slot`, `Participant`, `Quota`,
//!   `RosterModel`, `DayGroup`, `Assignment`, `Solution`
//! - **`constraints`**: `Constraint` (day-uniqueness, frequency-bound) and
//!   the `ConstraintSet` derived from a model
//! - **`solver`**: `MinConflictsSolver` and its configuration, outcome and
//!   statistics
//! - **`scheduler`**: `RosterPlanner` orchestration and `RosterKpi` metrics
//! - **`validation`**: Input integrity checks (duplicate indices, ordering,
//!   unknown participants, malformed quotas)
//! - **`config`**: Static quota table and run configuration (JSON)
//!
//! # Architecture
//!
//! Poll ingestion, quota collection and report rendering live outside this
//! crate; it consumes fully materialized slot and participant data and
//! returns either a complete roster or an explicit exhaustion marker.
//! All randomness flows through a caller-supplied generator.
//!
//! # References
//!
//! - Minton et al. (1992), "Minimizing conflicts: a heuristic repair method
//!   for constraint satisfaction and scheduling problems"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach",
//!   Ch. 6

pub mod config;
pub mod constraints;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use error::{Result, RosterError};
