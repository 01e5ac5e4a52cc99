//! Roster planning and KPI evaluation.
//!
//! Provides the caller-side orchestration around the solver and
//! roster quality metrics.
//!
//! # Planning
//!
//! `RosterPlanner` builds the model, derives constraints and invokes the
//! min-conflicts solver, re-invoking it on exhaustion up to a configured
//! number of attempts.
//!
//! # KPI
//!
//! `RosterKpi` computes workload metrics: shifts per participant, vacant
//! slots, staffed rate, workload spread and quota breaches.

mod kpi;
mod planner;

pub use kpi::RosterKpi;
pub use planner::{Plan, RosterPlanner};
