//! Roster workload metrics (KPIs).
//!
//! Summarises how a solved roster spreads work across participants.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Shifts by participant | Slots held by each declared participant |
//! | Vacant slots | Slots bound to their sentinel |
//! | Staffed rate | Fraction of slots held by a real participant |
//! | Workload spread | Most-loaded minus least-loaded participant |
//! | Quota breaches | Participants outside their quota |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{RosterModel, Solution};

/// Roster workload indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterKpi {
    /// Participant ID → number of slots held.
    pub shifts_by_participant: BTreeMap<String, usize>,
    /// Slots left empty.
    pub vacant_slots: usize,
    /// Fraction of slots held by a real participant (0.0..1.0).
    pub staffed_rate: f64,
    /// Difference between the largest and smallest participant load.
    pub workload_spread: usize,
    /// IDs of participants whose load lies outside their quota.
    pub quota_breaches: Vec<String>,
}

impl RosterKpi {
    /// Computes KPIs for a solution of `model`.
    pub fn calculate(model: &RosterModel, solution: &Solution) -> Self {
        let mut shifts_by_participant = BTreeMap::new();
        let mut quota_breaches = Vec::new();

        for (index, participant) in model.participants().iter().enumerate() {
            let count = solution.count_for(index);
            shifts_by_participant.insert(participant.id.clone(), count);

            if let Some(quota) = participant.quota {
                let within = u32::try_from(count).map_or(false, |c| quota.contains(c));
                if !within {
                    quota_breaches.push(participant.id.clone());
                }
            }
        }

        let vacant_slots = solution.vacant_count();
        let staffed_rate = if solution.is_empty() {
            1.0
        } else {
            (solution.len() - vacant_slots) as f64 / solution.len() as f64
        };

        let workload_spread = match (
            shifts_by_participant.values().max(),
            shifts_by_participant.values().min(),
        ) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };

        Self {
            shifts_by_participant,
            vacant_slots,
            staffed_rate,
            workload_spread,
            quota_breaches,
        }
    }

    /// Whether every participant is within quota.
    pub fn meets_quotas(&self) -> bool {
        self.quota_breaches.is_empty()
    }

    /// Whether the roster meets the given staffing and fairness thresholds.
    pub fn meets_thresholds(&self, min_staffed_rate: f64, max_spread: usize) -> bool {
        self.staffed_rate >= min_staffed_rate && self.workload_spread <= max_spread
    }
}
