//! End-to-end roster planning.
//!
//! # Algorithm
//!
//! 1. Merge the configured quota table into the request.
//! 2. Build the [`RosterModel`] (fails fast on invalid input).
//! 3. Derive the [`ConstraintSet`].
//! 4. Run [`MinConflictsSolver`] up to `attempts` times with the same
//!    generator, stopping at the first success.
//!
//! The solver itself never retries; re-invoking it on exhaustion is the
//! planner's job.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::RosterConfig;
use crate::constraints::ConstraintSet;
use crate::error::Result;
use crate::models::{RosterEntry, RosterModel, RosterRequest, Solution};
use crate::solver::{MinConflictsSolver, SolveResult};

use super::RosterKpi;

/// Result of a planning run.
#[derive(Debug, Clone)]
pub struct Plan {
    /// The model that was solved.
    pub model: RosterModel,
    /// Constraints derived from the model.
    pub constraints: ConstraintSet,
    /// Result of the last solver attempt.
    pub result: SolveResult,
    /// Solver invocations performed (>= 1).
    pub attempts: u32,
}

impl Plan {
    /// Whether a roster was found.
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    /// The roster, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        self.result.solution()
    }

    /// Ordered roster lines, if a roster was found.
    pub fn entries(&self) -> Option<Vec<RosterEntry<'_>>> {
        self.solution().map(|s| s.entries(&self.model))
    }

    /// Workload KPIs, if a roster was found.
    pub fn kpi(&self) -> Option<RosterKpi> {
        self.solution().map(|s| RosterKpi::calculate(&self.model, s))
    }
}

/// Builds, constrains and solves a roster according to a [`RosterConfig`].
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_roster::config::{QuotaConfig, RosterConfig};
/// use u_roster::models::{Participant, Quota, RosterRequest, SlotInput};
/// use u_roster::scheduler::RosterPlanner;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let request = RosterRequest::new(
///     vec![
///         SlotInput::new(0, day.and_hms_opt(9, 0, 0).unwrap()).with_candidate("P1").with_candidate("P2"),
///         SlotInput::new(1, day.and_hms_opt(14, 0, 0).unwrap()).with_candidate("P1").with_candidate("P2"),
///     ],
///     vec![Participant::new("P1"), Participant::new("P2")],
/// );
/// let config = RosterConfig::default()
///     .with_quotas(QuotaConfig::new().with_quota("P1", Quota::exactly(1)))
///     .with_seed(7);
///
/// let plan = RosterPlanner::new(config).plan(&request).unwrap();
/// let ids = plan.solution().unwrap().participant_ids(&plan.model);
/// assert!(ids.contains(&Some("P1")) && ids.contains(&Some("P2")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterPlanner {
    config: RosterConfig,
}

impl RosterPlanner {
    /// Creates a planner.
    pub fn new(config: RosterConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Plans with a generator seeded from the configured seed, or from
    /// the OS when no seed is configured.
    pub fn plan(&self, request: &RosterRequest) -> Result<Plan> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.plan_with_rng(request, &mut rng)
    }

    /// Plans using the given generator for model construction and every
    /// solver attempt.
    ///
    /// # Errors
    /// Model construction errors; exhaustion is reported in the [`Plan`].
    pub fn plan_with_rng<R: Rng + ?Sized>(&self, request: &RosterRequest, rng: &mut R) -> Result<Plan> {
        let mut quotas = request.quotas.clone();
        for (id, quota) in self.config.quotas.iter() {
            quotas.set(id, *quota);
        }
        let request = request.clone().with_quotas(quotas);

        let model = RosterModel::build(&request, rng)?;
        let constraints = ConstraintSet::from_model(&model);
        let solver = MinConflictsSolver::new(self.config.solver);
        let max_attempts = self.config.attempts.max(1);

        let mut attempts = 1;
        let mut result = solver.solve(&model, &constraints, rng);
        while !result.is_success() && attempts < max_attempts {
            warn!(
                attempt = attempts,
                max_attempts,
                steps = result.stats.steps,
                "solver exhausted, retrying"
            );
            attempts += 1;
            result = solver.solve(&model, &constraints, rng);
        }

        debug!(attempts, success = result.is_success(), "planning finished");

        Ok(Plan {
            model,
            constraints,
            result,
            attempts,
        })
    }
}
