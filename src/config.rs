//! Static roster configuration.
//!
//! Quotas are supplied up front as a `participant-id → Quota` table
//! rather than collected interactively. The whole configuration can be
//! loaded from JSON:
//!
//! ```
//! use u_roster::config::RosterConfig;
//! use u_roster::models::Quota;
//!
//! let config = RosterConfig::from_json_str(r#"{
//!     "quotas": { "P1": { "min": 2, "max": 2 }, "P2": { "min": 0 } },
//!     "solver": { "max_steps": 50000 },
//!     "attempts": 3,
//!     "seed": 42
//! }"#).unwrap();
//!
//! assert_eq!(config.quotas.get("P1"), Some(Quota::exactly(2)));
//! assert_eq!(config.solver.max_steps, 50_000);
//! assert_eq!(config.attempts, 3);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Quota;
use crate::solver::SolverConfig;

/// Participant quotas keyed by participant ID.
///
/// Entries override any quota carried on the participant itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaConfig {
    quotas: BTreeMap<String, Quota>,
}

impl QuotaConfig {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quota for a participant.
    pub fn set(&mut self, participant_id: impl Into<String>, quota: Quota) {
        self.quotas.insert(participant_id.into(), quota);
    }

    /// Builder: sets a quota and returns self.
    pub fn with_quota(mut self, participant_id: impl Into<String>, quota: Quota) -> Self {
        self.set(participant_id, quota);
        self
    }

    /// Quota for a participant, if configured.
    pub fn get(&self, participant_id: &str) -> Option<Quota> {
        self.quotas.get(participant_id).copied()
    }

    /// Iterates entries in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quota)> {
        self.quotas.iter().map(|(id, q)| (id.as_str(), q))
    }

    /// Number of configured quotas.
    pub fn len(&self) -> usize {
        self.quotas.len()
    }

    /// Whether no quotas are configured.
    pub fn is_empty(&self) -> bool {
        self.quotas.is_empty()
    }
}

/// Run configuration: quotas, solver settings and retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Quota table.
    pub quotas: QuotaConfig,
    /// Min-conflicts settings.
    pub solver: SolverConfig,
    /// How many times the planner invokes the solver before giving up.
    pub attempts: u32,
    /// RNG seed. `None` = seed from the OS.
    pub seed: Option<u64>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            quotas: QuotaConfig::new(),
            solver: SolverConfig::default(),
            attempts: 1,
            seed: None,
        }
    }
}

impl RosterConfig {
    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the quota table.
    pub fn with_quotas(mut self, quotas: QuotaConfig) -> Self {
        self.quotas = quotas;
        self
    }

    /// Sets the solver settings.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the number of solver attempts (at least 1 is used).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
