//! Engine configuration.
//!
//! Every section defaults independently, so a JSON document only needs the
//! keys it changes:
//!
//! ```
//! use u_burnsched::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "annealing": { "seed": 7 } }"#).unwrap();
//! assert_eq!(config.annealing.seed, Some(7));
//! assert_eq!(config.annealing.max_iterations, 1000);
//! assert_eq!(config.conflict.threshold, 0.85);
//! ```

use serde::{Deserialize, Serialize};

use crate::conflict::ConflictConfig;
use crate::error::EngineResult;
use crate::optimizer::{AnnealingConfig, CostWeights};
use crate::priority::PriorityWeights;
use crate::validation::ValidationLimits;

/// All tunable engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Request validation limits.
    pub validation: ValidationLimits,
    /// Priority scoring weights.
    pub priority: PriorityWeights,
    /// Conflict threshold and search radius.
    pub conflict: ConflictConfig,
    /// Schedule cost constants.
    pub cost: CostWeights,
    /// Annealing schedule and seed.
    pub annealing: AnnealingConfig,
}

impl EngineConfig {
    /// Parses a JSON document; missing keys take their defaults.
    ///
    /// # Errors
    /// [`crate::EngineError::Config`] for malformed JSON or mistyped values.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_string(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
