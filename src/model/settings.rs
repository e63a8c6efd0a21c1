use serde::{Deserialize, Serialize};

use crate::model::{constants::DEFAULT_BOOSTED_RANKS, error::TrackerError};

/// Operator-adjustable knobs applied on top of the static goal table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Applied to every weekly score
    pub global_multiplier: f64,
    /// Doubles both thresholds of the boosted ranks
    pub threshold_doubled: bool,
    /// Triples both thresholds of the boosted ranks
    pub threshold_tripled: bool,
    /// How many ranks, counted from the floor, are affected by doubling/tripling
    pub boosted_ranks: usize
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        RuntimeSettings {
            global_multiplier: 1.0,
            threshold_doubled: false,
            threshold_tripled: false,
            boosted_ranks: DEFAULT_BOOSTED_RANKS
        }
    }
}

impl RuntimeSettings {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.threshold_doubled && self.threshold_tripled {
            return Err(TrackerError::invalid_config(
                "threshold doubling and tripling cannot be enabled at the same time"
            ));
        }

        if !self.global_multiplier.is_finite() || self.global_multiplier <= 0.0 {
            return Err(TrackerError::invalid_config(format!(
                "global multiplier must be positive, got {}",
                self.global_multiplier
            )));
        }

        Ok(())
    }

    /// Factor applied to the thresholds of the rank at `rank_index`
    pub fn threshold_factor(&self, rank_index: usize) -> f64 {
        if rank_index >= self.boosted_ranks {
            return 1.0;
        }

        if self.threshold_tripled {
            3.0
        } else if self.threshold_doubled {
            2.0
        } else {
            1.0
        }
    }
}
