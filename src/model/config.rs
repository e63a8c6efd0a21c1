use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path
};

use serde::{Deserialize, Serialize};

use crate::model::{
    error::TrackerError,
    evaluator::CycleEvaluator,
    jump_policy::JumpPolicy,
    ladder::{RankDefinition, RankLadder},
    scoring::ScoringConfig,
    settings::RuntimeSettings
};

/// One rank entry of a ladder configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    pub name: String,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
    pub promotion_threshold: f64,
    pub maintenance_threshold: f64,
    /// Multiplier -> highest rank reachable in one promotion.
    /// Any rank carrying a table switches the ladder to fast-track jumps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_caps: Option<BTreeMap<u32, String>>
}

fn default_cycle_length() -> u32 {
    1
}

/// Static ladder configuration, provided once at startup.
///
/// ```json
/// {
///   "ranks": [
///     { "name": "bronze", "cycle_length": 2, "promotion_threshold": 20, "maintenance_threshold": 13,
///       "jump_caps": { "2": "silver", "3": "gold" } },
///     { "name": "silver", "promotion_threshold": 40, "maintenance_threshold": 30 }
///   ],
///   "scoring": { "units_per_point": 50, "activity_unit": "messages" },
///   "settings": { "global_multiplier": 1.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderConfig {
    pub ranks: Vec<RankConfig>,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub settings: RuntimeSettings,
    /// Promotions always advance one level, whatever the promotion multiplier
    #[serde(default)]
    pub single_level_promotion: bool
}

impl LadderConfig {
    pub fn from_json(json: &str) -> Result<LadderConfig, TrackerError> {
        serde_json::from_str(json).map_err(|e| TrackerError::invalid_config(format!("malformed ladder config: {}", e)))
    }

    pub fn from_path(path: &Path) -> Result<LadderConfig, TrackerError> {
        let json = fs::read_to_string(path).map_err(|e| {
            TrackerError::invalid_config(format!("cannot read ladder config {}: {}", path.display(), e))
        })?;

        LadderConfig::from_json(&json)
    }

    pub fn jump_policy(&self) -> JumpPolicy {
        if self.single_level_promotion {
            return JumpPolicy::SingleLevel;
        }

        let tables: HashMap<String, BTreeMap<u32, String>> = self
            .ranks
            .iter()
            .filter_map(|rank| rank.jump_caps.as_ref().map(|caps| (rank.name.clone(), caps.clone())))
            .collect();

        if tables.is_empty() {
            JumpPolicy::Uniform
        } else {
            JumpPolicy::FastTrack(tables)
        }
    }

    pub fn ladder(&self) -> Result<RankLadder, TrackerError> {
        RankLadder::new(
            self.ranks
                .iter()
                .map(|rank| {
                    RankDefinition::new(
                        &rank.name,
                        rank.cycle_length,
                        rank.promotion_threshold,
                        rank.maintenance_threshold
                    )
                })
                .collect()
        )
    }

    /// Validates the whole configuration and builds the evaluator
    pub fn build(&self) -> Result<CycleEvaluator, TrackerError> {
        if self.single_level_promotion {
            if let Some(rank) = self.ranks.iter().find(|rank| rank.jump_caps.is_some()) {
                return Err(TrackerError::invalid_config(format!(
                    "rank '{}' has jump caps but promotions are single level",
                    rank.name
                )));
            }
        }

        CycleEvaluator::new(
            self.ladder()?,
            self.jump_policy(),
            self.scoring.clone(),
            self.settings.clone()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::LadderConfig;
    use crate::model::{error::TrackerError, jump_policy::JumpPolicy};

    const CONFIG: &str = r#"{
        "ranks": [
            { "name": "bronze", "cycle_length": 2, "promotion_threshold": 20, "maintenance_threshold": 13,
              "jump_caps": { "2": "silver", "3": "gold" } },
            { "name": "silver", "promotion_threshold": 40, "maintenance_threshold": 30 },
            { "name": "gold", "promotion_threshold": 60, "maintenance_threshold": 50 },
            { "name": "platinum", "promotion_threshold": 90, "maintenance_threshold": 70 }
        ],
        "scoring": { "units_per_point": 2.0, "activity_unit": "hours" }
    }"#;

    #[test]
    fn test_parse_and_build() {
        let config = LadderConfig::from_json(CONFIG).unwrap();
        let evaluator = config.build().unwrap();

        assert_eq!(evaluator.ladder().len(), 4);
        assert_eq!(evaluator.cycle_length("bronze").unwrap(), 2);
        assert_eq!(evaluator.cycle_length("silver").unwrap(), 1);
        assert_eq!(evaluator.scoring().units_per_point, 2.0);
        assert_eq!(evaluator.settings().global_multiplier, 1.0);
        assert!(matches!(evaluator.jump_policy(), JumpPolicy::FastTrack(_)));
    }

    #[test]
    fn test_no_caps_is_uniform() {
        let config = LadderConfig::from_json(
            r#"{ "ranks": [ { "name": "x", "promotion_threshold": 1, "maintenance_threshold": 0 } ] }"#
        )
        .unwrap();

        assert_eq!(config.jump_policy(), JumpPolicy::Uniform);
    }

    #[test]
    fn test_single_level_promotion() {
        let config = LadderConfig::from_json(
            r#"{
                "ranks": [
                    { "name": "x", "promotion_threshold": 10, "maintenance_threshold": 5 },
                    { "name": "y", "promotion_threshold": 20, "maintenance_threshold": 10 },
                    { "name": "z", "promotion_threshold": 30, "maintenance_threshold": 20 }
                ],
                "single_level_promotion": true
            }"#
        )
        .unwrap();
        let evaluator = config.build().unwrap();

        assert_eq!(*evaluator.jump_policy(), JumpPolicy::SingleLevel);
        let evaluation = evaluator.classify("x", 35.0).unwrap();
        assert_eq!(evaluator.transition("x", &evaluation).unwrap(), ("y", 1));
    }

    #[test]
    fn test_single_level_with_jump_caps_rejected() {
        let mut config = LadderConfig::from_json(CONFIG).unwrap();
        config.single_level_promotion = true;

        assert!(matches!(config.build(), Err(TrackerError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        let config = LadderConfig::from_json(
            r#"{
                "ranks": [ { "name": "x", "promotion_threshold": 1, "maintenance_threshold": 0 } ],
                "settings": { "threshold_doubled": true, "threshold_tripled": true }
            }"#
        )
        .unwrap();

        assert!(matches!(config.build(), Err(TrackerError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LadderConfig::from_json("{ \"ranks\": "),
            Err(TrackerError::InvalidConfiguration(_))
        ));
    }
}
