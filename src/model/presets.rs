use strum_macros::{Display, EnumIter};

use crate::model::{
    config::{LadderConfig, RankConfig},
    constants::{CALL_HOURS_PER_POINT, MESSAGES_PER_POINT},
    scoring::{ModifierConfig, ScoringConfig},
    settings::RuntimeSettings
};

/// Ladder order, lowest first
pub const RANK_NAMES: [&str; 13] = [
    "f*ck", "100%", "woo", "sex", "note", "aura", "all wild", "cute", "mello", "void", "dawn", "upper", "Light"
];

/// Weekly (promotion, maintenance) points for the chat ladder
const CHAT_GOALS: [(f64, f64); 13] = [
    (15.0, 10.0),
    (20.0, 15.0),
    (70.0, 60.0),
    (100.0, 80.0),
    (195.0, 150.0),
    (336.0, 260.0),
    (440.0, 336.0),
    (580.0, 400.0),
    (681.0, 581.0),
    (801.0, 740.0),
    (971.0, 880.0),
    (1141.0, 1025.0),
    (1321.0, 1180.0)
];

/// Weekly (promotion, maintenance) hours for the call ladder
const CALL_GOALS: [(f64, f64); 13] = [
    (14.0, 12.0),
    (21.0, 14.0),
    (28.0, 21.0),
    (33.0, 28.0),
    (38.0, 33.0),
    (42.0, 38.0),
    (45.0, 42.0),
    (51.0, 45.0),
    (56.0, 51.0),
    (60.0, 56.0),
    (64.0, 60.0),
    (67.0, 64.0),
    (72.0, 67.0)
];

/// Built-in ladders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, clap::ValueEnum)]
#[strum(serialize_all = "snake_case")]
pub enum Preset {
    /// Chat messages, 50 per point, with bonus and individual multiplier
    Chat,
    /// Hours spent in voice calls, one point per hour
    Call
}

impl Preset {
    pub fn config(&self) -> LadderConfig {
        match self {
            Preset::Chat => ladder_config(&CHAT_GOALS, MESSAGES_PER_POINT, "messages", false),
            Preset::Call => ladder_config(&CALL_GOALS, CALL_HOURS_PER_POINT, "hours", true)
        }
    }
}

fn ladder_config(
    goals: &[(f64, f64); 13],
    units_per_point: f64,
    activity_unit: &str,
    single_level_promotion: bool
) -> LadderConfig {
    let ranks = RANK_NAMES
        .iter()
        .zip(goals.iter())
        .map(|(name, (promotion, maintenance))| RankConfig {
            name: name.to_string(),
            cycle_length: 1,
            promotion_threshold: *promotion,
            maintenance_threshold: *maintenance,
            jump_caps: None
        })
        .collect();

    LadderConfig {
        ranks,
        scoring: ScoringConfig {
            units_per_point,
            activity_unit: activity_unit.to_string(),
            modifiers: ModifierConfig::default()
        },
        settings: RuntimeSettings::default(),
        single_level_promotion
    }
}
