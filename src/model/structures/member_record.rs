use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::cycle_outcome::CycleOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Primary key, unique among tracked members
    pub display_name: String,
    /// Free-text id on the chat platform; not unique
    pub external_id: String,
    pub current_rank: String,
    /// Position within the open cycle, starting at 1
    pub cycle_week: u32,
    /// Sum of weekly scores in the open cycle
    pub accumulated_score: f64,
    pub last_weekly_score: f64,
    pub last_bonus: f64,
    pub last_multiplier: f64,
    /// Sum of every weekly score ever computed, never reset
    pub lifetime_score: f64,
    pub last_outcome: CycleOutcome,
    pub last_updated: DateTime<FixedOffset>
}
