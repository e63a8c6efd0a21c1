use crate::{
    database::error::PersistenceError,
    model::{
        constants::{DEFAULT_INDIVIDUAL_MULTIPLIER, UNKNOWN_EXTERNAL_ID},
        structures::{cycle_outcome::CycleOutcome, member_record::MemberRecord, outcome_kind::OutcomeKind}
    }
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Flat, storage-facing form of a [`MemberRecord`]: one row per member in
/// the members table or file. Missing numeric columns default to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRow {
    pub display_name: String,
    #[serde(default = "unknown_external_id")]
    pub external_id: String,
    pub rank: String,
    #[serde(default = "first_week")]
    pub cycle_week: i32,
    #[serde(default)]
    pub accumulated_score: f64,
    #[serde(default)]
    pub weekly_score: f64,
    #[serde(default)]
    pub bonus: f64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub lifetime_score: f64,
    #[serde(default)]
    pub outcome: OutcomeKind,
    /// Week and cycle length, only meaningful while the outcome is in progress
    #[serde(default = "first_week")]
    pub outcome_week: i32,
    #[serde(default = "first_week")]
    pub outcome_total: i32,
    #[serde(default)]
    pub last_updated: DateTime<FixedOffset>
}

fn unknown_external_id() -> String {
    UNKNOWN_EXTERNAL_ID.to_string()
}

fn first_week() -> i32 {
    1
}

fn default_multiplier() -> f64 {
    DEFAULT_INDIVIDUAL_MULTIPLIER
}

impl From<&MemberRecord> for MemberRow {
    fn from(record: &MemberRecord) -> Self {
        let (outcome_week, outcome_total) = record.last_outcome.progress();

        MemberRow {
            display_name: record.display_name.clone(),
            external_id: record.external_id.clone(),
            rank: record.current_rank.clone(),
            cycle_week: record.cycle_week as i32,
            accumulated_score: record.accumulated_score,
            weekly_score: record.last_weekly_score,
            bonus: record.last_bonus,
            multiplier: record.last_multiplier,
            lifetime_score: record.lifetime_score,
            outcome: record.last_outcome.kind(),
            outcome_week: outcome_week as i32,
            outcome_total: outcome_total as i32,
            last_updated: record.last_updated
        }
    }
}

impl TryFrom<MemberRow> for MemberRecord {
    type Error = PersistenceError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| PersistenceError::InvalidRow {
            name: row.display_name.clone(),
            reason: reason.to_string()
        };

        if row.display_name.trim().is_empty() {
            return Err(invalid("empty display name"));
        }
        if row.cycle_week < 1 {
            return Err(invalid("cycle week must be at least 1"));
        }

        let last_outcome = CycleOutcome::from_parts(
            row.outcome,
            row.outcome_week.max(1) as u32,
            row.outcome_total.max(1) as u32
        );

        Ok(MemberRecord {
            display_name: row.display_name,
            external_id: row.external_id,
            current_rank: row.rank,
            cycle_week: row.cycle_week as u32,
            accumulated_score: row.accumulated_score.max(0.0),
            last_weekly_score: row.weekly_score,
            last_bonus: row.bonus,
            last_multiplier: row.multiplier,
            lifetime_score: row.lifetime_score,
            last_outcome,
            last_updated: row.last_updated
        })
    }
}
