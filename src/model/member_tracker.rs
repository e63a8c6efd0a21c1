use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::model::{
    constants::{DAYS_PER_WEEK, DEFAULT_INDIVIDUAL_MULTIPLIER, UNKNOWN_EXTERNAL_ID},
    error::TrackerError,
    evaluator::{CycleEvaluator, WeekResult},
    scoring::round_score,
    structures::{cycle_outcome::CycleOutcome, member_record::MemberRecord, weekly_submission::WeeklySubmission}
};

/// Summary of one processed week, for the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekReport {
    pub display_name: String,
    pub previous_rank: String,
    pub new_rank: String,
    pub outcome: CycleOutcome,
    pub weekly_score: f64,
    pub accumulated_score: f64,
    pub promotion_multiplier: u32,
    pub levels_moved: i32
}

impl WeekReport {
    fn from_result(previous_rank: &str, result: &WeekResult) -> WeekReport {
        WeekReport {
            display_name: result.record.display_name.clone(),
            previous_rank: previous_rank.to_string(),
            new_rank: result.record.current_rank.clone(),
            outcome: result.evaluation.outcome,
            weekly_score: result.weekly_score,
            accumulated_score: result.record.accumulated_score,
            promotion_multiplier: result.evaluation.promotion_multiplier,
            levels_moved: result.levels_moved
        }
    }
}

/// Aggregate figures over the whole member set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSummary {
    pub members: usize,
    pub total_weekly_score: f64,
    pub total_bonus: f64
}

/// One row of the goal table shown to operators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRow {
    /// 1-based position on the ladder
    pub position: usize,
    pub rank: String,
    pub cycle_length: u32,
    pub promotion_threshold: f64,
    pub maintenance_threshold: f64,
    /// Raw activity needed to reach the promotion threshold
    pub promotion_activity: f64,
    /// Raw activity per day needed to reach the promotion threshold
    pub promotion_activity_per_day: f64
}

/// Goal table for every rank, with runtime threshold boosting applied
pub fn goal_table(evaluator: &CycleEvaluator) -> Vec<GoalRow> {
    let units_per_point = evaluator.scoring().units_per_point;

    evaluator
        .ladder()
        .iter()
        .enumerate()
        .map(|(i, rank)| {
            let factor = evaluator.settings().threshold_factor(i);
            let promotion = rank.promotion_threshold * factor;
            let activity = promotion * units_per_point;

            GoalRow {
                position: i + 1,
                rank: rank.name.clone(),
                cycle_length: rank.cycle_length,
                promotion_threshold: promotion,
                maintenance_threshold: rank.maintenance_threshold * factor,
                promotion_activity: activity,
                promotion_activity_per_day: activity / (DAYS_PER_WEEK * rank.cycle_length as f64)
            }
        })
        .collect()
}

/// The in-memory member set, keyed by display name in load order.
///
/// Every mutation replaces whole records; the caller persists the result
/// through a [`crate::database::MemberStore`].
#[derive(Debug, Clone, Default)]
pub struct MemberTracker {
    members: IndexMap<String, MemberRecord>
}

impl MemberTracker {
    pub fn new() -> MemberTracker {
        MemberTracker {
            members: IndexMap::new()
        }
    }

    /// Builds a tracker from loaded rows. Later duplicates of a display
    /// name replace earlier ones.
    pub fn from_records(records: Vec<MemberRecord>) -> MemberTracker {
        let mut members = IndexMap::with_capacity(records.len());

        for record in records {
            if let Some(previous) = members.insert(record.display_name.clone(), record) {
                warn!("Duplicate member row for '{}', keeping the last one", previous.display_name);
            }
        }

        MemberTracker { members }
    }

    pub fn records(&self) -> Vec<MemberRecord> {
        self.members.values().cloned().collect()
    }

    pub fn get(&self, display_name: &str) -> Option<&MemberRecord> {
        self.members.get(display_name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Display names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        self.members.keys().map(|k| k.as_str()).sorted().collect()
    }

    /// Registers a new member at week 1 of `rank` (the floor rank when omitted).
    pub fn add_member(
        &mut self,
        evaluator: &CycleEvaluator,
        display_name: &str,
        rank: Option<&str>,
        external_id: Option<&str>,
        now: DateTime<FixedOffset>
    ) -> Result<&MemberRecord, TrackerError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(TrackerError::EmptyMemberName);
        }

        if self.members.contains_key(display_name) {
            return Err(TrackerError::DuplicateMember(display_name.to_string()));
        }

        let rank = match rank {
            Some(rank) => evaluator.goal_for(rank)?,
            None => evaluator.ladder().floor()
        };
        let external_id = external_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(UNKNOWN_EXTERNAL_ID);

        let record = MemberRecord {
            display_name: display_name.to_string(),
            external_id: external_id.to_string(),
            current_rank: rank.name.clone(),
            cycle_week: 1,
            accumulated_score: 0.0,
            last_weekly_score: 0.0,
            last_bonus: 0.0,
            last_multiplier: DEFAULT_INDIVIDUAL_MULTIPLIER,
            lifetime_score: 0.0,
            last_outcome: CycleOutcome::InProgress {
                week: 1,
                of: rank.cycle_length
            },
            last_updated: now
        };

        info!("Adding member '{}' at rank '{}'", record.display_name, record.current_rank);

        let entry = self.members.entry(display_name.to_string()).or_insert(record);
        Ok(&*entry)
    }

    pub fn remove_member(&mut self, display_name: &str) -> Result<MemberRecord, TrackerError> {
        let removed = self
            .members
            .shift_remove(display_name)
            .ok_or_else(|| TrackerError::UnknownMember(display_name.to_string()))?;

        info!("Removed member '{}'", display_name);
        Ok(removed)
    }

    /// Drops every member
    pub fn reset(&mut self) {
        info!("Resetting member table ({} members)", self.members.len());
        self.members.clear();
    }

    /// Processes one week for `display_name` and replaces its record.
    ///
    /// The record is only replaced once evaluation has fully succeeded.
    pub fn process_week(
        &mut self,
        evaluator: &CycleEvaluator,
        display_name: &str,
        submission: &WeeklySubmission,
        working_rank: Option<&str>,
        now: DateTime<FixedOffset>
    ) -> Result<WeekReport, TrackerError> {
        let member = self
            .members
            .get(display_name)
            .ok_or_else(|| TrackerError::UnknownMember(display_name.to_string()))?;

        let result = evaluator.process_week(member, submission, working_rank, now)?;
        let report = WeekReport::from_result(&member.current_rank, &result);

        debug!(
            "Processed '{}': weekly {} accumulated {} -> {}",
            display_name, result.weekly_score, result.record.accumulated_score, result.evaluation.outcome
        );
        info!(
            "Member '{}' {} ({} -> {})",
            display_name, report.outcome, report.previous_rank, report.new_rank
        );

        self.members.insert(display_name.to_string(), result.record);
        Ok(report)
    }

    /// Members by lifetime score, highest first; ties broken by rank, highest first.
    /// Members whose rank is no longer on the ladder sort below every known rank.
    pub fn leaderboard(&self, evaluator: &CycleEvaluator) -> Vec<&MemberRecord> {
        let ladder = evaluator.ladder();

        self.members
            .values()
            .sorted_by(|a, b| {
                b.lifetime_score
                    .total_cmp(&a.lifetime_score)
                    .then_with(|| {
                        let a_rank = ladder.index_of(&a.current_rank).ok();
                        let b_rank = ladder.index_of(&b.current_rank).ok();
                        b_rank.cmp(&a_rank)
                    })
            })
            .collect()
    }

    pub fn summary(&self) -> TrackerSummary {
        TrackerSummary {
            members: self.members.len(),
            total_weekly_score: round_score(self.members.values().map(|m| m.last_weekly_score).sum()),
            total_bonus: round_score(self.members.values().map(|m| m.last_bonus).sum())
        }
    }
}
