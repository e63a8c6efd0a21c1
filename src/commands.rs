//! Operator commands: one load of the member table, one mutation, one save.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    args::Command,
    database::{error::PersistenceError, load_or_empty, MemberStore},
    model::{
        error::TrackerError,
        evaluator::CycleEvaluator,
        member_tracker::{goal_table, MemberTracker, WeekReport},
        structures::{
            member_record::MemberRecord,
            weekly_submission::{ActivityModifiers, WeeklySubmission}
        }
    }
};

/// A processed week together with the warning shown when the member's
/// stored rank had to be replaced by the floor rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedWeek {
    pub report: WeekReport,
    pub fallback_warning: Option<String>
}

/// Member table loaded from a store, plus the changes not yet saved back.
///
/// A failed save leaves the modified table in place so [`Session::save`]
/// can be retried.
pub struct Session<'a, S: MemberStore> {
    store: &'a S,
    evaluator: &'a CycleEvaluator,
    tracker: MemberTracker,
    unsaved: bool
}

impl<'a, S: MemberStore> Session<'a, S> {
    /// Loads the member table, failing if the store cannot be read.
    /// Required for anything that saves afterwards.
    pub async fn open(store: &'a S, evaluator: &'a CycleEvaluator) -> Result<Session<'a, S>, TrackerError> {
        let members = store.load_members().await?;

        Ok(Session::with_members(store, evaluator, members))
    }

    /// Loads the member table, treating a failed read as an empty table
    pub async fn open_read_only(store: &'a S, evaluator: &'a CycleEvaluator) -> Session<'a, S> {
        let members = load_or_empty(store).await;

        Session::with_members(store, evaluator, members)
    }

    fn with_members(store: &'a S, evaluator: &'a CycleEvaluator, members: Vec<MemberRecord>) -> Session<'a, S> {
        Session {
            store,
            evaluator,
            tracker: MemberTracker::from_records(members),
            unsaved: false
        }
    }

    pub fn tracker(&self) -> &MemberTracker {
        &self.tracker
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Writes the whole member table back to the store
    pub async fn save(&mut self) -> Result<(), TrackerError> {
        let records = self.tracker.records();

        match self.store.save_members(&records).await {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(e) => {
                error!("Failed to save {} members, changes kept for retry: {}", records.len(), e);
                Err(e.into())
            }
        }
    }

    pub async fn add(
        &mut self,
        name: &str,
        rank: Option<&str>,
        external_id: Option<&str>,
        now: DateTime<FixedOffset>
    ) -> Result<MemberRecord, TrackerError> {
        let record = self
            .tracker
            .add_member(self.evaluator, name, rank, external_id, now)?
            .clone();
        self.unsaved = true;

        self.save().await?;
        Ok(record)
    }

    pub async fn remove(&mut self, name: &str) -> Result<MemberRecord, TrackerError> {
        let removed = self.tracker.remove_member(name)?;
        self.unsaved = true;

        self.save().await?;
        Ok(removed)
    }

    pub async fn reset(&mut self) -> Result<(), TrackerError> {
        self.tracker.reset();
        self.unsaved = true;

        self.save().await
    }

    /// Processes one week for `name`. Without an explicit `working_rank`, a
    /// stored rank missing from the ladder is evaluated as the floor rank.
    pub async fn process(
        &mut self,
        name: &str,
        submission: &WeeklySubmission,
        working_rank: Option<&str>,
        now: DateTime<FixedOffset>
    ) -> Result<ProcessedWeek, TrackerError> {
        let member = self
            .tracker
            .get(name)
            .ok_or_else(|| TrackerError::UnknownMember(name.to_string()))?;

        let (rank, fallback_warning) = match working_rank {
            Some(rank) => (rank.to_string(), None),
            None => {
                let (definition, warning) = self.evaluator.ladder().resolve_or_floor(&member.current_rank);
                (definition.name.clone(), warning)
            }
        };

        let report = self
            .tracker
            .process_week(self.evaluator, name, submission, Some(&rank), now)?;
        self.unsaved = true;

        self.save().await?;
        Ok(ProcessedWeek {
            report,
            fallback_warning
        })
    }
}

/// Runs `command` against `store` and renders the operator-facing output
pub async fn execute<S: MemberStore>(
    store: &S,
    evaluator: &CycleEvaluator,
    command: &Command,
    now: DateTime<FixedOffset>
) -> Result<String, TrackerError> {
    match command {
        Command::Add {
            name,
            rank,
            external_id
        } => {
            let mut session = Session::open(store, evaluator).await?;
            let record = session.add(name, rank.as_deref(), external_id.as_deref(), now).await?;

            Ok(format!("Added '{}' at rank '{}'", record.display_name, record.current_rank))
        }
        Command::Remove { name } => {
            let mut session = Session::open(store, evaluator).await?;
            let removed = session.remove(name).await?;

            Ok(format!("Removed '{}'", removed.display_name))
        }
        Command::Reset { yes } => {
            if !yes {
                warn!("Reset requested without confirmation");
                return Ok("Nothing removed, pass --yes to remove every member".to_string());
            }

            let mut session = Session::open(store, evaluator).await?;
            let count = session.tracker().len();
            session.reset().await?;

            Ok(format!("Removed {} members", count))
        }
        Command::Process {
            name,
            activity,
            bonus,
            multiplier,
            rank,
            rush_hour,
            weekend,
            challenge
        } => {
            let mut session = Session::open(store, evaluator).await?;
            let multiplier = match multiplier {
                Some(multiplier) => *multiplier,
                None => session
                    .tracker()
                    .get(name)
                    .map(|m| m.last_multiplier)
                    .ok_or_else(|| TrackerError::UnknownMember(name.to_string()))?
            };

            let submission = WeeklySubmission::new(*activity, *bonus, multiplier).with_modifiers(ActivityModifiers {
                rush_hour: *rush_hour,
                weekend: *weekend,
                challenge: *challenge
            });

            let processed = session.process(name, &submission, rank.as_deref(), now).await?;
            Ok(render_processed(&processed))
        }
        Command::Leaderboard { json } => {
            let session = Session::open_read_only(store, evaluator).await;
            let leaderboard = session.tracker().leaderboard(evaluator);

            if *json {
                return serde_json::to_string_pretty(&leaderboard)
                    .map_err(|e| TrackerError::from(PersistenceError::from(e)));
            }

            Ok(render_leaderboard(&leaderboard))
        }
        Command::Goals => Ok(render_goals(evaluator)),
        Command::Summary => {
            let session = Session::open_read_only(store, evaluator).await;
            let summary = session.tracker().summary();
            info!("Summary over {} members", summary.members);

            Ok(format!(
                "Members: {}\nTotal weekly points: {:.1}\nTotal bonus: {:.1}",
                summary.members, summary.total_weekly_score, summary.total_bonus
            ))
        }
    }
}

fn render_processed(processed: &ProcessedWeek) -> String {
    let report = &processed.report;
    let mut out = String::new();

    if let Some(warning) = &processed.fallback_warning {
        let _ = writeln!(out, "warning: {}", warning);
    }

    let _ = write!(
        out,
        "{}: {} ({} -> {}), weekly {:.1}, accumulated {:.1}",
        report.display_name,
        report.outcome,
        report.previous_rank,
        report.new_rank,
        report.weekly_score,
        report.accumulated_score
    );

    if report.levels_moved > 1 {
        let _ = write!(out, ", x{} jump", report.levels_moved);
    }

    out
}

fn render_leaderboard(members: &[&MemberRecord]) -> String {
    if members.is_empty() {
        return "No members".to_string();
    }

    let mut out = String::new();
    for (i, member) in members.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {:<10} lifetime {:>8.1}  last {:>6.1}  {}",
            i + 1,
            member.display_name,
            member.current_rank,
            member.lifetime_score,
            member.last_weekly_score,
            member.last_outcome
        );
    }

    out.trim_end().to_string()
}

fn render_goals(evaluator: &CycleEvaluator) -> String {
    let unit = &evaluator.scoring().activity_unit;
    let mut out = String::new();

    for row in goal_table(evaluator) {
        let _ = writeln!(
            out,
            "{:>2}. {:<10} cycle {}w  promote {:>7.1}  maintain {:>7.1}  {:.0} {} ({:.1}/day)",
            row.position,
            row.rank,
            row.cycle_length,
            row.promotion_threshold,
            row.maintenance_threshold,
            row.promotion_activity,
            unit,
            row.promotion_activity_per_day
        );
    }

    out.trim_end().to_string()
}
