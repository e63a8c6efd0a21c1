use chrono::{DateTime, FixedOffset};

use crate::model::{
    error::TrackerError,
    jump_policy::JumpPolicy,
    ladder::{RankDefinition, RankLadder},
    scoring::{compute_weekly_score, round_score, ScoringConfig},
    settings::RuntimeSettings,
    structures::{cycle_outcome::CycleOutcome, member_record::MemberRecord, weekly_submission::WeeklySubmission}
};

/// Classification of one accumulated score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: CycleOutcome,
    /// `floor(accumulated / promotion threshold)`, at least 1 when promoted, 0 otherwise
    pub promotion_multiplier: u32
}

/// Everything produced by processing one member's week
#[derive(Debug, Clone, PartialEq)]
pub struct WeekResult {
    /// The replacement record
    pub record: MemberRecord,
    pub weekly_score: f64,
    pub evaluation: Evaluation,
    /// Rank the week was evaluated under
    pub evaluated_rank: String,
    /// Levels climbed (positive) or dropped (negative)
    pub levels_moved: i32
}

/// Weekly score computation and end-of-cycle state machine.
///
/// ```text
/// IN_PROGRESS(k of n) --submit, k < n--> IN_PROGRESS(k + 1 of n)
/// IN_PROGRESS(n of n) --submit--> PROMOTED | MAINTAINED | DEMOTED --> IN_PROGRESS(1 of n')
/// ```
#[derive(Debug, Clone)]
pub struct CycleEvaluator {
    ladder: RankLadder,
    jump_policy: JumpPolicy,
    scoring: ScoringConfig,
    settings: RuntimeSettings
}

impl CycleEvaluator {
    pub fn new(
        ladder: RankLadder,
        jump_policy: JumpPolicy,
        scoring: ScoringConfig,
        settings: RuntimeSettings
    ) -> Result<CycleEvaluator, TrackerError> {
        jump_policy.validate(&ladder)?;
        scoring.validate()?;
        settings.validate()?;

        Ok(CycleEvaluator {
            ladder,
            jump_policy,
            scoring,
            settings
        })
    }

    pub fn ladder(&self) -> &RankLadder {
        &self.ladder
    }

    pub fn jump_policy(&self) -> &JumpPolicy {
        &self.jump_policy
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// Replaces the runtime settings, rejecting invalid combinations
    /// before anything is evaluated with them.
    pub fn with_settings(mut self, settings: RuntimeSettings) -> Result<CycleEvaluator, TrackerError> {
        settings.validate()?;
        self.settings = settings;

        Ok(self)
    }

    pub fn weekly_score(&self, submission: &WeeklySubmission) -> f64 {
        compute_weekly_score(submission, &self.scoring, &self.settings)
    }

    /// `(promotion, maintenance)` thresholds for `rank` after runtime boosting
    pub fn thresholds(&self, rank: &str) -> Result<(f64, f64), TrackerError> {
        let index = self.ladder.index_of(rank)?;
        let goal = self.ladder.goal_for(rank)?;
        let factor = self.settings.threshold_factor(index);

        Ok((goal.promotion_threshold * factor, goal.maintenance_threshold * factor))
    }

    /// Threshold decision for a concluded cycle
    pub fn classify(&self, rank: &str, accumulated_score: f64) -> Result<Evaluation, TrackerError> {
        let (promotion, maintenance) = self.thresholds(rank)?;

        let evaluation = if accumulated_score >= promotion {
            Evaluation {
                outcome: CycleOutcome::Promoted,
                promotion_multiplier: ((accumulated_score / promotion).floor() as u32).max(1)
            }
        } else if accumulated_score >= maintenance {
            Evaluation {
                outcome: CycleOutcome::Maintained,
                promotion_multiplier: 0
            }
        } else {
            Evaluation {
                outcome: CycleOutcome::Demoted,
                promotion_multiplier: 0
            }
        };

        Ok(evaluation)
    }

    /// Evaluates `rank` at `cycle_week` with the score accumulated so far.
    /// The cycle length is always read from the ladder for `rank`.
    pub fn evaluate(&self, rank: &str, cycle_week: u32, accumulated_score: f64) -> Result<Evaluation, TrackerError> {
        let cycle_length = self.ladder.goal_for(rank)?.cycle_length;
        let week = cycle_week.clamp(1, cycle_length);

        if week < cycle_length {
            return Ok(Evaluation {
                outcome: CycleOutcome::InProgress {
                    week,
                    of: cycle_length
                },
                promotion_multiplier: 0
            });
        }

        self.classify(rank, accumulated_score)
    }

    /// New rank after `evaluation`, with the signed number of levels moved
    pub fn transition<'a>(&'a self, rank: &'a str, evaluation: &Evaluation) -> Result<(&'a str, i32), TrackerError> {
        match evaluation.outcome {
            CycleOutcome::Promoted => {
                let step = self
                    .jump_policy
                    .promotion_target(&self.ladder, rank, evaluation.promotion_multiplier)?;

                Ok((step.rank, step.steps as i32))
            }
            CycleOutcome::Demoted => {
                let previous = self.ladder.previous(rank)?;
                let moved = self.ladder.index_of(previous)? as i32 - self.ladder.index_of(rank)? as i32;

                Ok((previous, moved))
            }
            CycleOutcome::Maintained | CycleOutcome::InProgress { .. } => {
                self.ladder.index_of(rank)?;
                Ok((rank, 0))
            }
        }
    }

    /// Processes one week for `member` and returns the replacement record.
    ///
    /// `working_rank` overrides the stored rank for this submission. Nothing is
    /// mutated: all validation happens before the new record is built.
    pub fn process_week(
        &self,
        member: &MemberRecord,
        submission: &WeeklySubmission,
        working_rank: Option<&str>,
        now: DateTime<FixedOffset>
    ) -> Result<WeekResult, TrackerError> {
        let rank = working_rank.unwrap_or(&member.current_rank);
        let goal = self.ladder.goal_for(rank)?;
        let week = member.cycle_week.clamp(1, goal.cycle_length);

        let weekly_score = self.weekly_score(submission);
        // A concluded cycle never carries score into the next one
        let carried = if member.last_outcome.is_concluded() {
            0.0
        } else {
            member.accumulated_score.max(0.0)
        };
        let accumulated = round_score(carried + weekly_score);

        let evaluation = self.evaluate(rank, week, accumulated)?;
        let (new_rank, levels_moved) = self.transition(rank, &evaluation)?;

        let (cycle_week, accumulated_score) = if evaluation.outcome.is_concluded() {
            (1, 0.0)
        } else {
            ((week + 1).min(goal.cycle_length), accumulated)
        };

        let record = MemberRecord {
            display_name: member.display_name.clone(),
            external_id: member.external_id.clone(),
            current_rank: new_rank.to_string(),
            cycle_week,
            accumulated_score,
            last_weekly_score: weekly_score,
            last_bonus: round_score(submission.bonus()),
            last_multiplier: round_score(submission.multiplier()),
            lifetime_score: round_score(member.lifetime_score + weekly_score),
            last_outcome: evaluation.outcome,
            last_updated: now
        };

        Ok(WeekResult {
            record,
            weekly_score,
            evaluation,
            evaluated_rank: rank.to_string(),
            levels_moved
        })
    }

    /// Cycle length of `rank`
    pub fn cycle_length(&self, rank: &str) -> Result<u32, TrackerError> {
        self.ladder.goal_for(rank).map(|goal| goal.cycle_length)
    }

    pub fn goal_for(&self, rank: &str) -> Result<&RankDefinition, TrackerError> {
        self.ladder.goal_for(rank)
    }
}
