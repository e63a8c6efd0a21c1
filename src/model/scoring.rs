use serde::{Deserialize, Serialize};

use crate::model::{
    constants::{
        DAILY_CHALLENGE_MULTIPLIER, EVENT_CHALLENGE_MULTIPLIER, MESSAGES_PER_POINT, RUSH_HOUR_MULTIPLIER,
        SCORE_DECIMALS, WEEKEND_MULTIPLIER, WEEKLY_CHALLENGE_MULTIPLIER
    },
    error::TrackerError,
    settings::RuntimeSettings,
    structures::{
        challenge_type::ChallengeType,
        weekly_submission::{ActivityModifiers, WeeklySubmission}
    }
};

/// Multipliers applied for each activity modifier flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    pub rush_hour: f64,
    pub weekend: f64,
    pub daily_challenge: f64,
    pub weekly_challenge: f64,
    pub event_challenge: f64
}

impl Default for ModifierConfig {
    fn default() -> Self {
        ModifierConfig {
            rush_hour: RUSH_HOUR_MULTIPLIER,
            weekend: WEEKEND_MULTIPLIER,
            daily_challenge: DAILY_CHALLENGE_MULTIPLIER,
            weekly_challenge: WEEKLY_CHALLENGE_MULTIPLIER,
            event_challenge: EVENT_CHALLENGE_MULTIPLIER
        }
    }
}

impl ModifierConfig {
    pub fn challenge(&self, challenge: ChallengeType) -> f64 {
        match challenge {
            ChallengeType::Daily => self.daily_challenge,
            ChallengeType::Weekly => self.weekly_challenge,
            ChallengeType::Event => self.event_challenge
        }
    }

    /// Product of every multiplier enabled by `modifiers`
    pub fn factor(&self, modifiers: &ActivityModifiers) -> f64 {
        let mut factor = 1.0;

        if modifiers.rush_hour {
            factor *= self.rush_hour;
        }
        if modifiers.weekend {
            factor *= self.weekend;
        }
        if let Some(challenge) = modifiers.challenge {
            factor *= self.challenge(challenge);
        }

        factor
    }

    fn validate(&self) -> Result<(), TrackerError> {
        let values = [
            ("rush_hour", self.rush_hour),
            ("weekend", self.weekend),
            ("daily_challenge", self.daily_challenge),
            ("weekly_challenge", self.weekly_challenge),
            ("event_challenge", self.event_challenge)
        ];

        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrackerError::invalid_config(format!(
                    "modifier '{}' must be positive, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// How raw activity is turned into points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Raw activity units worth one point (e.g. 50 messages)
    pub units_per_point: f64,
    /// Display name of the raw activity unit
    pub activity_unit: String,
    pub modifiers: ModifierConfig
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            units_per_point: MESSAGES_PER_POINT,
            activity_unit: "messages".to_string(),
            modifiers: ModifierConfig::default()
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.units_per_point.is_finite() || self.units_per_point <= 0.0 {
            return Err(TrackerError::invalid_config(format!(
                "units per point must be positive, got {}",
                self.units_per_point
            )));
        }

        self.modifiers.validate()
    }

    pub fn activity_points(&self, activity: f64) -> f64 {
        activity / self.units_per_point
    }
}

/// Weekly score for a submission:
/// `(activity points + bonus) * individual multiplier * modifiers * global multiplier`,
/// rounded to one decimal place. Never negative.
pub fn compute_weekly_score(submission: &WeeklySubmission, scoring: &ScoringConfig, settings: &RuntimeSettings) -> f64 {
    let base = scoring.activity_points(submission.activity()) + submission.bonus();
    let score = base
        * submission.multiplier()
        * scoring.modifiers.factor(submission.modifiers())
        * settings.global_multiplier;

    round_score(score.max(0.0))
}

/// Rounds half away from zero to the stored score precision
pub fn round_score(value: f64) -> f64 {
    let scale = 10f64.powi(SCORE_DECIMALS);

    (value * scale).round() / scale
}
