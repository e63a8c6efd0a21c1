use serde::{Deserialize, Serialize};

use super::challenge_type::ChallengeType;
use crate::model::constants::{DEFAULT_INDIVIDUAL_MULTIPLIER, MIN_INDIVIDUAL_MULTIPLIER};

/// Flags describing when and how the week's activity happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityModifiers {
    pub rush_hour: bool,
    pub weekend: bool,
    pub challenge: Option<ChallengeType>
}

/// Raw weekly inputs for one member.
///
/// Values are clamped on construction, so scoring can assume
/// `activity >= 0`, `bonus >= 0` and `multiplier > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSubmission")]
pub struct WeeklySubmission {
    /// Raw activity measure (messages sent, hours in call, ...)
    activity: f64,
    bonus: f64,
    multiplier: f64,
    modifiers: ActivityModifiers
}

impl WeeklySubmission {
    pub fn new(activity: f64, bonus: f64, multiplier: f64) -> WeeklySubmission {
        WeeklySubmission {
            activity: non_negative(activity),
            bonus: non_negative(bonus),
            multiplier: if multiplier.is_finite() && multiplier >= MIN_INDIVIDUAL_MULTIPLIER {
                multiplier
            } else {
                MIN_INDIVIDUAL_MULTIPLIER
            },
            modifiers: ActivityModifiers::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: ActivityModifiers) -> WeeklySubmission {
        self.modifiers = modifiers;
        self
    }

    pub fn activity(&self) -> f64 {
        self.activity
    }

    pub fn bonus(&self) -> f64 {
        self.bonus
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn modifiers(&self) -> &ActivityModifiers {
        &self.modifiers
    }
}

/// Unchecked wire form, clamped through [`WeeklySubmission::new`]
#[derive(Deserialize)]
struct RawSubmission {
    activity: f64,
    #[serde(default)]
    bonus: f64,
    #[serde(default = "default_multiplier")]
    multiplier: f64,
    #[serde(default)]
    modifiers: ActivityModifiers
}

fn default_multiplier() -> f64 {
    DEFAULT_INDIVIDUAL_MULTIPLIER
}

impl From<RawSubmission> for WeeklySubmission {
    fn from(raw: RawSubmission) -> Self {
        WeeklySubmission::new(raw.activity, raw.bonus, raw.multiplier).with_modifiers(raw.modifiers)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
