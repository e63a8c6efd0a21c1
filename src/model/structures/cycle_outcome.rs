use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::outcome_kind::OutcomeKind;

/// Result of the most recent weekly evaluation of a member.
///
/// Labels render as `IN_PROGRESS(2/3)`, `PROMOTED`, `MAINTAINED` and `DEMOTED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CycleOutcome {
    InProgress { week: u32, of: u32 },
    Promoted,
    Maintained,
    Demoted
}

impl CycleOutcome {
    /// True when the cycle was closed by this outcome
    pub fn is_concluded(&self) -> bool {
        !matches!(self, CycleOutcome::InProgress { .. })
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            CycleOutcome::InProgress { .. } => OutcomeKind::InProgress,
            CycleOutcome::Promoted => OutcomeKind::Promoted,
            CycleOutcome::Maintained => OutcomeKind::Maintained,
            CycleOutcome::Demoted => OutcomeKind::Demoted
        }
    }

    /// Rebuilds an outcome from its stored parts. `week` and `of` are
    /// ignored unless the kind is [`OutcomeKind::InProgress`].
    pub fn from_parts(kind: OutcomeKind, week: u32, of: u32) -> Self {
        match kind {
            OutcomeKind::InProgress => CycleOutcome::InProgress {
                week: week.max(1),
                of: of.max(1)
            },
            OutcomeKind::Promoted => CycleOutcome::Promoted,
            OutcomeKind::Maintained => CycleOutcome::Maintained,
            OutcomeKind::Demoted => CycleOutcome::Demoted
        }
    }

    /// `(week, of)` for in-progress outcomes, `(0, 0)` otherwise
    pub fn progress(&self) -> (u32, u32) {
        match self {
            CycleOutcome::InProgress { week, of } => (*week, *of),
            _ => (0, 0)
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::InProgress { week, of } => write!(f, "IN_PROGRESS({}/{})", week, of),
            CycleOutcome::Promoted => write!(f, "PROMOTED"),
            CycleOutcome::Maintained => write!(f, "MAINTAINED"),
            CycleOutcome::Demoted => write!(f, "DEMOTED")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid outcome label '{0}'")]
pub struct ParseOutcomeError(pub String);

impl FromStr for CycleOutcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        match label {
            "PROMOTED" => return Ok(CycleOutcome::Promoted),
            "MAINTAINED" => return Ok(CycleOutcome::Maintained),
            "DEMOTED" => return Ok(CycleOutcome::Demoted),
            _ => {}
        }

        let inner = label
            .strip_prefix("IN_PROGRESS(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParseOutcomeError(s.to_string()))?;
        let (week, of) = inner.split_once('/').ok_or_else(|| ParseOutcomeError(s.to_string()))?;

        let week: u32 = week.trim().parse().map_err(|_| ParseOutcomeError(s.to_string()))?;
        let of: u32 = of.trim().parse().map_err(|_| ParseOutcomeError(s.to_string()))?;
        if week == 0 || of == 0 || week > of {
            return Err(ParseOutcomeError(s.to_string()));
        }

        Ok(CycleOutcome::InProgress { week, of })
    }
}

impl TryFrom<String> for CycleOutcome {
    type Error = ParseOutcomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CycleOutcome> for String {
    fn from(value: CycleOutcome) -> Self {
        value.to_string()
    }
}
