use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Kind of community challenge a member took part in during the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChallengeType {
    Daily,
    Weekly,
    Event
}
