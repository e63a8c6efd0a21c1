use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::EnumIter;

/// Integer-coded outcome, as stored in member rows
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
#[repr(u8)]
pub enum OutcomeKind {
    #[default]
    InProgress = 0,
    Promoted = 1,
    Maintained = 2,
    Demoted = 3
}

impl TryFrom<i32> for OutcomeKind {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(OutcomeKind::InProgress),
            1 => Ok(OutcomeKind::Promoted),
            2 => Ok(OutcomeKind::Maintained),
            3 => Ok(OutcomeKind::Demoted),
            _ => Err(())
        }
    }
}
