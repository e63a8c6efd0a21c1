use std::collections::{BTreeMap, HashMap};

use crate::model::{
    error::TrackerError,
    ladder::{RankLadder, RankStep}
};

/// Decides how far a promoted member climbs.
///
/// - `Uniform`: every rank advances `promotion_multiplier` levels, clamped at the ceiling.
/// - `SingleLevel`: every promotion advances exactly one level.
/// - `FastTrack`: only ranks with a cap table may advance more than one level.
///   For those, the target is `promotion_multiplier` levels up, bounded by the cap
///   rank registered for the largest multiplier not exceeding the achieved one.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JumpPolicy {
    #[default]
    Uniform,
    SingleLevel,
    FastTrack(HashMap<String, BTreeMap<u32, String>>)
}

impl JumpPolicy {
    pub fn validate(&self, ladder: &RankLadder) -> Result<(), TrackerError> {
        let JumpPolicy::FastTrack(tables) = self else {
            return Ok(());
        };

        for (rank, caps) in tables {
            let origin = ladder.index_of(rank)?;

            for (multiplier, cap) in caps {
                if *multiplier < 2 {
                    return Err(TrackerError::invalid_config(format!(
                        "jump cap for '{}' must be keyed by a multiplier of at least 2, got {}",
                        rank, multiplier
                    )));
                }

                if ladder.index_of(cap)? <= origin {
                    return Err(TrackerError::invalid_config(format!(
                        "jump cap '{}' must be above '{}'",
                        cap, rank
                    )));
                }
            }
        }

        Ok(())
    }

    /// Rank reached by a member of `rank` promoted with `promotion_multiplier`
    pub fn promotion_target<'a>(
        &self,
        ladder: &'a RankLadder,
        rank: &str,
        promotion_multiplier: u32
    ) -> Result<RankStep<'a>, TrackerError> {
        let multiplier = promotion_multiplier.max(1);

        match self {
            JumpPolicy::Uniform => ladder.next(rank, multiplier),
            JumpPolicy::SingleLevel => ladder.next(rank, 1),
            JumpPolicy::FastTrack(tables) => match tables.get(rank) {
                None => ladder.next(rank, 1),
                Some(caps) => {
                    let uncapped = ladder.next(rank, multiplier)?;
                    let cap = caps.range(..=multiplier).next_back().map(|(_, cap)| cap);

                    match cap {
                        Some(cap) => {
                            let origin = ladder.index_of(rank)?;
                            let cap_steps = (ladder.index_of(cap)? - origin) as u32;
                            ladder.next(rank, uncapped.steps.min(cap_steps))
                        }
                        None => Ok(uncapped)
                    }
                }
            }
        }
    }
}
