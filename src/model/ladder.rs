use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::error::TrackerError;

/// Goal configuration for a single rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDefinition {
    pub name: String,
    /// Number of weekly periods before the rank is evaluated
    pub cycle_length: u32,
    pub promotion_threshold: f64,
    pub maintenance_threshold: f64
}

impl RankDefinition {
    pub fn new(name: &str, cycle_length: u32, promotion_threshold: f64, maintenance_threshold: f64) -> RankDefinition {
        RankDefinition {
            name: name.to_string(),
            cycle_length,
            promotion_threshold,
            maintenance_threshold
        }
    }
}

/// A rank reached by moving up the ladder, with the number of levels
/// actually climbed after clamping at the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankStep<'a> {
    pub rank: &'a str,
    pub steps: u32
}

/// Ordered ranks, lowest first.
#[derive(Debug, Clone)]
pub struct RankLadder {
    ranks: Vec<RankDefinition>,
    positions: HashMap<String, usize>
}

impl RankLadder {
    pub fn new(ranks: Vec<RankDefinition>) -> Result<RankLadder, TrackerError> {
        if ranks.is_empty() {
            return Err(TrackerError::invalid_config("rank ladder must contain at least one rank"));
        }

        let mut positions = HashMap::with_capacity(ranks.len());
        for (i, rank) in ranks.iter().enumerate() {
            validate_rank(rank)?;

            if positions.insert(rank.name.clone(), i).is_some() {
                return Err(TrackerError::invalid_config(format!("duplicate rank '{}'", rank.name)));
            }
        }

        Ok(RankLadder { ranks, positions })
    }

    pub fn goal_for(&self, rank: &str) -> Result<&RankDefinition, TrackerError> {
        self.index_of(rank).map(|i| &self.ranks[i])
    }

    /// 0-based position of `rank`, the floor being 0
    pub fn index_of(&self, rank: &str) -> Result<usize, TrackerError> {
        self.positions
            .get(rank)
            .copied()
            .ok_or_else(|| TrackerError::UnknownRank(rank.to_string()))
    }

    pub fn contains(&self, rank: &str) -> bool {
        self.positions.contains_key(rank)
    }

    /// The rank `steps` levels above `rank`, clamped at the ceiling.
    pub fn next(&self, rank: &str, steps: u32) -> Result<RankStep<'_>, TrackerError> {
        let current = self.index_of(rank)?;
        let target = current.saturating_add(steps as usize).min(self.ranks.len() - 1);

        Ok(RankStep {
            rank: &self.ranks[target].name,
            steps: (target - current) as u32
        })
    }

    /// One level below `rank`; the floor maps onto itself.
    pub fn previous(&self, rank: &str) -> Result<&str, TrackerError> {
        let current = self.index_of(rank)?;

        Ok(&self.ranks[current.saturating_sub(1)].name)
    }

    pub fn floor(&self) -> &RankDefinition {
        &self.ranks[0]
    }

    pub fn ceiling(&self) -> &RankDefinition {
        &self.ranks[self.ranks.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&RankDefinition> {
        self.ranks.get(index)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankDefinition> {
        self.ranks.iter()
    }

    /// Caller-side recovery for unknown ranks: substitutes the floor rank and
    /// returns the warning that should be shown to the operator.
    pub fn resolve_or_floor(&self, rank: &str) -> (&RankDefinition, Option<String>) {
        match self.goal_for(rank) {
            Ok(definition) => (definition, None),
            Err(_) => {
                let floor = self.floor();
                let message = format!("Unknown rank '{}', falling back to '{}'", rank, floor.name);
                warn!("{}", message);

                (floor, Some(message))
            }
        }
    }
}

fn validate_rank(rank: &RankDefinition) -> Result<(), TrackerError> {
    if rank.name.trim().is_empty() {
        return Err(TrackerError::invalid_config("rank names must not be empty"));
    }

    if rank.cycle_length == 0 {
        return Err(TrackerError::invalid_config(format!(
            "rank '{}' must have a cycle length of at least 1 week",
            rank.name
        )));
    }

    if !rank.promotion_threshold.is_finite() || rank.promotion_threshold <= 0.0 {
        return Err(TrackerError::invalid_config(format!(
            "rank '{}' must have a positive promotion threshold",
            rank.name
        )));
    }

    if !rank.maintenance_threshold.is_finite()
        || rank.maintenance_threshold < 0.0
        || rank.maintenance_threshold > rank.promotion_threshold
    {
        return Err(TrackerError::invalid_config(format!(
            "rank '{}' must have a maintenance threshold between 0 and its promotion threshold",
            rank.name
        )));
    }

    Ok(())
}
