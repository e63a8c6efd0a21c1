use crate::model::{
    constants::{DEFAULT_INDIVIDUAL_MULTIPLIER, UNKNOWN_EXTERNAL_ID},
    evaluator::CycleEvaluator,
    jump_policy::JumpPolicy,
    ladder::{RankDefinition, RankLadder},
    scoring::ScoringConfig,
    settings::RuntimeSettings,
    structures::{
        cycle_outcome::CycleOutcome,
        member_record::MemberRecord,
        weekly_submission::{ActivityModifiers, WeeklySubmission}
    }
};
use chrono::{DateTime, FixedOffset};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};

/// A fixed point in time so processed records compare equal
pub fn fixed_time() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-01-07T20:00:00-03:00").unwrap()
}

/// Ladder with one-week cycles and thresholds growing by 10 per rank
pub fn generate_ladder(names: &[&str]) -> RankLadder {
    let ranks = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let promotion = 10.0 * (i + 1) as f64;
            RankDefinition::new(name, 1, promotion, promotion / 2.0)
        })
        .collect();

    RankLadder::new(ranks).unwrap()
}

/// `A` (1 week, 20/13), `B` (3 weeks, 30/20), `C` (50/40), `D` (80/60), `E` (120/90)
pub fn scenario_ladder() -> RankLadder {
    RankLadder::new(vec![
        RankDefinition::new("A", 1, 20.0, 13.0),
        RankDefinition::new("B", 3, 30.0, 20.0),
        RankDefinition::new("C", 1, 50.0, 40.0),
        RankDefinition::new("D", 1, 80.0, 60.0),
        RankDefinition::new("E", 1, 120.0, 90.0)
    ])
    .unwrap()
}

/// Fast-track table letting `A` jump at most to `B` on a 2x and `C` on a 3x goal
pub fn scenario_fast_track() -> JumpPolicy {
    let mut caps = BTreeMap::new();
    caps.insert(2, "B".to_string());
    caps.insert(3, "C".to_string());

    let mut tables = HashMap::new();
    tables.insert("A".to_string(), caps);

    JumpPolicy::FastTrack(tables)
}

pub fn scenario_evaluator(jump_policy: JumpPolicy) -> CycleEvaluator {
    CycleEvaluator::new(
        scenario_ladder(),
        jump_policy,
        ScoringConfig::default(),
        RuntimeSettings::default()
    )
    .unwrap()
}

/// Fresh member at week 1 with no score
pub fn generate_member(name: &str, rank: &str) -> MemberRecord {
    MemberRecord {
        display_name: name.to_string(),
        external_id: UNKNOWN_EXTERNAL_ID.to_string(),
        current_rank: rank.to_string(),
        cycle_week: 1,
        accumulated_score: 0.0,
        last_weekly_score: 0.0,
        last_bonus: 0.0,
        last_multiplier: DEFAULT_INDIVIDUAL_MULTIPLIER,
        lifetime_score: 0.0,
        last_outcome: CycleOutcome::InProgress { week: 1, of: 1 },
        last_updated: fixed_time()
    }
}

/// `n` members with seeded, reproducible ranks and scores drawn from `ladder`
pub fn generate_members(n: usize, ladder: &RankLadder) -> Vec<MemberRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    (0..n)
        .map(|i| {
            let rank = &ladder.get(rng.random_range(0..ladder.len())).unwrap().name;
            let mut member = generate_member(&format!("member-{}", i), rank);
            member.external_id = format!("{}", 100_000 + i);
            member.lifetime_score = (rng.random_range(0.0..2000.0f64) * 10.0).round() / 10.0;
            member.last_weekly_score = (rng.random_range(0.0..200.0f64) * 10.0).round() / 10.0;
            member
        })
        .collect()
}

/// Seeded submissions, including occasional out-of-range raw values
pub fn generate_submissions(n: usize, seed: u64) -> Vec<WeeklySubmission> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..n)
        .map(|_| {
            let modifiers = ActivityModifiers {
                rush_hour: rng.random_bool(0.2),
                weekend: rng.random_bool(0.3),
                challenge: None
            };

            WeeklySubmission::new(
                rng.random_range(-100.0..5000.0),
                rng.random_range(-5.0..20.0),
                rng.random_range(0.0..3.0)
            )
            .with_modifiers(modifiers)
        })
        .collect()
}
