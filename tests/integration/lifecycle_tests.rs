use rank_tracker::{
    args::Command,
    commands::execute,
    database::{file_store::JsonFileStore, memory_store::MemoryStore, MemberStore},
    model::{
        config::LadderConfig,
        error::TrackerError,
        presets::Preset,
        structures::{challenge_type::ChallengeType, cycle_outcome::CycleOutcome}
    },
    utils::test_utils::fixed_time
};
use serial_test::serial;

use crate::common::init_test_env;

fn add(name: &str) -> Command {
    Command::Add {
        name: name.to_string(),
        rank: None,
        external_id: None
    }
}

fn process(name: &str, activity: f64, bonus: f64) -> Command {
    Command::Process {
        name: name.to_string(),
        activity,
        bonus,
        multiplier: None,
        rank: None,
        rush_hour: false,
        weekend: false,
        challenge: None
    }
}

#[tokio::test]
#[serial]
async fn test_chat_member_climbs_and_falls() {
    init_test_env();
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("members.json"));
    let evaluator = Preset::Chat.config().build().unwrap();

    execute(&store, &evaluator, &add("alice"), fixed_time()).await.unwrap();
    assert_eq!(store.load_members().await.unwrap()[0].current_rank, "f*ck");

    // 800 messages = 16 points against a goal of 15
    let output = execute(&store, &evaluator, &process("alice", 800.0, 0.0), fixed_time())
        .await
        .unwrap();
    assert!(output.contains("PROMOTED"));
    assert_eq!(store.load_members().await.unwrap()[0].current_rank, "100%");

    // 20 points plus 5 bonus against a goal of 20
    execute(&store, &evaluator, &process("alice", 1000.0, 5.0), fixed_time())
        .await
        .unwrap();
    let member = store.load_members().await.unwrap().remove(0);
    assert_eq!(member.current_rank, "woo");
    assert_eq!(member.last_bonus, 5.0);

    execute(&store, &evaluator, &process("alice", 0.0, 0.0), fixed_time())
        .await
        .unwrap();
    let member = store.load_members().await.unwrap().remove(0);
    assert_eq!(member.current_rank, "100%");
    assert_eq!(member.last_outcome, CycleOutcome::Demoted);
    assert_eq!(member.lifetime_score, 41.0);
    assert_eq!(member.accumulated_score, 0.0);
}

#[tokio::test]
#[serial]
async fn test_call_member_climbs_one_rank_at_a_time() {
    init_test_env();
    let store = MemoryStore::new();
    let evaluator = Preset::Call.config().build().unwrap();

    execute(&store, &evaluator, &add("bob"), fixed_time()).await.unwrap();
    // 45 hours is three times the goal of 14, still a single promotion
    execute(&store, &evaluator, &process("bob", 45.0, 0.0), fixed_time())
        .await
        .unwrap();

    let member = store.load_members().await.unwrap().remove(0);
    assert_eq!(member.current_rank, "100%");
    assert_eq!(member.last_outcome, CycleOutcome::Promoted);

    execute(&store, &evaluator, &process("bob", 45.0, 0.0), fixed_time())
        .await
        .unwrap();
    assert_eq!(store.load_members().await.unwrap()[0].current_rank, "woo");
}

#[tokio::test]
#[serial]
async fn test_doubled_thresholds_apply_to_lowest_ranks() {
    init_test_env();
    let store = MemoryStore::new();
    let mut config = Preset::Chat.config();
    config.settings.threshold_doubled = true;
    let evaluator = config.build().unwrap();

    execute(&store, &evaluator, &add("carol"), fixed_time()).await.unwrap();
    execute(&store, &evaluator, &process("carol", 800.0, 0.0), fixed_time())
        .await
        .unwrap();

    let member = store.load_members().await.unwrap().remove(0);
    assert_eq!(member.current_rank, "f*ck");
    assert_eq!(member.last_outcome, CycleOutcome::Demoted);
}

#[tokio::test]
#[serial]
async fn test_conflicting_threshold_boosts_rejected() {
    init_test_env();
    let mut config = Preset::Chat.config();
    config.settings.threshold_doubled = true;
    config.settings.threshold_tripled = true;

    assert!(matches!(config.build(), Err(TrackerError::InvalidConfiguration(_))));
}

#[tokio::test]
#[serial]
async fn test_configured_multi_week_ladder_with_fast_track() {
    init_test_env();
    let config = LadderConfig::from_json(
        r#"{
            "ranks": [
                { "name": "bronze", "cycle_length": 2, "promotion_threshold": 20, "maintenance_threshold": 13,
                  "jump_caps": { "2": "silver" } },
                { "name": "silver", "promotion_threshold": 30, "maintenance_threshold": 20 },
                { "name": "gold", "promotion_threshold": 50, "maintenance_threshold": 40 }
            ],
            "scoring": { "units_per_point": 1, "activity_unit": "hours" }
        }"#
    )
    .unwrap();
    let evaluator = config.build().unwrap();
    let store = MemoryStore::new();

    execute(&store, &evaluator, &add("dave"), fixed_time()).await.unwrap();

    execute(&store, &evaluator, &process("dave", 40.0, 0.0), fixed_time())
        .await
        .unwrap();
    let member = store.load_members().await.unwrap().remove(0);
    assert_eq!(member.last_outcome, CycleOutcome::InProgress { week: 1, of: 2 });
    assert_eq!(member.cycle_week, 2);
    assert_eq!(member.accumulated_score, 40.0);

    // 80 accumulated is four times the goal, capped at silver
    execute(&store, &evaluator, &process("dave", 40.0, 0.0), fixed_time())
        .await
        .unwrap();
    let member = store.load_members().await.unwrap().remove(0);
    assert_eq!(member.current_rank, "silver");
    assert_eq!(member.last_outcome, CycleOutcome::Promoted);
    assert_eq!(member.cycle_week, 1);
    assert_eq!(member.accumulated_score, 0.0);
}

#[tokio::test]
#[serial]
async fn test_modifiers_and_multiplier_scale_score() {
    init_test_env();
    let store = MemoryStore::new();
    let evaluator = Preset::Chat.config().build().unwrap();

    execute(&store, &evaluator, &add("erin"), fixed_time()).await.unwrap();

    let command = Command::Process {
        name: "erin".to_string(),
        activity: 500.0,
        bonus: 0.0,
        multiplier: Some(2.0),
        rank: None,
        rush_hour: false,
        weekend: false,
        challenge: Some(ChallengeType::Event)
    };
    execute(&store, &evaluator, &command, fixed_time()).await.unwrap();

    let member = store.load_members().await.unwrap().remove(0);
    assert_eq!(member.last_weekly_score, 30.0);
    assert_eq!(member.last_multiplier, 2.0);
    // Twice the floor goal of 15
    assert_eq!(member.current_rank, "woo");
}

#[tokio::test]
#[serial]
async fn test_member_management() {
    init_test_env();
    let store = MemoryStore::new();
    let evaluator = Preset::Chat.config().build().unwrap();

    execute(&store, &evaluator, &add("frank"), fixed_time()).await.unwrap();
    let duplicate = execute(&store, &evaluator, &add("frank"), fixed_time()).await;
    assert!(matches!(duplicate, Err(TrackerError::DuplicateMember(_))));

    let unknown_rank = Command::Add {
        name: "grace".to_string(),
        rank: Some("mythic".to_string()),
        external_id: None
    };
    let result = execute(&store, &evaluator, &unknown_rank, fixed_time()).await;
    assert!(matches!(result, Err(TrackerError::UnknownRank(_))));

    let missing = execute(&store, &evaluator, &Command::Remove { name: "grace".to_string() }, fixed_time()).await;
    assert!(matches!(missing, Err(TrackerError::UnknownMember(_))));

    execute(&store, &evaluator, &Command::Remove { name: "frank".to_string() }, fixed_time())
        .await
        .unwrap();
    assert!(store.rows().is_empty());
}

#[tokio::test]
#[serial]
async fn test_read_only_views() {
    init_test_env();
    let store = MemoryStore::new();
    let evaluator = Preset::Chat.config().build().unwrap();

    for name in ["heidi", "ivan"] {
        execute(&store, &evaluator, &add(name), fixed_time()).await.unwrap();
    }
    execute(&store, &evaluator, &process("ivan", 1000.0, 3.0), fixed_time())
        .await
        .unwrap();
    execute(&store, &evaluator, &process("heidi", 100.0, 0.0), fixed_time())
        .await
        .unwrap();

    let leaderboard = execute(&store, &evaluator, &Command::Leaderboard { json: false }, fixed_time())
        .await
        .unwrap();
    let lines: Vec<&str> = leaderboard.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("ivan"));

    let summary = execute(&store, &evaluator, &Command::Summary, fixed_time()).await.unwrap();
    assert!(summary.contains("Members: 2"));
    assert!(summary.contains("Total weekly points: 25.0"));
    assert!(summary.contains("Total bonus: 3.0"));

    let goals = execute(&store, &evaluator, &Command::Goals, fixed_time()).await.unwrap();
    assert_eq!(goals.lines().count(), 13);
    assert!(goals.contains("750 messages"));
}
