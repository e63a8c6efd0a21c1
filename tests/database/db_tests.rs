use rank_tracker::{
    commands::Session,
    database::{db::DbClient, error::PersistenceError, MemberStore},
    model::{
        error::TrackerError,
        jump_policy::JumpPolicy,
        structures::{cycle_outcome::CycleOutcome, weekly_submission::WeeklySubmission}
    },
    utils::test_utils::{fixed_time, generate_member, generate_members, scenario_evaluator, scenario_ladder}
};
use serial_test::serial;

use super::test_helpers::TestDatabase;
use crate::common::init_test_env;

#[tokio::test]
#[serial]
async fn test_save_and_load_members() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let mut members = generate_members(20, &scenario_ladder());
    members[0].last_outcome = CycleOutcome::InProgress { week: 2, of: 3 };
    members[1].last_outcome = CycleOutcome::Demoted;

    db_client.save_members(&members).await.expect("Failed to save members");
    let loaded = db_client.load_members().await.expect("Failed to load members");

    assert_eq!(loaded, members);
}

#[tokio::test]
#[serial]
async fn test_save_replaces_table() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    db_client
        .save_members(&[generate_member("alice", "A"), generate_member("bob", "B")])
        .await
        .unwrap();
    db_client.save_members(&[generate_member("carol", "C")]).await.unwrap();

    let loaded = db_client.load_members().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].display_name, "carol");
    assert_eq!(test_db.member_count().await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn test_failed_save_rolls_back() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    db_client.save_members(&[generate_member("alice", "A")]).await.unwrap();

    // Duplicate primary keys fail halfway through the insert
    let duplicate = vec![generate_member("bob", "A"), generate_member("bob", "B")];
    let result = db_client.save_members(&duplicate).await;

    assert!(matches!(result, Err(PersistenceError::Database(_))));

    let loaded = db_client.load_members().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].display_name, "alice");

    db_client.save_members(&[generate_member("carol", "A")]).await.unwrap();
    assert_eq!(db_client.load_members().await.unwrap()[0].display_name, "carol");
}

#[tokio::test]
#[serial]
async fn test_failed_truncate_leaves_connection_reusable() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");
    let evaluator = scenario_evaluator(JumpPolicy::Uniform);

    db_client.save_members(&[generate_member("alice", "A")]).await.unwrap();
    test_db.block_truncate().await.unwrap();

    let mut session = Session::open(&db_client, &evaluator).await.unwrap();
    let result = session
        .process("alice", &WeeklySubmission::new(1250.0, 0.0, 1.0), None, fixed_time())
        .await;

    assert!(matches!(result, Err(TrackerError::Persistence(PersistenceError::Database(_)))));
    assert!(session.has_unsaved_changes());
    assert_eq!(db_client.load_members().await.unwrap()[0].current_rank, "A");

    test_db.unblock_truncate().await.unwrap();
    session.save().await.expect("Retried save should succeed");

    assert!(!session.has_unsaved_changes());
    assert_eq!(db_client.load_members().await.unwrap()[0].current_rank, "B");
}

#[tokio::test]
#[serial]
async fn test_sparse_rows_use_defaults() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    test_db.insert_raw_member(0, "dave", "woo").await.unwrap();

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");
    db_client.ensure_schema().await.unwrap();

    let loaded = db_client.load_members().await.unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].external_id, "N/A");
    assert_eq!(loaded[0].cycle_week, 1);
    assert_eq!(loaded[0].last_outcome, CycleOutcome::InProgress { week: 1, of: 1 });
}

#[tokio::test]
#[serial]
async fn test_processed_week_persists() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");
    let evaluator = scenario_evaluator(JumpPolicy::Uniform);

    db_client.save_members(&[generate_member("erin", "A")]).await.unwrap();

    let mut session = Session::open(&db_client, &evaluator).await.unwrap();
    let processed = session
        .process("erin", &WeeklySubmission::new(1250.0, 0.0, 1.0), None, fixed_time())
        .await
        .unwrap();

    assert_eq!(processed.report.outcome, CycleOutcome::Promoted);

    let loaded = db_client.load_members().await.unwrap();
    assert_eq!(loaded[0].current_rank, "B");
    assert_eq!(loaded[0].last_outcome, CycleOutcome::Promoted);
    assert_eq!(loaded[0].accumulated_score, 0.0);
    assert_eq!(loaded[0].lifetime_score, 25.0);
}
