use std::time::Duration;

use sea_orm::{ConnectionTrait, Database, Statement};

use engine::{Engine, EngineError, Period, YearMonth};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    Engine::new(db)
}

#[tokio::test]
async fn transaction_crud_round_trip() {
    let engine = engine_with_db().await;

    let created = engine
        .new_transaction(
            "alice",
            450,
            "groceries".to_string(),
            "2025-03-10".to_string(),
            Some("Food & Dining".to_string()),
        )
        .await
        .unwrap();

    let fetched = engine.transaction("alice", created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = engine
        .update_transaction(
            "alice",
            created.id,
            500,
            "groceries and more".to_string(),
            "2025-03-11".to_string(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 500);
    assert_eq!(updated.category, None);
    assert_eq!(updated.created_at, created.created_at);

    engine.delete_transaction("alice", created.id).await.unwrap();
    let missing = engine.transaction("alice", created.id).await;
    assert!(matches!(missing, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn transactions_list_newest_first() {
    let engine = engine_with_db().await;

    let first = engine
        .new_transaction("alice", 100, "older".to_string(), "2025-01-01".to_string(), None)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = engine
        .new_transaction("alice", 200, "newer".to_string(), "2025-01-02".to_string(), None)
        .await
        .unwrap();

    let listed = engine.list_transactions("alice").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[tokio::test]
async fn transactions_are_owner_scoped() {
    let engine = engine_with_db().await;

    let created = engine
        .new_transaction("alice", 100, "hers".to_string(), "2025-01-01".to_string(), None)
        .await
        .unwrap();

    assert!(engine.list_transactions("bob").await.unwrap().is_empty());
    assert!(matches!(
        engine.transaction("bob", created.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_transaction("bob", created.id).await,
        Err(EngineError::KeyNotFound(_))
    ));

    // Still there for the real owner.
    engine.transaction("alice", created.id).await.unwrap();
}

#[tokio::test]
async fn transaction_validation_rejected() {
    let engine = engine_with_db().await;

    let res = engine
        .new_transaction("alice", 0, "zero".to_string(), "2025-01-01".to_string(), None)
        .await;
    assert!(matches!(res, Err(EngineError::Validation(_))));

    let res = engine
        .new_transaction("alice", 100, "".to_string(), "2025-01-01".to_string(), None)
        .await;
    assert!(matches!(res, Err(EngineError::Validation(_))));

    let res = engine
        .new_transaction("alice", 100, "no date".to_string(), " ".to_string(), None)
        .await;
    assert!(matches!(res, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn budget_crud_and_derived_spending() {
    let engine = engine_with_db().await;

    let budget = engine
        .new_budget(
            "alice",
            "Food & Dining".to_string(),
            1000,
            Period::Monthly,
            "2025-03-05".to_string(),
            None,
        )
        .await
        .unwrap();

    engine
        .new_transaction("alice", 300, "a".to_string(), "2025-03-10".to_string(), None)
        .await
        .unwrap();
    engine
        .new_transaction("alice", 150, "b".to_string(), "2025-03-20".to_string(), None)
        .await
        .unwrap();
    // April spending must not count against the March budget.
    engine
        .new_transaction("alice", 999, "c".to_string(), "2025-04-01".to_string(), None)
        .await
        .unwrap();

    let status = engine.budget("alice", budget.id).await.unwrap();
    assert_eq!(status.spent_minor, 450);
    assert_eq!(status.remaining_minor, 550);

    let listed = engine.list_budgets("alice").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].budget.id, budget.id);

    let updated = engine
        .update_budget(
            "alice",
            budget.id,
            "Food & Dining".to_string(),
            2000,
            Period::Monthly,
            "2025-03-05".to_string(),
            None,
            Some(false),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 2000);
    assert!(!updated.is_active);

    engine.delete_budget("alice", budget.id).await.unwrap();
    assert!(matches!(
        engine.budget("alice", budget.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn budget_remaining_clamps_at_zero() {
    let engine = engine_with_db().await;

    let budget = engine
        .new_budget(
            "alice",
            "Shopping".to_string(),
            500,
            Period::Monthly,
            "2025-01-01".to_string(),
            None,
        )
        .await
        .unwrap();
    engine
        .new_transaction("alice", 700, "splurge".to_string(), "2025-01-15".to_string(), None)
        .await
        .unwrap();

    let status = engine.budget("alice", budget.id).await.unwrap();
    assert_eq!(status.spent_minor, 700);
    assert_eq!(status.remaining_minor, 0);
}

#[tokio::test]
async fn budget_validation_rejected() {
    let engine = engine_with_db().await;

    let res = engine
        .new_budget(
            "alice",
            "Travel".to_string(),
            100,
            Period::Weekly,
            "2025-06-01".to_string(),
            Some("2025-05-01".to_string()),
        )
        .await;
    assert!(matches!(res, Err(EngineError::Validation(_))));

    let res = engine
        .new_budget(
            "alice",
            "".to_string(),
            100,
            Period::Weekly,
            "2025-06-01".to_string(),
            None,
        )
        .await;
    assert!(matches!(res, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn dashboard_joins_live_records() {
    let engine = engine_with_db().await;

    engine
        .new_budget(
            "alice",
            "Food & Dining".to_string(),
            1000,
            Period::Monthly,
            "2025-03-05".to_string(),
            None,
        )
        .await
        .unwrap();
    engine
        .new_transaction(
            "alice",
            300,
            "groceries".to_string(),
            "2025-03-10".to_string(),
            Some("Food".to_string()),
        )
        .await
        .unwrap();
    engine
        .new_transaction("alice", 150, "dinner".to_string(), "2025-03-20".to_string(), None)
        .await
        .unwrap();

    let current = YearMonth { year: 2025, month: 3 };
    let dash = engine.dashboard("alice", current).await.unwrap();

    assert_eq!(dash.summaries.len(), 1);
    assert_eq!(dash.summaries[0].budget_minor, 1000);
    assert_eq!(dash.summaries[0].spent_minor, 450);
    assert_eq!(dash.summaries[0].remaining_minor, 550);
    assert_eq!(dash.current_budget_minor, 1000);
    assert_eq!(dash.totals.transaction_count, 2);
    assert_eq!(dash.categories.len(), 2);

    // Other owners see an empty dashboard.
    let empty = engine.dashboard("bob", current).await.unwrap();
    assert!(empty.summaries.is_empty());
    assert_eq!(empty.totals.transaction_count, 0);
}

#[tokio::test]
async fn dashboard_skips_records_with_bad_dates() {
    let engine = engine_with_db().await;

    engine
        .new_budget(
            "alice",
            "Bills".to_string(),
            100,
            Period::Monthly,
            "2025-03-01".to_string(),
            None,
        )
        .await
        .unwrap();
    // Date presence is validated, format is not; the aggregator drops the
    // row instead of failing the render.
    engine
        .new_transaction("alice", 999, "bad".to_string(), "03/10/2025".to_string(), None)
        .await
        .unwrap();

    let dash = engine
        .dashboard("alice", YearMonth { year: 2025, month: 3 })
        .await
        .unwrap();
    assert_eq!(dash.summaries.len(), 1);
    assert_eq!(dash.summaries[0].spent_minor, 0);
    // The bad row still counts toward the plain totals.
    assert_eq!(dash.totals.transaction_count, 1);
}

#[tokio::test]
async fn report_assembles_all_sections() {
    let engine = engine_with_db().await;

    engine
        .new_budget(
            "alice",
            "Food & Dining".to_string(),
            1000,
            Period::Monthly,
            "2025-03-05".to_string(),
            None,
        )
        .await
        .unwrap();
    let first = engine
        .new_transaction(
            "alice",
            300,
            "groceries".to_string(),
            "2025-03-10".to_string(),
            Some("Food".to_string()),
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = engine
        .new_transaction("alice", 150, "dinner".to_string(), "2025-03-20".to_string(), None)
        .await
        .unwrap();

    let report = engine
        .report("alice", YearMonth { year: 2025, month: 3 })
        .await
        .unwrap();

    assert_eq!(report.totals.total_spent_minor, 450);
    assert_eq!(report.current_budget_minor, 1000);
    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.months.len(), 12);
    assert_eq!(report.months[2].spent_minor, 450);
    assert_eq!(report.history.len(), 2);
    assert_eq!(report.history[0].id, second.id);
    assert_eq!(report.history[1].id, first.id);
}

#[tokio::test]
async fn lookups_by_foreign_id_not_found() {
    let engine = engine_with_db().await;
    let missing = Uuid::new_v4();

    assert!(matches!(
        engine.transaction("alice", missing).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.budget("alice", missing).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
