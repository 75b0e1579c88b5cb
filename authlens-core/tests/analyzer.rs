use std::path::PathBuf;

use authlens_common::{AuthlensError, RiskConfig};
use authlens_core::Analyzer;
use sea_orm::{ConnectionTrait, Database};
use uuid::Uuid;

const USERS_DDL: &str = "CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    failed_attempts INTEGER NOT NULL,
    locked INTEGER NOT NULL,
    created_at TEXT NOT NULL
)";

const EVENTS_DDL: &str = "CREATE TABLE login_events (
    username TEXT NOT NULL,
    success INTEGER NOT NULL,
    mode TEXT NOT NULL,
    reason TEXT,
    occurred_at TEXT NOT NULL
)";

/// A throwaway snapshot file, removed again when the test ends.
struct SnapshotFile {
    path: PathBuf,
}

impl Drop for SnapshotFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Creates a throwaway snapshot file and runs the given statements
/// against it over a scoped writable connection.
async fn snapshot(statements: &[&str]) -> SnapshotFile {
    let path = std::env::temp_dir().join(format!("authlens-test-{}.db", Uuid::new_v4()));
    let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap();
    for stmt in statements {
        db.execute_unprepared(stmt).await.unwrap();
    }
    SnapshotFile { path }
}

/// Two users (alice locked and over the attempt threshold), one event
/// referencing no known account and one carrying an injection-looking
/// reason.
async fn standard_snapshot() -> SnapshotFile {
    snapshot(&[
        USERS_DDL,
        "INSERT INTO users VALUES (1, 'alice', 7, 1, '2024-01-01')",
        "INSERT INTO users VALUES (2, 'bob', 1, 0, '2024-01-02')",
        EVENTS_DDL,
        "INSERT INTO login_events VALUES ('ghost', 0, 'password', '', '2024-03-01 09:00:00')",
        "INSERT INTO login_events VALUES ('bob', 0, 'password', ''' OR 1=1 --', '2024-03-01 10:00:00')",
    ])
    .await
}

#[tokio::test]
async fn test_load_and_classify() {
    let snap = standard_snapshot().await;
    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(&snap.path).await.unwrap();

    let insights = analyzer.insights();
    assert_eq!(insights.total_users, 2);
    assert_eq!(insights.locked_users, 1);
    assert_eq!(insights.high_risk_users, 1);
    assert_eq!(insights.suspicious_logins, 2);

    // Users come back ordered by username; alice carries the flag.
    assert_eq!(analyzer.users()[0].username, "alice");
    assert!(analyzer.users()[0].high_risk);
    assert!(!analyzer.users()[1].high_risk);

    // Events come back newest first, annotated at load.
    let events = analyzer.events();
    assert_eq!(events[0].username, "bob");
    assert_eq!(events[0].reason, "sql_injection_possible");
    assert!(events[0].high_risk);
    assert_eq!(events[1].username, "ghost");
    assert!(events[1].high_risk);
}

#[tokio::test]
async fn test_legacy_snapshot_without_events_loads_silently() {
    let snap = snapshot(&[
        USERS_DDL,
        "INSERT INTO users VALUES (1, 'alice', 0, 0, '2024-01-01')",
    ])
    .await;

    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(&snap.path).await.unwrap();

    assert!(analyzer.events().is_empty());
    let insights = analyzer.insights();
    assert_eq!(insights.total_users, 1);
    assert_eq!(insights.suspicious_logins, 0);
}

#[tokio::test]
async fn test_missing_file_is_source_unavailable() {
    let mut analyzer = Analyzer::new(RiskConfig::default());
    let result = analyzer
        .open(&std::env::temp_dir().join("authlens-no-such-snapshot.db"))
        .await;
    assert!(matches!(
        result,
        Err(AuthlensError::SourceUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_malformed_timestamp_aborts_load_keeping_previous_snapshot() {
    let good = standard_snapshot().await;
    let bad = snapshot(&[
        USERS_DDL,
        "INSERT INTO users VALUES (1, 'mallory', 0, 0, '2024-01-01')",
        EVENTS_DDL,
        "INSERT INTO login_events VALUES ('mallory', 1, 'password', NULL, 'not-a-date')",
    ])
    .await;

    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(&good.path).await.unwrap();

    let result = analyzer.open(&bad.path).await;
    assert!(matches!(
        result,
        Err(AuthlensError::MalformedRow {
            table: "login_events",
            ..
        })
    ));

    // No partial snapshot adopted; the previous one is still served.
    assert_eq!(analyzer.users().len(), 2);
    assert_eq!(analyzer.users()[0].username, "alice");
}

#[tokio::test]
async fn test_negative_failed_attempts_aborts_load() {
    let snap = snapshot(&[
        USERS_DDL,
        "INSERT INTO users VALUES (1, 'alice', -3, 0, '2024-01-01')",
    ])
    .await;

    let mut analyzer = Analyzer::new(RiskConfig::default());
    let result = analyzer.open(&snap.path).await;
    assert!(matches!(
        result,
        Err(AuthlensError::MalformedRow { table: "users", .. })
    ));
    assert!(analyzer.users().is_empty());
}

#[tokio::test]
async fn test_filter_recounts_over_visible_subset() {
    let snap = standard_snapshot().await;
    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(&snap.path).await.unwrap();

    analyzer.set_query("BOB");
    let visible_users = analyzer.visible_users();
    assert_eq!(visible_users.len(), 1);
    assert_eq!(visible_users[0].username, "bob");

    let insights = analyzer.insights();
    assert_eq!(insights.total_users, 1);
    assert_eq!(insights.locked_users, 0);
    assert_eq!(insights.high_risk_users, 0);
    assert_eq!(insights.suspicious_logins, 1);

    // Clearing the query restores the full counters.
    analyzer.set_query("");
    assert_eq!(analyzer.insights().total_users, 2);
    assert_eq!(analyzer.insights().suspicious_logins, 2);
}

#[tokio::test]
async fn test_unlock_persists_and_reconciles_store() {
    let snap = standard_snapshot().await;
    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(&snap.path).await.unwrap();

    let bob_before = analyzer.users()[1].clone();
    analyzer.unlock_user(1).await.unwrap();

    assert!(!analyzer.users()[0].locked);
    assert_eq!(analyzer.users()[1], bob_before);
    assert_eq!(analyzer.insights().locked_users, 0);

    // The write went through to the backing file.
    let mut fresh = Analyzer::new(RiskConfig::default());
    fresh.open(&snap.path).await.unwrap();
    assert!(!fresh.users()[0].locked);
}

#[tokio::test]
async fn test_unlock_already_unlocked_is_idempotent_success() {
    let snap = standard_snapshot().await;
    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(&snap.path).await.unwrap();

    analyzer.unlock_user(2).await.unwrap();
    assert!(!analyzer.users()[1].locked);
}

#[tokio::test]
async fn test_unlock_deleted_row_reports_record_not_found() {
    let snap = standard_snapshot().await;
    let mut analyzer = Analyzer::new(RiskConfig::default());
    analyzer.open(&snap.path).await.unwrap();

    // Delete alice behind the analyzer's back.
    let db = Database::connect(format!("sqlite://{}?mode=rw", snap.path.display()))
        .await
        .unwrap();
    db.execute_unprepared("DELETE FROM users WHERE id = 1")
        .await
        .unwrap();
    drop(db);

    let result = analyzer.unlock_user(1).await;
    assert!(matches!(result, Err(AuthlensError::RecordNotFound(1))));

    // The in-memory state was left untouched.
    assert!(analyzer.users()[0].locked);
}

#[tokio::test]
async fn test_unlock_without_snapshot_is_no_writable_source() {
    let mut analyzer = Analyzer::new(RiskConfig::default());
    let result = analyzer.unlock_user(1).await;
    assert!(matches!(result, Err(AuthlensError::NoWritableSource)));
}
