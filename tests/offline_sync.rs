//! End-to-end offline queue scenarios: queue while offline, drain on
//! reconnect, partial failure, and the full stack against a mock
//! backend.

use std::sync::Arc;
use std::time::Duration;

use gearbench::infrastructure::net::ConnectivityState;
use gearbench::infrastructure::offline::SqliteOfflineStore;
use gearbench::shared::config::{AppConfig, SyncConfig};
use gearbench::test_support::{RecordedEvent, RecordingNotifier, ScriptedGateway};
use gearbench::{
    AppState, IntakeService, JobFields, OfflineStore, PendingStatus, SubmissionReceipt,
    SyncOutcome, SyncReport, SyncService,
};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    store: Arc<dyn OfflineStore>,
    connectivity: Arc<ConnectivityState>,
    notifier: Arc<RecordingNotifier>,
    intake: IntakeService,
    sync: Arc<SyncService>,
}

async fn harness(gateway: Arc<ScriptedGateway>, online: bool) -> Harness {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let notifier = RecordingNotifier::new();
    let store: Arc<dyn OfflineStore> = Arc::new(SqliteOfflineStore::new(pool, notifier.clone()));
    let connectivity = Arc::new(ConnectivityState::new(online));

    let intake = IntakeService::new(
        gateway.clone(),
        connectivity.clone(),
        Some(store.clone()),
    );
    let sync = Arc::new(SyncService::new(
        store.clone(),
        gateway,
        connectivity.clone(),
        notifier.clone(),
    ));

    Harness {
        store,
        connectivity,
        notifier,
        intake,
        sync,
    }
}

async fn wait_until_drained(store: &Arc<dyn OfflineStore>) {
    for _ in 0..100 {
        if store
            .count_by_status(PendingStatus::Pending)
            .await
            .unwrap()
            == 0
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("queue never drained");
}

#[tokio::test]
async fn offline_submission_syncs_on_reconnect() {
    let gateway = ScriptedGateway::reserving(["GG-001"]);
    let h = harness(gateway.clone(), false).await;

    // Offline: the submission is accepted into the queue.
    let receipt = h
        .intake
        .submit(JobFields::new(json!({"name": "Alice"})).unwrap())
        .await
        .unwrap();
    let local_id = match receipt {
        SubmissionReceipt::Queued { local_id } => local_id,
        other => panic!("expected a queued receipt, got {other:?}"),
    };
    assert_eq!(local_id.value(), 1);
    assert_eq!(
        h.store.count_by_status(PendingStatus::Pending).await.unwrap(),
        1
    );
    assert_eq!(gateway.reserve_calls(), 0);

    // Reconnect: the listener drains the queue.
    let handle = h.sync.spawn_reconnect_listener(SyncConfig {
        sync_on_start: false,
        startup_delay_ms: 0,
        reconnect_delay_ms: 0,
    });
    h.connectivity.set_online(true);
    wait_until_drained(&h.store).await;
    handle.abort();

    assert_eq!(gateway.submitted_payloads()[0]["jobId"], "GG-001");
    assert_eq!(gateway.submitted_payloads()[0]["name"], "Alice");

    let events = h.notifier.events();
    assert!(events.contains(&RecordedEvent::Started(1)));
    assert!(events.contains(&RecordedEvent::Finished(SyncReport::new(1, 0))));
    assert_eq!(h.notifier.badge_counts().last(), Some(&0));
}

#[tokio::test]
async fn partial_failure_keeps_the_failed_job_queued() {
    let gateway = ScriptedGateway::reserving(["GG-010", "GG-011"]);
    gateway.fail_submit_for("GG-011", "timeout");
    let h = harness(gateway, true).await;

    h.store
        .add_pending(JobFields::new(json!({"name": "Alice"})).unwrap())
        .await
        .unwrap();
    h.store
        .add_pending(JobFields::new(json!({"name": "Bob"})).unwrap())
        .await
        .unwrap();

    let outcome = h.sync.sync_pending_jobs().await.unwrap();
    assert_eq!(outcome, SyncOutcome::Completed(SyncReport::new(1, 1)));

    let remaining = h.store.list_by_status(PendingStatus::Pending).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].attempts, 1);
    assert_eq!(remaining[0].last_error.as_deref(), Some("Job submission failed: timeout"));

    // Badge reflects the surviving record after the pass.
    assert_eq!(h.notifier.badge_counts().last(), Some(&1));
}

#[tokio::test]
async fn badge_tracks_the_pending_count_through_the_lifecycle() {
    let gateway = ScriptedGateway::reserving(["GG-001", "GG-002"]);
    let h = harness(gateway, false).await;

    for name in ["Alice", "Bob"] {
        h.intake
            .submit(JobFields::new(json!({"name": name})).unwrap())
            .await
            .unwrap();
        let count = h.store.count_by_status(PendingStatus::Pending).await.unwrap();
        assert_eq!(h.notifier.badge_counts().last(), Some(&count));
    }

    h.connectivity.set_online(true);
    h.sync.sync_pending_jobs().await.unwrap();
    assert_eq!(h.notifier.badge_counts().last(), Some(&0));
}

#[tokio::test]
async fn overlapping_triggers_reserve_once_per_record() {
    let gateway = ScriptedGateway::reserving(["GG-001"]);
    gateway.delay_each_call(Duration::from_millis(50));
    let h = harness(gateway.clone(), true).await;

    h.store
        .add_pending(JobFields::new(json!({"name": "Alice"})).unwrap())
        .await
        .unwrap();

    // A reconnect event and a manual sync land together.
    let manual = tokio::spawn({
        let sync = h.sync.clone();
        async move { sync.sync_pending_jobs().await.unwrap() }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = h.sync.sync_pending_jobs().await.unwrap();

    assert_eq!(second, SyncOutcome::Skipped);
    manual.await.unwrap();
    assert_eq!(gateway.reserve_calls(), 1);
    assert_eq!(gateway.submitted_payloads().len(), 1);
}

#[tokio::test]
async fn queue_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("gearbench.db").display()
    );

    {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let store = SqliteOfflineStore::new(pool.clone(), RecordingNotifier::new());
        store
            .add_pending(JobFields::new(json!({"name": "Alice"})).unwrap())
            .await
            .unwrap();
        pool.close().await;
    }

    // A fresh connection sees the queued submission.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    let store = SqliteOfflineStore::new(pool, RecordingNotifier::new());

    let pending = store.list_by_status(PendingStatus::Pending).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].fields.as_json()["name"], "Alice");
    assert_eq!(pending[0].attempts, 0);
}

#[tokio::test]
async fn full_stack_drain_against_a_mock_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"action": "reserveJobId"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "jobId": "GG-001"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"action": "submitJob"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "queuePosition": 3
        })))
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.remote.endpoint_url = server.uri();
    config.sync.sync_on_start = false;
    config.sync.startup_delay_ms = 0;
    config.sync.reconnect_delay_ms = 0;

    let notifier = RecordingNotifier::new();
    let state = AppState::init(config, notifier.clone()).await.unwrap();
    let handle = state.start_sync_engine().unwrap();

    // Go offline, take a submission, come back.
    state.connectivity.set_online(false);
    let receipt = state
        .intake
        .submit(JobFields::new(json!({"name": "Alice", "bike": "Tourer"})).unwrap())
        .await
        .unwrap();
    assert!(receipt.was_queued());

    state.connectivity.set_online(true);
    for _ in 0..100 {
        if notifier
            .events()
            .contains(&RecordedEvent::Finished(SyncReport::new(1, 0)))
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.abort();

    assert!(notifier
        .events()
        .contains(&RecordedEvent::Finished(SyncReport::new(1, 0))));
    assert_eq!(notifier.badge_counts().last(), Some(&0));
}
