//! End-to-end: real HTTP client against a mock Codeforces API, SQLite store on disk.

use std::sync::Arc;

use cf_client::{ClientConfig, CodeforcesClient};
use cf_roster::reminders::find_due;
use cf_roster::{
    NewIndividual, RecordStore, RosterError, SqliteRecordStore, SyncOrchestrator, SyncStage,
};
use chrono::{Duration, Utc};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CodeforcesClient {
    CodeforcesClient::new(ClientConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_seconds: 5,
        request_delay_ms: (0, 0),
        user_agent: Some("cf-roster-tests".into()),
    })
    .expect("client")
}

async fn mount_user(server: &MockServer, handle: &str, rating: i32, solved_at: i64) {
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .and(query_param("handles", handle))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [{"handle": handle, "rating": rating, "maxRating": rating + 50}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user.rating"))
        .and(query_param("handle", handle))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [{
                "contestId": 1900,
                "contestName": "Educational Round",
                "handle": handle,
                "rank": 1024,
                "ratingUpdateTimeSeconds": 1_700_000_000,
                "oldRating": 0,
                "newRating": rating
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user.status"))
        .and(query_param("handle", handle))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [
                {
                    "id": 11,
                    "creationTimeSeconds": solved_at,
                    "problem": {"contestId": 1900, "index": "A", "name": "Warmup", "rating": 900},
                    "verdict": "OK"
                },
                {
                    "id": 12,
                    "creationTimeSeconds": solved_at + 60,
                    "problem": {"contestId": 1900, "index": "B", "name": "Harder", "rating": 1400},
                    "verdict": "WRONG_ANSWER"
                },
                {
                    "id": 13,
                    "creationTimeSeconds": solved_at + 120,
                    "problem": {"contestId": 1900, "index": "A", "name": "Warmup", "rating": 900},
                    "verdict": "OK"
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_unknown(server: &MockServer, handle: &str) {
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .and(query_param("handles", handle))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "FAILED",
            "comment": format!("handles: User with handle {handle} not found")
        })))
        .mount(server)
        .await;
}

fn details(name: &str, handle: &str) -> NewIndividual {
    NewIndividual {
        name: name.into(),
        email: format!("{handle}@example.com"),
        phone_number: None,
        codeforces_handle: handle.into(),
    }
}

#[tokio::test]
async fn enroll_sync_and_scan_against_mock_api() {
    let server = MockServer::start().await;
    let recent = (Utc::now() - Duration::days(2)).timestamp();
    let stale = (Utc::now() - Duration::days(20)).timestamp();
    mount_user(&server, "active_one", 1450, recent).await;
    mount_user(&server, "idle_one", 1210, stale).await;
    mount_unknown(&server, "nobody").await;

    let dir = tempfile::TempDir::new().expect("dir");
    let store: Arc<dyn RecordStore> =
        Arc::new(SqliteRecordStore::open(&dir.path().join("roster.db")).expect("open"));
    let orch = SyncOrchestrator::new(client_for(&server), store.clone()).with_max_concurrency(2);

    let active = orch
        .enroll(details("Active Person", "active_one"))
        .await
        .expect("enroll active");
    assert_eq!(active.current_rating, 1450);
    assert_eq!(active.max_rating, 1500);
    assert_eq!(active.problem_solving_stats.total_solved, 1);
    assert_eq!(active.problem_solving_stats.submission_dates.len(), 2);

    let idle = orch
        .enroll(details("Idle Person", "idle_one"))
        .await
        .expect("enroll idle");

    let err = orch
        .enroll(details("Nobody Here", "nobody"))
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::Fetch(ref e) if e.is_unknown_handle()));

    let report = orch
        .sync_all(&CancellationToken::new())
        .await
        .expect("sync all");
    assert_eq!(report.attempted(), 2);
    assert_eq!(report.failed(), 0);

    let stored = store.get_all().await.expect("all");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, active.id);
    assert_eq!(stored[0].contest_history.len(), 1);
    assert_eq!(stored[0].contest_history[0].rating_change, 1450);

    let due: Vec<&str> = find_due(&stored, 7, Utc::now())
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(due, vec![idle.id.as_str()]);
}

#[tokio::test]
async fn api_outage_is_reported_per_individual() {
    let server = MockServer::start().await;
    mount_user(&server, "steady", 1600, Utc::now().timestamp()).await;

    let dir = tempfile::TempDir::new().expect("dir");
    let store: Arc<dyn RecordStore> =
        Arc::new(SqliteRecordStore::open(&dir.path().join("roster.db")).expect("open"));
    let orch = SyncOrchestrator::new(client_for(&server), store.clone());
    let steady = orch.enroll(details("Steady", "steady")).await.expect("enroll");

    // Enrolled directly so the handle is never confirmed against the API.
    let broken = cf_roster::TrackedIndividual::new(details("Broken", "flaky"));
    store.save(&broken).await.expect("seed");
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .and(query_param("handles", "flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;

    let report = orch
        .sync_all(&CancellationToken::new())
        .await
        .expect("sync all");
    assert_eq!(report.succeeded(), 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].id, broken.id);
    assert_eq!(failures[0].stage, SyncStage::FetchProfile);
    assert!(failures[0].is_fetch_failure());

    assert_eq!(store.get_by_id(&broken.id).await.expect("broken"), broken);
    assert!(store
        .get_by_id(&steady.id)
        .await
        .expect("steady")
        .last_sync
        .is_some());
}
