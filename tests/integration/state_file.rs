//! Alert state persistence across restarts

use sitewatch::ProbeStatus;
use sitewatch::monitors::uptime::AlertState;
use sitewatch::storage::{FileStateRepository, StateRepository};
use tempfile::tempdir;

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let repo = FileStateRepository::new(dir.path().join("state.json"));

    let state = AlertState {
        last_alert_status: ProbeStatus::Down,
        consecutive_failures: 5,
        consecutive_successes: 0,
        last_summary_date: "2026-08-04".to_string(),
    };

    repo.save(&state).await.unwrap();
    assert_eq!(repo.load().await, state);
}

#[tokio::test]
async fn missing_file_loads_as_defaults() {
    let dir = tempdir().unwrap();
    let repo = FileStateRepository::new(dir.path().join("state.json"));

    assert_eq!(repo.load().await, AlertState::default());
}

#[tokio::test]
async fn corrupt_file_loads_as_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json at all").unwrap();

    let repo = FileStateRepository::new(path);
    assert_eq!(repo.load().await, AlertState::default());
}

#[tokio::test]
async fn save_overwrites_a_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "garbage").unwrap();

    let repo = FileStateRepository::new(path.clone());
    repo.save(&AlertState::default()).await.unwrap();

    // No leftover temp file and the content parses again.
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(repo.load().await, AlertState::default());
}

#[tokio::test]
async fn state_without_summary_date_field_still_loads() {
    // Older state files may predate the summary date field.
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        r#"{"last_alert_status":"DOWN","consecutive_failures":2,"consecutive_successes":0}"#,
    )
    .unwrap();

    let repo = FileStateRepository::new(path);
    let state = repo.load().await;

    assert_eq!(state.last_alert_status, ProbeStatus::Down);
    assert_eq!(state.consecutive_failures, 2);
    assert_eq!(state.last_summary_date, "");
}
