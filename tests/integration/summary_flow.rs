//! Daily summary flow: trigger, aggregation, date guard and pruning

use chrono::{Duration, TimeZone, Utc};
use sitewatch::config::Config;
use sitewatch::scheduler::Scheduler;
use sitewatch::storage::{MemoryStateRepository, SampleStore};
use tempfile::tempdir;

use crate::helpers::{noon_utc, sample_at};

async fn scheduler_for(base_dir: &std::path::Path) -> Scheduler {
    let config = Config::for_base_dir(base_dir);
    let state_repo = Box::new(MemoryStateRepository::new());
    Scheduler::new(config, state_repo).await.unwrap()
}

#[tokio::test]
async fn summary_advances_the_date_guard_and_prunes() {
    let dir = tempdir().unwrap();
    let store = SampleStore::new(dir.path().join("samples.jsonl"));

    // Yesterday's observations plus some far-expired ones.
    for latency in [100, 200, 300] {
        store.append(&sample_at(noon_utc(2026, 8, 4), true, true, latency)).unwrap();
    }
    store
        .append(&sample_at(noon_utc(2026, 8, 4) - Duration::days(40), true, true, 999))
        .unwrap();

    let mut scheduler = scheduler_for(dir.path()).await;
    let now = Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap();
    scheduler.run_summary_check(now).await;

    assert_eq!(scheduler.state().last_summary_date, "2026-08-04");

    // The expired record did not survive the post-summary prune; the
    // summarized day's records did.
    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(raw.lines().count(), 3);
    assert!(!raw.contains("999"));
}

#[tokio::test]
async fn summary_runs_at_most_once_per_day() {
    let dir = tempdir().unwrap();
    let store = SampleStore::new(dir.path().join("samples.jsonl"));
    store.append(&sample_at(noon_utc(2026, 8, 4), true, true, 100)).unwrap();

    let mut scheduler = scheduler_for(dir.path()).await;
    let morning = Utc.with_ymd_and_hms(2026, 8, 5, 0, 5, 0).unwrap();
    scheduler.run_summary_check(morning).await;
    assert_eq!(scheduler.state().last_summary_date, "2026-08-04");

    let before = std::fs::metadata(store.path()).unwrap().modified().unwrap();

    let evening = Utc.with_ymd_and_hms(2026, 8, 5, 21, 0, 0).unwrap();
    scheduler.run_summary_check(evening).await;

    // Still the same day recorded and no second rewrite of the log.
    assert_eq!(scheduler.state().last_summary_date, "2026-08-04");
    let after = std::fs::metadata(store.path()).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn empty_day_is_marked_summarized_without_pruning() {
    let dir = tempdir().unwrap();
    let store = SampleStore::new(dir.path().join("samples.jsonl"));

    // Only long-expired records; nothing on the day being summarized.
    store
        .append(&sample_at(noon_utc(2026, 8, 4) - Duration::days(40), true, true, 999))
        .unwrap();

    let mut scheduler = scheduler_for(dir.path()).await;
    let now = Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap();
    scheduler.run_summary_check(now).await;

    // Date guard advanced even though there was nothing to report.
    assert_eq!(scheduler.state().last_summary_date, "2026-08-04");

    // No report means no prune: the expired record is still there.
    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("999"));
}

#[tokio::test]
async fn no_summary_before_five_past_midnight() {
    let dir = tempdir().unwrap();
    let store = SampleStore::new(dir.path().join("samples.jsonl"));
    store.append(&sample_at(noon_utc(2026, 8, 4), true, true, 100)).unwrap();

    let mut scheduler = scheduler_for(dir.path()).await;
    let early = Utc.with_ymd_and_hms(2026, 8, 5, 0, 3, 0).unwrap();
    scheduler.run_summary_check(early).await;

    assert_eq!(scheduler.state().last_summary_date, "");
}
