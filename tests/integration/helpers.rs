//! Helper functions for integration tests

use chrono::{DateTime, TimeZone, Utc};
use sitewatch::{ProbeResult, ProbeStatus, ResourceSnapshot, SampleRecord};

pub fn probe_result(up: bool, latency_ms: u64) -> ProbeResult {
    ProbeResult {
        url: "https://localhost/".to_string(),
        status: if up { ProbeStatus::Up } else { ProbeStatus::Down },
        code: if up { 200 } else { 503 },
        latency_ms,
        error: if up {
            String::new()
        } else {
            "HTTP 503 Service Unavailable".to_string()
        },
    }
}

pub fn sample_at(
    timestamp: DateTime<Utc>,
    fe_up: bool,
    be_up: bool,
    latency_ms: u64,
) -> SampleRecord {
    SampleRecord {
        frontend: probe_result(fe_up, latency_ms),
        backend: probe_result(be_up, latency_ms),
        resources: ResourceSnapshot {
            timestamp,
            cpu_percent: 12.5,
            mem_percent: 55.0,
            disk_percent: 42.0,
            load_avg: [0.4, 0.3, 0.2],
        },
    }
}

pub fn noon_utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}
