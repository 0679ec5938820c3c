pub mod alerts;
pub mod config;
pub mod monitors;
pub mod notify;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod summary;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single endpoint check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Up,
    Down,
}

impl ProbeStatus {
    pub fn is_up(self) -> bool {
        matches!(self, ProbeStatus::Up)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "UP"),
            ProbeStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// Normalized result of one HTTP probe. Immutable after creation.
///
/// `code` is 0 when no HTTP response was received (timeout, connection or
/// DNS failure); `error` is empty on success. `latency_ms` is wall-clock
/// elapsed time for the call, recorded even on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    pub status: ProbeStatus,
    pub code: u16,
    pub latency_ms: u64,
    #[serde(default)]
    pub error: String,
}

/// Host resource utilization at one instant. All percentages in [0, 100],
/// best-effort: a metric that could not be read is 0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub disk_percent: f64,
    pub load_avg: [f64; 3],
}

/// One scheduler tick's observation: both probes plus the resource snapshot.
///
/// The permanent unit of the samples log. Append order is chronological
/// order; the date portion of `resources.timestamp` (UTC) is the source of
/// truth for date bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    pub frontend: ProbeResult,
    pub backend: ProbeResult,
    pub resources: ResourceSnapshot,
}

impl SampleRecord {
    /// Whether both endpoints were up on this tick.
    pub fn both_up(&self) -> bool {
        self.frontend.status.is_up() && self.backend.status.is_up()
    }
}
