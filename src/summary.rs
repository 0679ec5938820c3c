//! Daily aggregation of the samples log.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use crate::monitors::uptime::AlertState;
use crate::stats::SeriesStats;
use crate::{ProbeStatus, SampleRecord};

/// Aggregates for one summarized day.
///
/// Latency series only include samples where the respective endpoint was
/// up; memory and disk cover every sample. A series field is `None` when it
/// had no samples (reported as "no data", not as zeros).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total_samples: usize,
    pub frontend_up: usize,
    pub backend_up: usize,
    pub both_up: usize,
    pub frontend_latency: Option<SeriesStats>,
    pub backend_latency: Option<SeriesStats>,
    pub memory: Option<SeriesStats>,
    pub disk: Option<SeriesStats>,
}

impl DailyReport {
    pub fn frontend_uptime(&self) -> f64 {
        self.uptime(self.frontend_up)
    }

    pub fn backend_uptime(&self) -> f64 {
        self.uptime(self.backend_up)
    }

    /// Fraction of samples where both endpoints were up.
    pub fn combined_uptime(&self) -> f64 {
        self.uptime(self.both_up)
    }

    fn uptime(&self, up: usize) -> f64 {
        if self.total_samples == 0 {
            return 0.0;
        }
        100.0 * up as f64 / self.total_samples as f64
    }
}

/// Which day's summary is due at `now`, if any.
///
/// Yesterday becomes due at 00:05 UTC and stays due until
/// `last_summary_date` records it, so a daemon that was down through the
/// early-morning window still produces the summary later that day. The
/// date guard keeps it from ever firing twice.
pub fn summary_due(now: DateTime<Utc>, state: &AlertState) -> Option<NaiveDate> {
    if now.hour() == 0 && now.minute() < 5 {
        return None;
    }

    let yesterday = (now - Duration::days(1)).date_naive();
    if state.last_summary_date == yesterday.to_string() {
        return None;
    }

    Some(yesterday)
}

/// Reduce one day's records into a report. `None` when the day had no
/// samples at all; that is "no data", not an error.
pub fn build_report(
    date: NaiveDate,
    samples: impl Iterator<Item = SampleRecord>,
) -> Option<DailyReport> {
    let mut frontend_latencies = Vec::new();
    let mut backend_latencies = Vec::new();
    let mut memory = Vec::new();
    let mut disk = Vec::new();

    let mut total_samples = 0;
    let mut frontend_up = 0;
    let mut backend_up = 0;
    let mut both_up = 0;

    for sample in samples {
        total_samples += 1;

        let fe_up = sample.frontend.status == ProbeStatus::Up;
        let be_up = sample.backend.status == ProbeStatus::Up;

        if fe_up {
            frontend_up += 1;
            frontend_latencies.push(sample.frontend.latency_ms as f64);
        }
        if be_up {
            backend_up += 1;
            backend_latencies.push(sample.backend.latency_ms as f64);
        }
        if fe_up && be_up {
            both_up += 1;
        }

        memory.push(sample.resources.mem_percent);
        disk.push(sample.resources.disk_percent);
    }

    if total_samples == 0 {
        return None;
    }

    Some(DailyReport {
        date,
        total_samples,
        frontend_up,
        backend_up,
        both_up,
        frontend_latency: SeriesStats::from_values(&frontend_latencies),
        backend_latency: SeriesStats::from_values(&backend_latencies),
        memory: SeriesStats::from_values(&memory),
        disk: SeriesStats::from_values(&disk),
    })
}
