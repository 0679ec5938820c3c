//! Host resource sampling.
//!
//! Every read is best-effort: a metric that cannot be determined is
//! reported as 0.0 instead of failing the tick.

use std::path::Path;

use chrono::Utc;
use sysinfo::{Disks, System};
use tracing::instrument;

use crate::ResourceSnapshot;

/// Samples cpu, memory, disk and load for the local host.
///
/// Holds a persistent [`System`] so that successive CPU refreshes one tick
/// apart yield usage deltas over the whole interval. The first snapshot
/// after startup reports 0.0 CPU; every later one is meaningful.
pub struct ResourceSampler {
    sys: System,
}

impl ResourceSampler {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    /// Take one snapshot, stamped with the current UTC instant.
    #[instrument(skip(self))]
    pub fn snapshot(&mut self) -> ResourceSnapshot {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let load = System::load_average();

        ResourceSnapshot {
            timestamp: Utc::now(),
            cpu_percent: self.cpu_percent(),
            mem_percent: self.mem_percent(),
            disk_percent: root_disk_percent(),
            load_avg: [load.one, load.five, load.fifteen],
        }
    }

    fn cpu_percent(&self) -> f64 {
        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            return 0.0;
        }

        let total: f64 = cpus.iter().map(|cpu| cpu.cpu_usage() as f64).sum();
        total / cpus.len() as f64
    }

    fn mem_percent(&self) -> f64 {
        let total = self.sys.total_memory();
        if total == 0 {
            return 0.0;
        }

        100.0 * self.sys.used_memory() as f64 / total as f64
    }
}

impl Default for ResourceSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Usage of the root filesystem, or of the first listed disk on hosts where
/// no mount is reported at `/`.
fn root_disk_percent() -> f64 {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new("/"))
        .or_else(|| disks.list().first());

    let Some(disk) = disk else {
        return 0.0;
    };

    let total = disk.total_space();
    if total == 0 {
        return 0.0;
    }

    100.0 * (total - disk.available_space()) as f64 / total as f64
}
