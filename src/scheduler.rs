//! The scheduler loop tying probes, storage, alerting and summaries
//! together.

use chrono::{DateTime, Utc};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, instrument};

use crate::SampleRecord;
use crate::alerts::AlertManager;
use crate::config::Config;
use crate::monitors::probe::{HttpProber, ProbeTarget};
use crate::monitors::resources::ResourceSampler;
use crate::monitors::uptime::{AlertState, UptimeEvaluation};
use crate::notify::TelegramNotifier;
use crate::storage::{SampleStore, StateRepository};
use crate::summary::{build_report, summary_due};

/// Owns the process-wide control flow: one sequential tick per interval,
/// no internal parallelism.
///
/// Every fallible step inside a tick is handled in place: a network error,
/// a disk error or a malformed state file degrades one tick, never the
/// daemon.
pub struct Scheduler {
    config: Config,
    frontend: ProbeTarget,
    backend: ProbeTarget,
    prober: HttpProber,
    sampler: ResourceSampler,
    store: SampleStore,
    state_repo: Box<dyn StateRepository>,
    alerts: AlertManager,
    state: AlertState,
}

impl Scheduler {
    pub async fn new(config: Config, state_repo: Box<dyn StateRepository>) -> anyhow::Result<Self> {
        let prober = HttpProber::new(config.timeout)?;
        let notifier = TelegramNotifier::new(
            config.bot_token.clone(),
            config.chat_id.clone(),
            config.timeout,
        )?;
        let state = state_repo.load().await;

        debug!("loaded alert state: {state:?}");

        Ok(Self {
            frontend: config.frontend_target(),
            backend: config.backend_target(),
            store: SampleStore::new(config.samples_path()),
            sampler: ResourceSampler::new(),
            alerts: AlertManager::new(notifier),
            prober,
            state_repo,
            state,
            config,
        })
    }

    /// Replace the derived probe targets, e.g. to point at a mock server.
    pub fn with_probe_targets(mut self, frontend: ProbeTarget, backend: ProbeTarget) -> Self {
        self.frontend = frontend;
        self.backend = backend;
        self
    }

    pub fn state(&self) -> &AlertState {
        &self.state
    }

    /// Run until the process receives ctrl-c. A tick in progress always
    /// completes before shutdown, so the persisted state is never partial.
    pub async fn run(mut self) {
        debug!(
            "starting scheduler for {} with interval {:?}",
            self.config.host_url, self.config.interval
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }

                _ = tokio::signal::ctrl_c() => {
                    debug!("received shutdown signal");
                    break;
                }
            }
        }

        debug!("scheduler stopped");
    }

    /// One probe-and-record cycle.
    #[instrument(skip(self))]
    pub async fn tick(&mut self) {
        let frontend = self.prober.probe(&self.frontend).await;
        let backend = self.prober.probe(&self.backend).await;
        let resources = self.sampler.snapshot();

        let record = SampleRecord {
            frontend,
            backend,
            resources,
        };

        if let Err(e) = self.store.append(&record) {
            error!("failed to append sample: {e}");
        }

        match self.state.observe(record.both_up()) {
            UptimeEvaluation::WentDown => {
                debug!("failure threshold reached, alerting");
                self.alerts
                    .send_down_alert(&record.frontend, &record.backend)
                    .await;
            }

            UptimeEvaluation::Recovered => {
                debug!("recovery threshold reached, alerting");
                self.alerts.send_recovery_notice().await;
            }

            UptimeEvaluation::Ok | UptimeEvaluation::Failing => {}
        }

        self.run_summary_check(Utc::now()).await;

        if let Err(e) = self.state_repo.save(&self.state).await {
            error!("failed to persist alert state: {e}");
        }
    }

    /// Generate and send yesterday's summary if it is due at `now`, then
    /// prune expired samples. A day with no samples is recorded as
    /// summarized without a report or a prune.
    pub async fn run_summary_check(&mut self, now: DateTime<Utc>) {
        let Some(date) = summary_due(now, &self.state) else {
            return;
        };

        debug!("generating daily summary for {date}");

        let samples = match self.store.samples_for_date(date) {
            Ok(samples) => samples,
            Err(e) => {
                error!("failed to read samples for {date}: {e}");
                return;
            }
        };

        let Some(report) = build_report(date, samples) else {
            debug!("no samples recorded for {date}, skipping report");
            self.state.last_summary_date = date.to_string();
            return;
        };

        self.alerts.send_daily_report(&report).await;
        self.state.last_summary_date = date.to_string();

        match self.store.prune(now.date_naive(), self.config.retention_days) {
            Ok(removed) => debug!("pruned {removed} expired samples"),
            Err(e) => error!("failed to prune samples: {e}"),
        }
    }
}
