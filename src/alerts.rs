//! Alert and report formatting, dispatched through the Telegram notifier.

use tracing::instrument;

use crate::ProbeResult;
use crate::notify::TelegramNotifier;
use crate::stats::SeriesStats;
use crate::summary::DailyReport;

#[derive(Debug, Clone)]
pub struct AlertManager {
    notifier: TelegramNotifier,
}

impl AlertManager {
    pub fn new(notifier: TelegramNotifier) -> Self {
        Self { notifier }
    }

    /// Fired once on the falling edge, with both probes' last outcomes.
    #[instrument(skip_all)]
    pub async fn send_down_alert(&self, frontend: &ProbeResult, backend: &ProbeResult) {
        let message = self.format_down_alert(frontend, backend);
        self.notifier.send(&message).await;
    }

    /// Fired once on the recovery edge.
    #[instrument(skip_all)]
    pub async fn send_recovery_notice(&self) {
        self.notifier
            .send("✅ *System Recovery Notice*\n\nAll services are back online.")
            .await;
    }

    /// The once-per-day aggregate report.
    #[instrument(skip_all)]
    pub async fn send_daily_report(&self, report: &DailyReport) {
        let message = self.format_daily_report(report);
        self.notifier.send(&message).await;
    }

    fn format_down_alert(&self, frontend: &ProbeResult, backend: &ProbeResult) -> String {
        let mut message = format!(
            "🚨 *System DOWN Alert*\n\nFrontend: {} ({})\nBackend: {} ({})\n",
            frontend.status, frontend.code, backend.status, backend.code
        );

        if !frontend.error.is_empty() {
            message.push_str(&format!("\nFrontend error: {}", frontend.error));
        }
        if !backend.error.is_empty() {
            message.push_str(&format!("\nBackend error: {}", backend.error));
        }

        message
    }

    fn format_daily_report(&self, report: &DailyReport) -> String {
        let mut message = format!("📊 *Daily Monitoring Summary: {}*\n\n", report.date);

        message.push_str("📈 *Uptime*\n");
        message.push_str(&format!("• Frontend: {:.2}%\n", report.frontend_uptime()));
        message.push_str(&format!("• Backend: {:.2}%\n", report.backend_uptime()));
        message.push_str(&format!("• Combined: {:.2}%\n\n", report.combined_uptime()));

        message.push_str("⏱ *Latency (ms)*\n");
        message.push_str(&format!(
            "• Frontend: {}\n",
            format_stats(report.frontend_latency.as_ref())
        ));
        message.push_str(&format!(
            "• Backend: {}\n\n",
            format_stats(report.backend_latency.as_ref())
        ));

        message.push_str("🖥 *Resources*\n");
        message.push_str(&format!(
            "• Mem: {}%\n",
            format_stats(report.memory.as_ref())
        ));
        message.push_str(&format!("• Disk: {}%\n", format_stats(report.disk.as_ref())));

        message
    }
}

fn format_stats(stats: Option<&SeriesStats>) -> String {
    match stats {
        Some(stats) => format!(
            "Avg: {:.1}, Max: {:.1}, p99: {:.1}",
            stats.avg, stats.max, stats.p99
        ),
        None => "N/A".to_string(),
    }
}
