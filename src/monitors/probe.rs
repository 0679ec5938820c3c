//! HTTP endpoint probing.
//!
//! One probe is a single GET with a bounded timeout. Probe failures are
//! data, not errors: every outcome (including timeouts and connection
//! failures) becomes a [`ProbeResult`] that feeds the samples log and the
//! alert state machine.

use std::time::{Duration, Instant};

use tracing::{instrument, trace, warn};

use crate::{ProbeResult, ProbeStatus};

/// One endpoint to check.
#[derive(Debug, Clone)]
pub struct ProbeTarget {
    /// Short name used in logs ("frontend", "backend").
    pub name: String,

    pub url: String,

    /// Treat HTTP 401 as up. Set for the auth-validation endpoint, where an
    /// absent session is the expected answer, not an outage.
    pub accept_unauthorized: bool,
}

/// Map an HTTP status code to a probe status.
///
/// 200 and 304 are up everywhere; 401 is up only for targets that expect it.
pub fn classify(code: u16, accept_unauthorized: bool) -> ProbeStatus {
    match code {
        200 | 304 => ProbeStatus::Up,
        401 if accept_unauthorized => ProbeStatus::Up,
        _ => ProbeStatus::Down,
    }
}

/// Probe executor. The client is built once with the configured timeout and
/// reused across requests.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Check one target. Always returns a result; latency is wall-clock
    /// elapsed time for the call, recorded on failure as well.
    #[instrument(skip(self, target), fields(target = %target.name))]
    pub async fn probe(&self, target: &ProbeTarget) -> ProbeResult {
        trace!("checking {}", target.url);

        let start = Instant::now();
        let outcome = self.client.get(&target.url).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                let code = response.status().as_u16();
                let status = classify(code, target.accept_unauthorized);
                let error = match status {
                    ProbeStatus::Up => String::new(),
                    ProbeStatus::Down => format!("HTTP {}", response.status()),
                };

                trace!("{}: {status} ({code}) in {latency_ms}ms", target.name);

                ProbeResult {
                    url: target.url.clone(),
                    status,
                    code,
                    latency_ms,
                    error,
                }
            }
            Err(e) => {
                warn!("{}: probe failed: {e}", target.name);

                ProbeResult {
                    url: target.url.clone(),
                    status: ProbeStatus::Down,
                    code: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    latency_ms,
                    error: e.to_string(),
                }
            }
        }
    }
}
