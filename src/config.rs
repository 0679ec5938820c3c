use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::trace;

use crate::monitors::probe::ProbeTarget;

const HOST_URL: &str = "HOST_URL";
const BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const CHAT_ID: &str = "TELEGRAM_CHAT_ID";
const INTERVAL_SECONDS: &str = "SITEWATCH_INTERVAL_SECONDS";
const TIMEOUT_SECONDS: &str = "SITEWATCH_TIMEOUT_SECONDS";
const RETENTION_DAYS: &str = "SITEWATCH_RETENTION_DAYS";
const BASE_DIR: &str = "SITEWATCH_BASE_DIR";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_INTERVAL_SECONDS: u64 = 60;
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_RETENTION_DAYS: u32 = 30;
const DEFAULT_BASE_DIR: &str = "/var/lib/sitewatch";

const SAMPLES_FILE: &str = "samples.jsonl";
const STATE_FILE: &str = "state.json";

/// Immutable daemon configuration, read from the environment exactly once at
/// startup and passed into each component. No component reads the
/// environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host both probe URLs are derived from.
    pub host_url: String,

    /// Telegram bot token; notifications are skipped when unset.
    pub bot_token: Option<String>,

    /// Telegram chat id; notifications are skipped when unset.
    pub chat_id: Option<String>,

    /// Sleep between scheduler ticks.
    pub interval: Duration,

    /// Per-probe (and notification) HTTP timeout.
    pub timeout: Duration,

    /// Samples older than this many days are pruned after a daily summary.
    pub retention_days: u32,

    /// Directory holding the samples log and the state file.
    pub base_dir: PathBuf,
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let config = Self {
            host_url: env_or(HOST_URL, DEFAULT_HOST),
            bot_token: std::env::var(BOT_TOKEN).ok(),
            chat_id: std::env::var(CHAT_ID).ok(),
            interval: Duration::from_secs(env_parse_or(INTERVAL_SECONDS, DEFAULT_INTERVAL_SECONDS)),
            timeout: Duration::from_secs(env_parse_or(TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS)),
            retention_days: env_parse_or(RETENTION_DAYS, DEFAULT_RETENTION_DAYS),
            base_dir: PathBuf::from(env_or(BASE_DIR, DEFAULT_BASE_DIR)),
        };
        trace!("loaded config: {config:?}");
        config
    }

    /// The frontend page probe target.
    pub fn frontend_target(&self) -> ProbeTarget {
        ProbeTarget {
            name: "frontend".to_string(),
            url: format!("https://{}/", self.host_url),
            accept_unauthorized: false,
        }
    }

    /// The backend auth-validation probe target. A 401 from this endpoint
    /// means "no session", which is a healthy backend.
    pub fn backend_target(&self) -> ProbeTarget {
        ProbeTarget {
            name: "backend".to_string(),
            url: format!("https://{}/api/auth/validate", self.host_url),
            accept_unauthorized: true,
        }
    }

    pub fn samples_path(&self) -> PathBuf {
        self.base_dir.join(SAMPLES_FILE)
    }

    pub fn state_path(&self) -> PathBuf {
        self.base_dir.join(STATE_FILE)
    }

    /// A configuration suitable for tests: no credentials, files under the
    /// given directory.
    pub fn for_base_dir(base_dir: impl AsRef<Path>) -> Self {
        Self {
            host_url: DEFAULT_HOST.to_string(),
            bot_token: None,
            chat_id: None,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECONDS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            retention_days: DEFAULT_RETENTION_DAYS,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key).map_or(default, |raw| raw.parse().unwrap_or(default))
}
