//! Outbound Telegram notifications.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::{error, info, instrument};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Sends plain-text messages (with Markdown emphasis) through the Telegram
/// Bot API.
///
/// When the bot token or chat id is unset the notifier logs the message
/// locally and returns; a misconfigured deployment keeps monitoring instead
/// of failing every tick. Send failures are logged and dropped; an alert
/// whose notification was lost is not retried.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: Option<String>,
        chat_id: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_base: TELEGRAM_API.to_string(),
            bot_token,
            chat_id,
        })
    }

    /// Point the notifier at a different Bot API root (a self-hosted
    /// `telegram-bot-api` server, or a mock in tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Send one message. Never fails the caller.
    #[instrument(skip(self, text))]
    pub async fn send(&self, text: &str) {
        let (Some(bot_token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            info!("skipping notification (Telegram not configured): {text}");
            return;
        };

        let url = format!("{}/bot{bot_token}/sendMessage", self.api_base);
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    info!("sent Telegram notification");
                } else {
                    error!(
                        "Telegram notification failed with status: {}",
                        response.status()
                    );
                }
            }
            Err(e) => {
                error!("failed to send Telegram notification: {e}");
            }
        }
    }
}
