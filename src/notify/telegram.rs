// src/notify/telegram.rs
// Telegram Bot API `sendMessage`. The bot token is part of the URL, so it is
// stripped from any error before the error can reach a log line.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Notification, Notifier};
use crate::error::NotifyError;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct Reply {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn with_api_base(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Http(e.without_url()))?;
        Ok(Self {
            token: token.into(),
            chat_id: chat_id.into(),
            api_base: api_base.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base.trim_end_matches('/'), self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn target(&self) -> String {
        format!("chat {}", self.chat_id)
    }

    async fn send(&self, note: &Notification) -> Result<(), NotifyError> {
        let text = note.dated_body();
        let resp = self
            .client
            .post(self.endpoint())
            .json(&SendMessage { chat_id: &self.chat_id, text: &text })
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let status = resp.status();
        let reply: Reply = resp.json().await.unwrap_or_default();
        if !status.is_success() || !reply.ok {
            let why = reply.description.unwrap_or_else(|| status.to_string());
            return Err(NotifyError::Rejected(why));
        }
        Ok(())
    }
}
