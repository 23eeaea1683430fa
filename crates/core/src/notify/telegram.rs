use crate::config::Settings;
use crate::notify::error::NotifyDiagnosticsError;
use crate::notify::Notifier;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const TRANSPORT: &str = "telegram";

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let bot_token = settings.require_telegram_bot_token()?.to_string();
        let chat_id = settings.require_telegram_chat_id()?.to_string();
        let base_url = std::env::var("TELEGRAM_API_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("TELEGRAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(bot_token, chat_id, base_url, Duration::from_secs(timeout_secs))
    }

    pub fn new(
        bot_token: String,
        chat_id: String,
        base_url: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build telegram http client")?;

        Ok(Self {
            http,
            bot_token,
            chat_id,
            base_url,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.bot_token
        )
    }

    fn diagnostics(
        stage: &'static str,
        detail: String,
        raw_body: Option<String>,
    ) -> NotifyDiagnosticsError {
        let raw_response_json = raw_body
            .as_deref()
            .and_then(|b| serde_json::from_str::<serde_json::Value>(b).ok());
        NotifyDiagnosticsError {
            transport: TRANSPORT,
            stage,
            detail,
            raw_body,
            raw_response_json,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        TRANSPORT
    }

    async fn send(&self, text: &str) -> anyhow::Result<()> {
        let req = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        // The URL embeds the bot token, so transport errors are reported without it.
        let res = self
            .http
            .post(self.url())
            .json(&req)
            .send()
            .await
            .map_err(|e| Self::diagnostics("http", e.without_url().to_string(), None))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Self::diagnostics("body", e.without_url().to_string(), None))?;

        if !status.is_success() {
            return Err(Self::diagnostics("http", format!("status={status}"), Some(body)).into());
        }

        let parsed = serde_json::from_str::<SendMessageResponse>(&body).map_err(|e| {
            let detail = format!("invalid sendMessage response: {e}");
            Self::diagnostics("decode", detail, Some(body.clone()))
        })?;
        if !parsed.ok {
            let detail = parsed
                .description
                .unwrap_or_else(|| "ok=false without description".to_string());
            return Err(Self::diagnostics("api", detail, Some(body)).into());
        }

        tracing::debug!(chat_id = %self.chat_id, "telegram message sent");
        Ok(())
    }
}
