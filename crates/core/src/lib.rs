pub mod domain;
pub mod extract;
pub mod ingest;
pub mod notify;
pub mod scan;
pub mod storage;
pub mod time;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_SCREENER_URL: &str = "https://www.tradingview.com/cex-screener/";
    pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 300;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub screener_url: String,
        pub telegram_bot_token: Option<String>,
        pub telegram_chat_id: Option<String>,
        pub sentry_dsn: Option<String>,
        pub scan_interval_secs: u64,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let scan_interval_secs = match std::env::var("SCAN_INTERVAL_SECS") {
                Ok(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("SCAN_INTERVAL_SECS is not a number: {s}"))?,
                Err(_) => DEFAULT_SCAN_INTERVAL_SECS,
            };
            anyhow::ensure!(scan_interval_secs > 0, "SCAN_INTERVAL_SECS must be > 0");

            Ok(Self {
                screener_url: std::env::var("SCREENER_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SCREENER_URL.to_string()),
                telegram_bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
                telegram_chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                scan_interval_secs,
            })
        }

        pub fn scan_interval(&self) -> std::time::Duration {
            std::time::Duration::from_secs(self.scan_interval_secs)
        }

        pub fn require_telegram_bot_token(&self) -> anyhow::Result<&str> {
            self.telegram_bot_token
                .as_deref()
                .context("TELEGRAM_BOT_TOKEN is required")
        }

        pub fn require_telegram_chat_id(&self) -> anyhow::Result<&str> {
            self.telegram_chat_id
                .as_deref()
                .context("TELEGRAM_CHAT_ID is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }
}
