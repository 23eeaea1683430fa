pub mod error;
pub mod telegram;

use crate::domain::signal::SignalRecord;

pub use telegram::TelegramNotifier;

/// Outbound message transport. `Ok` means the message was accepted for delivery.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, text: &str) -> anyhow::Result<()>;
}

/// Logs messages instead of delivering them and always reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunNotifier;

#[async_trait::async_trait]
impl Notifier for DryRunNotifier {
    fn name(&self) -> &'static str {
        "dry_run"
    }

    async fn send(&self, text: &str) -> anyhow::Result<()> {
        tracing::info!(dry_run = true, body = text, "notification not sent");
        Ok(())
    }
}

/// Stand-in when no transport is configured. Every send fails, so nothing is
/// recorded as announced and signals go out once a real transport is wired in.
#[derive(Debug, Clone, Default)]
pub struct DisabledNotifier {
    pub reason: String,
}

#[async_trait::async_trait]
impl Notifier for DisabledNotifier {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn send(&self, _text: &str) -> anyhow::Result<()> {
        anyhow::bail!("notifier disabled: {}", self.reason)
    }
}

/// Telegram HTML message announcing one signal.
pub fn format_signal_message(record: &SignalRecord, source_url: &str) -> String {
    format!(
        "<b>{}</b> — <i>Strong Buy</i>\n24h Change: {}\n24h Volume: {}\nSource: {}",
        escape_html(&record.symbol),
        escape_html(&record.change_24h),
        escape_html(&record.volume_24h),
        escape_html(source_url),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
