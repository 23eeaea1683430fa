//! One scan cycle: fetch, extract, filter, announce new signals, publish snapshot.

pub mod scheduler;

use crate::domain::signal::{NotificationKey, SignalRecord};
use crate::domain::snapshot::ScanSnapshot;
use crate::extract::{filter_strong_buy, SignalExtractor};
use crate::ingest::PageFetcher;
use crate::notify::{format_signal_message, Notifier};
use crate::storage::NotificationLedger;
use crate::time::scan_day;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub use scheduler::Scheduler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub fetch_ok: bool,
    pub found: usize,
    pub notified: usize,
    pub already_notified: usize,
    pub send_failures: usize,
}

pub struct Scanner {
    source_url: String,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn SignalExtractor>,
    notifier: Arc<dyn Notifier>,
    // Held for the whole cycle body, so cycles never overlap.
    ledger: Mutex<NotificationLedger>,
    snapshot: RwLock<Arc<ScanSnapshot>>,
}

impl Scanner {
    pub fn new(
        source_url: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn SignalExtractor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            fetcher,
            extractor,
            notifier,
            ledger: Mutex::new(NotificationLedger::new()),
            snapshot: RwLock::new(Arc::new(ScanSnapshot::default())),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn notifier_name(&self) -> &'static str {
        self.notifier.name()
    }

    /// Result of the most recently completed cycle.
    pub async fn snapshot(&self) -> Arc<ScanSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    pub async fn run_cycle(&self) -> CycleReport {
        self.run_cycle_at(Utc::now()).await
    }

    /// Runs one cycle with `now` as the cycle clock (notification day and `last_run`).
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> CycleReport {
        let mut ledger = self.ledger.lock().await;

        let mut report = CycleReport {
            started_at: now,
            fetch_ok: false,
            found: 0,
            notified: 0,
            already_notified: 0,
            send_failures: 0,
        };

        let fetched = AssertUnwindSafe(self.fetcher.fetch(&self.source_url))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(panicked("fetcher", payload)));
        let filtered = match fetched {
            Ok(markup) => {
                report.fetch_ok = true;
                self.extract_filtered(markup).await
            }
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(url = %self.source_url, %error, "screener fetch failed");
                Vec::new()
            }
        };
        report.found = filtered.len();

        let day = scan_day(now);
        for record in &filtered {
            let key = NotificationKey::for_record(record, day);
            if !ledger.is_new(&key) {
                report.already_notified += 1;
                continue;
            }

            let text = format_signal_message(record, &self.source_url);
            let sent = AssertUnwindSafe(self.notifier.send(&text))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(panicked("notifier", payload)));
            match sent {
                Ok(()) => {
                    tracing::info!(%key, notifier = self.notifier.name(), "signal announced");
                    ledger.mark_notified(key);
                    report.notified += 1;
                }
                Err(err) => {
                    let error = format!("{err:#}");
                    tracing::warn!(
                        %key,
                        notifier = self.notifier.name(),
                        %error,
                        "notification failed; will retry next cycle"
                    );
                    report.send_failures += 1;
                }
            }
        }

        *self.snapshot.write().await = Arc::new(ScanSnapshot::new(now, filtered));

        tracing::info!(
            fetch_ok = report.fetch_ok,
            found = report.found,
            notified = report.notified,
            already_notified = report.already_notified,
            send_failures = report.send_failures,
            ledger_size = ledger.len(),
            "scan cycle complete"
        );
        report
    }

    /// Parsing is CPU-bound and runs on the blocking pool. A panic in the
    /// heuristics costs this cycle's records, not the cycle.
    async fn extract_filtered(&self, markup: String) -> Vec<SignalRecord> {
        let extractor = Arc::clone(&self.extractor);
        let res = tokio::task::spawn_blocking(move || extractor.extract(&markup)).await;
        match res {
            Ok(records) => filter_strong_buy(records),
            Err(err) => {
                tracing::error!(error = %err, "signal extraction aborted");
                Vec::new()
            }
        }
    }
}

/// A panicking collaborator fails its step like an error would.
fn panicked(component: &str, payload: Box<dyn Any + Send>) -> anyhow::Error {
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    anyhow::anyhow!("{component} panicked: {reason}")
}
