use crate::scan::Scanner;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Drives [`Scanner::run_cycle`] once immediately and then every `period`.
///
/// Each cycle is awaited before the next tick is taken, so the scheduler never
/// overlaps itself; slow cycles push later ticks back instead of bursting.
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    pub fn start(scanner: Arc<Scanner>, period: Duration) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(scanner, period, rx));
        tracing::info!(period_secs = period.as_secs_f64(), "scan scheduler started");
        Self { shutdown, handle }
    }

    /// Signals the loop to exit and waits for it; an in-flight cycle finishes first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.handle.await {
            tracing::error!(error = %err, "scan scheduler task failed");
        }
        tracing::info!("scan scheduler stopped");
    }
}

async fn run_loop(scanner: Arc<Scanner>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut tick = tokio::time::interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = tick.tick() => {
                let scanner = Arc::clone(&scanner);
                // A panicking cycle must not take the schedule down with it.
                if let Err(err) = tokio::spawn(async move { scanner.run_cycle().await }).await {
                    tracing::error!(error = %err, "scan cycle aborted");
                }
            }
        }
    }
}
