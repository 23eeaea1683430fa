use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use strongbuy_core::config::Settings;
use strongbuy_core::extract::HeuristicExtractor;
use strongbuy_core::ingest::{HttpPageFetcher, PageFetcher};
use strongbuy_core::notify::{DryRunNotifier, Notifier, TelegramNotifier};
use strongbuy_core::scan::Scanner;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod local;

/// Runs a single scan cycle and prints what it found.
#[derive(Debug, Parser)]
#[command(name = "strongbuy_worker")]
struct Args {
    /// Screener page to scan. Defaults to SCREENER_URL.
    #[arg(long)]
    url: Option<String>,

    /// Read markup from this file instead of fetching the page.
    #[arg(long)]
    markup_file: Option<PathBuf>,

    /// Log notification messages instead of sending them.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let url = args.url.unwrap_or_else(|| settings.screener_url.clone());

    let fetcher: Arc<dyn PageFetcher> = match &args.markup_file {
        Some(path) => Arc::new(local::FilePageFetcher::new(path)),
        None => Arc::new(HttpPageFetcher::from_env()?),
    };

    let notifier: Arc<dyn Notifier> = if args.dry_run {
        Arc::new(DryRunNotifier)
    } else {
        Arc::new(TelegramNotifier::from_settings(&settings)?)
    };

    let scanner = Scanner::new(url, fetcher, Arc::new(HeuristicExtractor), notifier);
    let report = scanner.run_cycle().await;

    if !report.fetch_ok {
        let err = anyhow::anyhow!("screener fetch failed for {}", scanner.source_url());
        sentry_anyhow::capture_anyhow(&err);
    }

    tracing::info!(
        dry_run = args.dry_run,
        fetch_ok = report.fetch_ok,
        found = report.found,
        notified = report.notified,
        send_failures = report.send_failures,
        "worker run finished"
    );

    let snapshot = scanner.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&snapshot.listing())?);

    anyhow::ensure!(report.fetch_ok, "screener fetch failed; see logs");
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
