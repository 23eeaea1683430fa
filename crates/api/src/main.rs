use std::sync::Arc;
use strongbuy_core::config::Settings;
use strongbuy_core::extract::HeuristicExtractor;
use strongbuy_core::ingest::HttpPageFetcher;
use strongbuy_core::notify::{DisabledNotifier, Notifier, TelegramNotifier};
use strongbuy_core::scan::{Scanner, Scheduler};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod routes;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let notifier: Arc<dyn Notifier> = match TelegramNotifier::from_settings(&settings) {
        Ok(telegram) => Arc::new(telegram),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "telegram not configured; signals will not be announced");
            Arc::new(DisabledNotifier {
                reason: format!("{e:#}"),
            })
        }
    };

    let scanner = Arc::new(Scanner::new(
        settings.screener_url.clone(),
        Arc::new(HttpPageFetcher::from_env()?),
        Arc::new(HeuristicExtractor),
        notifier,
    ));
    tracing::info!(
        url = scanner.source_url(),
        notifier = scanner.notifier_name(),
        interval_secs = settings.scan_interval_secs,
        "scanner configured"
    );

    let scheduler = Scheduler::start(Arc::clone(&scanner), settings.scan_interval());

    let app = routes::router(routes::AppState { scanner });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scheduler.stop().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
