//! Banking HTTP server.
//!
//! Configuration comes from the environment (and `.env` when present):
//! see [`banking_web::Config`].

use anyhow::Context;
use banking_core::{
    BankingEnvironment, BankingService, InMemoryLedgerStore, JsonFileLedgerStore, LedgerStore,
    demo_ledger,
};
use banking_web::{AppState, Config, DEFAULT_LOG_FILTER, LogFormat, build_router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_tracing(config.server.log_format);

    info!("Starting banking server");

    let store: Arc<dyn LedgerStore> = match &config.server.ledger_path {
        Some(path) => {
            info!(path = %path.display(), "Using JSON file ledger");
            Arc::new(JsonFileLedgerStore::new(path))
        }
        None => {
            warn!("LEDGER_PATH not set; ledger is in memory and lost on exit");
            Arc::new(InMemoryLedgerStore::new(demo_ledger()))
        }
    };

    let telemetry = config
        .telemetry
        .build_hub()
        .await
        .context("failed to build telemetry sinks")?;

    let service = BankingService::new(BankingEnvironment::new(store, telemetry));
    let mut state = AppState::new(service);

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(error) => warn!(%error, "Metrics recorder not installed; /metrics disabled"),
    }

    let app = build_router(state, config.server.static_dir.as_deref());

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
