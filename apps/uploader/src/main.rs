mod config;
mod errors;
mod routes;
mod selection;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::selection::registry::SessionRegistry;
use crate::selection::sweeper::SessionSweeper;
use crate::selection::upload::{SimulatedUploader, Uploader};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume uploader v{}", env!("CARGO_PKG_VERSION"));

    let rule = config.validation_rule();
    info!(
        "Validation rule: allowed [{}], max {} bytes",
        rule.allowed_summary(),
        rule.max_size()
    );

    // Simulated upload until a real transfer backend exists
    let simulated = SimulatedUploader::new(config.upload_delay);
    info!(
        "Upload backend: {} ({:?} latency)",
        simulated.backend(),
        simulated.delay()
    );
    let uploader: Arc<dyn Uploader> = Arc::new(simulated);

    let sessions = Arc::new(SessionRegistry::new(rule, uploader));

    // Evict sessions abandoned by closed or crashed clients
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = SessionSweeper::new(
        Arc::clone(&sessions),
        config.session_ttl,
        config.session_sweep_interval,
        shutdown_rx,
    );
    tokio::spawn(sweeper.run());

    let state = AppState {
        config: config.clone(),
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // browser widget is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
