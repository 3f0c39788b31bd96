//! MPC-HC Control
//!
//! Polls one MPC-HC web interface and exposes its media player and remote
//! entities over HTTP.

use mpc_hc_control::{adapters, api, bus, config};

use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mpc_hc_control=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting MPC-HC Control v{} ({})",
        env!("MPCHC_VERSION"),
        env!("MPCHC_GIT_SHA")
    );

    let config = config::load_config()?;
    tracing::info!("Configuration loaded, port: {}", config.port);

    let player_config = config.player.clone().ok_or_else(|| {
        anyhow!("No MPC-HC player configured (set MPC_HOST or [player] host in config)")
    })?;
    let base_url = player_config.base_url()?;

    // Unreachable at startup is not fatal; the poller keeps trying
    match adapters::client::validate_connection(&base_url).await {
        Ok(()) => tracing::info!("MPC-HC reachable at {}", base_url),
        Err(e) => tracing::warn!("{}", e),
    }

    let bus = bus::create_bus();

    let player = Arc::new(adapters::MpcHcMediaPlayer::new(
        player_config.name.clone(),
        &base_url,
        bus.clone(),
    ));
    let remote = Arc::new(adapters::MpcHcRemote::new(
        player_config.name.clone(),
        &base_url,
        bus.clone(),
    ));
    tracing::info!("Entities created for {} ({})", player_config.name, base_url);

    let shutdown = CancellationToken::new();
    let poller = adapters::PollHandle::new(
        player.clone(),
        Duration::from_secs(config.poll_interval_secs.max(1)),
        shutdown.clone(),
    )
    .spawn();

    let state = api::AppState::new(player, remote, bus);
    let app = api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Stopping poller...");
    shutdown.cancel();
    if let Err(e) = poller.await {
        tracing::warn!("Poller task ended abnormally: {}", e);
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
