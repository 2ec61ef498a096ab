use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use surety_core::config::Config;
use surety_core::tracing::init_tracing;
use surety_portal::config::PortalConfig;
use surety_portal::router::build_router;
use surety_portal::state::AppState;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,tower_http=info");

    let config = PortalConfig::from_env().context("failed to load portal configuration")?;
    info!(?config, "portal configuration loaded");

    let state = AppState::from_config(&config).context("invalid portal configuration")?;

    let access_codes = state.access_code_repo();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = access_codes.purge_expired(Utc::now());
            if purged > 0 {
                info!(purged, "expired access codes purged");
            }
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.portal_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("portal service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
