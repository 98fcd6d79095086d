use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use redoot::config::config;
use redoot::database::DatabaseManager;
use redoot::state::AppState;
use redoot::{logging, routes, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();
    logging::init();

    let config = config();
    config.validate()?;
    info!("Starting Redoot in {:?} mode", config.environment);

    let store = DatabaseManager::connect(&config.database).await?;
    let state = Arc::new(AppState::new(store.clone(), config)?);

    if config.database.seed_sample_data {
        seed::seed_sample_data(&state).await?;
    }
    let granted = seed::grant_bootstrap_admins(&state, &config.security.bootstrap_admins).await?;
    if granted > 0 {
        info!("Granted administrator rights to {} bootstrap user(s)", granted);
    }

    let app = routes::app(state, config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Redoot listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if config.database.drop_on_shutdown {
        if let Err(e) = DatabaseManager::drop_all(store.as_ref()).await {
            error!("Failed to drop collections on shutdown: {}", e);
        }
    }
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
