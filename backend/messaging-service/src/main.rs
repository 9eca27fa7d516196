use anyhow::Context;
use hockey_connect_messaging::config::{Config, StorageBackend};
use hockey_connect_messaging::{build_router, db, logging, AppState};
use resilience::with_timeout_result;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

const MIGRATION_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    logging::init_tracing(config.log_format);
    info!(?config, "starting hockey-connect-messaging");

    let state = match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .context("DATABASE_URL missing")?;
            let pool = db::init_pool(&url)
                .await
                .context("failed to open PostgreSQL pool")?;

            with_timeout_result(MIGRATION_TIMEOUT, db::MIGRATOR.run(&pool))
                .await
                .context("database migrations failed")?;
            info!("database migrations applied");

            AppState::postgres(pool, config.clone())?
        }
        StorageBackend::Memory => {
            info!("using in-memory storage; data is lost on restart");
            AppState::in_memory(config.clone())?
        }
    };

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}
