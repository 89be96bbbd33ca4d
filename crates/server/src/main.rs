use std::future::IntoFuture;

use anyhow::Error as AnyhowError;
use server::{
    AppState,
    config::{ConfigError, ServerConfig},
    http,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, prelude::*};
use utils_assets::{port_file_path, write_port_file};

const GRACEFUL_SHUTDOWN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TaskdeckError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] AnyhowError),
}

#[tokio::main]
async fn main() -> Result<(), TaskdeckError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},db={level},utils_assets={level},utils_jwt={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).expect("Failed to create tracing filter");
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config = ServerConfig::from_env()?;
    let db = db::DBService::new().await?;
    let state = AppState::new(db, config.clone());
    let app_router = http::router(state);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;
    let actual_port = listener.local_addr()?.port();

    // Write port file for CLI discovery, warn on fail
    if let Err(e) = write_port_file(actual_port) {
        tracing::warn!("Failed to write port file: {e}");
    }

    tracing::info!("taskdeckd running on http://{}:{actual_port}", config.host);

    let (shutdown_rx, force_exit_rx) = spawn_shutdown_watchers();

    let server = axum::serve(listener, app_router)
        .with_graceful_shutdown(wait_for_watch_true(shutdown_rx.clone()))
        .into_future();
    tokio::pin!(server);

    let serve_result = tokio::select! {
        res = &mut server => res,
        _ = wait_for_watch_true(force_exit_rx.clone()) => {
            tracing::warn!("Force shutdown requested (second signal), exiting immediately");
            std::process::exit(130);
        }
        _ = shutdown_deadline(shutdown_rx.clone(), GRACEFUL_SHUTDOWN_TIMEOUT) => {
            tracing::warn!(
                "Graceful shutdown timed out after {:?}, exiting immediately",
                GRACEFUL_SHUTDOWN_TIMEOUT
            );
            std::process::exit(130);
        }
    };

    serve_result?;

    // A stale port file would point the CLI at a dead server.
    if let Err(e) = std::fs::remove_file(port_file_path()) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove port file: {e}");
        }
    }

    if *shutdown_rx.borrow() {
        std::process::exit(0);
    }

    Ok(())
}

fn spawn_shutdown_watchers() -> (watch::Receiver<bool>, watch::Receiver<bool>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (force_exit_tx, force_exit_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut shutdown_sent = false;

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(sig) => sig,
                Err(e) => {
                    tracing::error!("Failed to install SIGINT handler: {e}");
                    return;
                }
            };

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sig) => Some(sig),
                Err(e) => {
                    tracing::error!("Failed to install SIGTERM handler: {e}");
                    None
                }
            };

            loop {
                tokio::select! {
                    _ = sigint.recv() => {},
                    _ = async {
                        if let Some(sigterm) = sigterm.as_mut() {
                            sigterm.recv().await;
                        } else {
                            std::future::pending::<()>().await;
                        }
                    } => {},
                }

                if !shutdown_sent {
                    shutdown_sent = true;
                    tracing::info!(
                        "Shutdown signal received, starting graceful shutdown (press Ctrl+C again to force)"
                    );
                    let _ = shutdown_tx.send(true);
                } else {
                    tracing::warn!("Second shutdown signal received, forcing exit");
                    let _ = force_exit_tx.send(true);
                    break;
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                return;
            }

            tracing::info!(
                "Shutdown signal received, starting graceful shutdown (press Ctrl+C again to force)"
            );
            let _ = shutdown_tx.send(true);

            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                return;
            }

            tracing::warn!("Second shutdown signal received, forcing exit");
            let _ = force_exit_tx.send(true);
        }
    });

    (shutdown_rx, force_exit_rx)
}

async fn wait_for_watch_true(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }

        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn shutdown_deadline(rx: watch::Receiver<bool>, timeout: std::time::Duration) {
    wait_for_watch_true(rx).await;
    tokio::time::sleep(timeout).await;
}
