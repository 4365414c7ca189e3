//! TaskHub Server: task tracking API with live session revocation.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{EnvFilter, fmt};

use taskhub_api::{AppState, build_router};
use taskhub_core::config::AppConfig;
use taskhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `TASKHUB_ENV` overlay, and `TASKHUB_*`
/// environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("TASKHUB_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("TASKHUB_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TaskHub v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in default; set TASKHUB_AUTH__JWT_SECRET");
    }

    // ── Step 1: Persistence ──────────────────────────────────────
    let stores = taskhub_database::build_stores(&config.database).await?;
    let db_pool = stores.pool.clone();

    // ── Step 2: Auth, services, realtime ─────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::build(config, stores);
    let realtime = Arc::clone(&state.realtime);

    // ── Step 3: HTTP server ──────────────────────────────────────
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "TaskHub server listening");

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let signalled = Arc::new(Notify::new());
    let on_signal = Arc::clone(&signalled);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        realtime.shutdown();
        on_signal.notify_one();
    });

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            signalled.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Grace period elapsed; dropping open requests");
        }
    }

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("TaskHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
