//! Application entry point and server initialization
//!
//! Loads environment configuration, initializes the database and serves the
//! HTTP API with graceful shutdown.

use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use travelaura::config::Config;
use travelaura::database::{init_db, AppState};
use travelaura::route::create_app;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("travelaura=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();
    let port = config.port;

    let db = match init_db(&config.database_url) {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database {}: {e}", config.database_url);
            return ExitCode::FAILURE;
        }
    };
    info!(database = %config.database_url, "database ready");
    info!(username = %config.admin.username, "static admin login enabled");

    let state = AppState::new(db, config);
    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{port}");
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Server running at http://localhost:{port}");

    // The server keeps running until it receives SIGTERM or SIGINT
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Resolves on Ctrl+C (SIGINT) or, on Unix, SIGTERM
///
/// Open connections finish and in-flight write transactions commit before the
/// process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
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
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    // On non-Unix systems (Windows), only handle Ctrl+C
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server.");
}
