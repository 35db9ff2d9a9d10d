//! Main entry point for the Frontdesk dashboard API server

use frontdesk_api::build_router;
use frontdesk_core::{Config, context_error, context_error::Result, init_logging};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        // It's okay if .env doesn't exist, just log it at debug level
        eprintln!("Note: .env file not loaded: {e}");
    }

    // Initialize logging first
    init_logging()?;

    // Load configuration
    let config = Config::load().unwrap_or_else(|err| {
        info!("Failed to load config ({}), using defaults", err);
        Config::default()
    });

    info!("╔══════════════════════════════════════════════════════════╗");
    info!(
        "║       Frontdesk Dashboard API Server v{}             ║",
        env!("CARGO_PKG_VERSION")
    );
    info!("╚══════════════════════════════════════════════════════════╝");
    info!(
        "🚀 Starting server on {}:{}",
        config.server.host, config.server.port
    );

    // Build the application router
    info!("🛠️  Building application routes...");
    let app = build_router(config.clone())?
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    if config.api.seed_demo_data {
        info!("🌱 Demo data seeded into the in-memory stores");
    }

    // Create server address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| context_error!("Invalid server address: {}", e))?;

    // Create TCP listener
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| context_error!("Failed to bind to {}: {}", addr, e))?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║                     SERVER READY                         ║");
    info!("╟──────────────────────────────────────────────────────────╢");
    info!("║ 🌐 API:     http://{:12}", addr);
    info!("║ 💚 Health:  http://{:12}/health", addr);
    info!("║ 📚 Docs:    http://{:12}/api/docs", addr);
    info!("╚══════════════════════════════════════════════════════════╝\n");

    // Start the server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| context_error!("Server error: {}", e))?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
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
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
