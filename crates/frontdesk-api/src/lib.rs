//! REST API server for the receptionist console
//!
//! Serves the dashboard frontend: chat turns against the simulated
//! receptionist, the call log, the appointment book, business settings
//! and the dashboard snapshot. State lives in process memory behind
//! [`AppState`]; the router is plain axum with tracing, compression,
//! CORS and timeout layers.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::AppState;

use axum::Router;
use frontdesk_core::{Config, Result};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

/// Build the application router over fresh state
///
/// Spawns the background session sweeper, so a tokio runtime must be
/// running.
///
/// # Errors
///
/// Returns an error when the configuration fails validation.
pub fn build_router(config: Config) -> Result<Router> {
    let state = Arc::new(AppState::new(config.clone())?);
    state.validate()?;

    spawn_session_cleanup(Arc::clone(&state));

    let mut app = routes::build_router().with_state(Arc::clone(&state));

    if config.api.enable_cors {
        app = app.layer(CorsLayer::permissive());
        info!("CORS enabled in permissive mode");
    }

    Ok(app.layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_seconds,
    ))))
}

/// Sweep expired sessions on the configured interval
fn spawn_session_cleanup(state: Arc<AppState>) {
    let interval_seconds = state.config.session.cleanup_interval_seconds.max(1);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));
        loop {
            ticker.tick().await;
            let removed = state.sessions.cleanup_expired();
            if removed > 0 {
                info!(removed, "expired sessions swept");
            }
        }
    });
}
