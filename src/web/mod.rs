//! HTTP form shell.
//!
//! Serves the day-trip and multi-day forms, runs each submission through the
//! shared [`TripPlanner`], and hands out exported PDFs.

pub mod handlers;
pub mod page;

use crate::core::planner::TripPlanner;
use crate::core::{CompletionTransport, Storage};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state passed to all request handlers
pub struct AppState<T: CompletionTransport, S: Storage> {
    pub planner: Arc<TripPlanner<T, S>>,
}

impl<T: CompletionTransport, S: Storage> Clone for AppState<T, S> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
        }
    }
}

pub fn router<T, S>(planner: Arc<TripPlanner<T, S>>) -> Router
where
    T: CompletionTransport + 'static,
    S: Storage + 'static,
{
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/day-trip",
            get(handlers::day_trip_form).post(handlers::submit_day_trip::<T, S>),
        )
        .route(
            "/multi-day",
            get(handlers::multi_day_form).post(handlers::submit_multi_day::<T, S>),
        )
        .route("/downloads/:name", get(handlers::download::<T, S>))
        .with_state(AppState { planner })
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves until Ctrl-C or SIGTERM.
pub async fn serve(addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Trip planner listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
    tracing::info!("Shutdown signal received");
}
