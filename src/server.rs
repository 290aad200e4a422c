//! JSON view of the board for web front ends.
//!
//! `GET /api/market` returns the render view; `POST /api/market/refresh`
//! triggers a manual cycle.

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::market::scheduler::{RefreshRequest, Refresher};
use crate::market::state::RenderView;

#[derive(Clone)]
pub struct ServerState {
    refresher: Refresher,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub result: &'static str,
}

pub fn router(refresher: Refresher) -> Router {
    Router::new()
        .route("/api/market", get(market_handler))
        .route("/api/market/refresh", post(refresh_handler))
        .with_state(ServerState { refresher })
}

async fn market_handler(State(state): State<ServerState>) -> Json<RenderView> {
    Json(state.refresher.state().render_view(&chrono::Local))
}

async fn refresh_handler(
    State(state): State<ServerState>,
) -> (StatusCode, Json<RefreshResponse>) {
    let (status, result) = match state.refresher.request_refresh() {
        RefreshRequest::Accepted => (StatusCode::ACCEPTED, "accepted"),
        RefreshRequest::InFlight => (StatusCode::CONFLICT, "in_flight"),
        RefreshRequest::Stopped => (StatusCode::SERVICE_UNAVAILABLE, "stopped"),
    };
    tracing::debug!(result, "Manual refresh via HTTP");
    (status, Json(RefreshResponse { result }))
}

/// Serve until `shutdown` flips to `true` (or its sender goes away).
pub async fn serve(
    listener: TcpListener,
    refresher: Refresher,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(%addr, "JSON view listening");

    axum::serve(listener, router(refresher))
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("JSON view stopped");
    Ok(())
}
