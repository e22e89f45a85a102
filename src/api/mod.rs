//! REST API over a finished simulation report.
//!
//! Provides three GET endpoints:
//! - `/report`: pattern, totals, per-slot breakdown, and savings
//! - `/points`: per-hour points with optional range filtering
//! - `/timeslot`: slot details for a given hour

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::sim::SimulationReport;
use crate::sim::tariff::TariffSchedule;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc`; all data is read-only.
pub struct AppState {
    /// Tariff the report was priced with.
    pub tariff: TariffSchedule,
    /// Report of the completed run.
    pub report: SimulationReport,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(handlers::get_report))
        .route("/points", get(handlers::get_points))
        .route("/timeslot", get(handlers::get_timeslot))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
