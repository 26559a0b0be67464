//! REST API exposing a completed run.
//!
//! Provides three GET endpoints:
//! - `/summary` for run configuration, demand KPIs and event statistics
//! - `/series` for per-interval records with window and range filtering
//! - `/sweep` for the fleet-size scaling curve

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::runner::SimulationReport;
use crate::sim::sweep::SweepPoint;
use crate::sim::types::{ChargePointGroup, SimConfig};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run (and optional sweep) completes and wrapped in
/// `Arc`; all data is read-only.
pub struct AppState {
    pub config: SimConfig,
    pub fleet: Vec<ChargePointGroup>,
    pub seed: u64,
    pub report: SimulationReport,
    /// Empty unless a sweep was requested.
    pub sweep: Vec<SweepPoint>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/series", get(handlers::get_series))
        .route("/sweep", get(handlers::get_sweep))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
