//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, IntervalRecord, SeriesQuery, SummaryResponse};
use crate::sim::sweep::SweepPoint;
use crate::sim::window::ViewWindow;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// Returns run configuration, demand KPIs and charging-event statistics.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        config: state.config,
        fleet: state.fleet.clone(),
        seed: state.seed,
        summary: state.report.summary.clone(),
        event_stats: state.report.event_stats,
    })
}

/// Returns interval records for a calendar window, optionally narrowed to a range.
///
/// `GET /series` → first day of the run
/// `GET /series?window=week&from=N&to=M` → intervals N..=M of the first week
/// `GET /series?from=10&to=5` or an unknown window → 400 + `ErrorResponse`
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<IntervalRecord>>, ApiError> {
    let window = match query.window.as_deref() {
        Some(name) => name.parse::<ViewWindow>().map_err(bad_request)?,
        None => ViewWindow::default(),
    };
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(bad_request(format!(
            "`from` ({from}) must be <= `to` ({to})"
        )));
    }

    let output = &state.report.output;
    let visible = window.slice(&output.power_usage_kw).len();
    let records: Vec<IntervalRecord> = (from..visible.min(to.saturating_add(1)))
        .map(|i| IntervalRecord {
            interval: i,
            time_range: state.report.time_labels.get(i).cloned().unwrap_or_default(),
            power_kw: output.power_usage_kw[i],
            charging_events: output.charging_events[i],
            active_stations: output.active_stations[i],
            station_kw: output.charging_values_kw.iter().map(|s| s[i]).collect(),
        })
        .collect();

    Ok(Json(records))
}

/// Returns the fleet-size sweep, empty when none was run.
///
/// `GET /sweep` → 200 + `Vec<SweepPoint>` JSON
pub async fn get_sweep(State(state): State<Arc<AppState>>) -> Json<Vec<SweepPoint>> {
    Json(state.sweep.clone())
}
