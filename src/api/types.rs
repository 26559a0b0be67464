//! API response and query types.
//!
//! Series field names match the columns of the CSV series export.

use serde::{Deserialize, Serialize};

use crate::sim::kpi::{ChargingEventStats, SimulationSummary};
use crate::sim::types::{ChargePointGroup, SimConfig};

/// Run configuration together with its aggregate results.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Interval count and arrival intensity of the run.
    pub config: SimConfig,
    /// Charge-point groups in station order.
    pub fleet: Vec<ChargePointGroup>,
    /// Seed the run was generated with.
    pub seed: u64,
    pub summary: SimulationSummary,
    pub event_stats: ChargingEventStats,
}

/// One 15-minute interval of the simulated series.
#[derive(Debug, Serialize)]
pub struct IntervalRecord {
    /// Interval index from the start of the run.
    pub interval: usize,
    /// Hour-of-day label, e.g. `"08:00 - 09:00"`.
    pub time_range: String,
    /// Total fleet power (kW).
    pub power_kw: f64,
    /// Sessions started in this interval.
    pub charging_events: u32,
    /// Stations charging or newly admitted at the end of the interval.
    pub active_stations: u32,
    /// Power per station in fleet order (kW).
    pub station_kw: Vec<f64>,
}

/// Query parameters for `GET /series`.
#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    /// `day`, `week`, `month` or `year`; defaults to `day`.
    pub window: Option<String>,
    /// Inclusive start interval.
    pub from: Option<usize>,
    /// Inclusive end interval.
    pub to: Option<usize>,
}

/// Error body returned with 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
