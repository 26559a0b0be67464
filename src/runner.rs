//! Single-run entry point bundling engine output with its aggregates.

use rand::Rng;
use serde::Serialize;

use crate::sim::engine::simulate;
use crate::sim::kpi::{ChargingEventStats, SimulationSummary, time_labels};
use crate::sim::types::{ChargePointGroup, DAYS_PER_YEAR, SimConfig, SimulationOutput};
use crate::tables::EmpiricalTables;

/// Inputs of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub fleet: Vec<ChargePointGroup>,
    /// Simulated days; a full year unless shortened for quick runs.
    pub days: usize,
    pub arrival_multiplier: f64,
    /// Accepted for a future distance-based demand model; not used by the engine.
    pub car_consumption_kwh_per_100km: f64,
}

impl RunParameters {
    pub fn new(fleet: Vec<ChargePointGroup>, arrival_multiplier: f64) -> Self {
        Self {
            fleet,
            days: DAYS_PER_YEAR,
            arrival_multiplier,
            car_consumption_kwh_per_100km: 18.0,
        }
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig::days(self.days, self.arrival_multiplier)
    }

    pub fn interval_count(&self) -> usize {
        self.sim_config().interval_count
    }
}

/// Everything a run hands to its consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationReport {
    pub output: SimulationOutput,
    pub summary: SimulationSummary,
    pub event_stats: ChargingEventStats,
    /// Hour-of-day label for every interval.
    pub time_labels: Vec<String>,
}

impl SimulationReport {
    /// Report for a fleet without charge points.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Simulates the configured fleet and aggregates the result.
pub fn run_simulation<R: Rng>(
    tables: &EmpiricalTables,
    params: &RunParameters,
    rng: R,
) -> SimulationReport {
    if params.fleet.is_empty() {
        return SimulationReport::empty();
    }

    let output = simulate(tables, &params.fleet, params.sim_config(), rng);
    let summary = SimulationSummary::from_output(&params.fleet, &output);
    let event_stats = ChargingEventStats::from_events(&output.charging_events);
    let time_labels = time_labels(tables, output.interval_count());

    tracing::info!(
        stations = output.charging_values_kw.len(),
        intervals = output.interval_count(),
        actual_max_demand_kw = summary.actual_max_demand_kw,
        concurrency_factor = summary.concurrency_factor,
        "simulation complete"
    );

    SimulationReport {
        output,
        summary,
        event_stats,
        time_labels,
    }
}
