//! Core simulation types: fleet configuration, station state, and run outputs.

use serde::{Deserialize, Serialize};

/// Number of 15-minute intervals per hour.
pub const INTERVALS_PER_HOUR: usize = 4;

/// Number of 15-minute intervals per day.
pub const INTERVALS_PER_DAY: usize = 24 * INTERVALS_PER_HOUR;

/// Days in the simulated year.
pub const DAYS_PER_YEAR: usize = 365;

/// Intervals in one simulated year (35 040).
pub const INTERVALS_PER_YEAR: usize = DAYS_PER_YEAR * INTERVALS_PER_DAY;

/// Duration of one interval in hours.
pub const INTERVAL_HOURS: f64 = 0.25;

/// Share of all stations allowed to charge at the same time.
pub const CONCURRENCY_CAP_SHARE: f64 = 0.5;

/// A homogeneous group of charge points sharing one power rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargePointGroup {
    /// Number of charge points in the group.
    pub count: u32,
    /// Charging power of each charge point (kW).
    pub power_kw: f64,
}

impl ChargePointGroup {
    pub fn new(count: u32, power_kw: f64) -> Self {
        Self { count, power_kw }
    }

    /// Power drawn if every charge point in the group were active (kW).
    pub fn rated_power_kw(&self) -> f64 {
        f64::from(self.count) * self.power_kw
    }
}

/// Total number of stations in a fleet.
pub fn station_count(groups: &[ChargePointGroup]) -> usize {
    groups.iter().map(|g| g.count as usize).sum()
}

/// Sum of `count × power` over all groups (kW).
pub fn theoretical_max_demand_kw(groups: &[ChargePointGroup]) -> f64 {
    groups.iter().map(ChargePointGroup::rated_power_kw).sum()
}

/// Maximum number of simultaneously charging stations for a fleet size.
pub fn concurrency_cap(total_stations: usize) -> usize {
    (total_stations as f64 * CONCURRENCY_CAP_SHARE).floor() as usize
}

/// Mutable per-station state owned by one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationState {
    /// Charging power (kW).
    pub power_kw: f64,
    /// Remaining intervals of the active session; 0 when idle.
    pub remaining_intervals: u32,
}

impl StationState {
    pub fn idle(power_kw: f64) -> Self {
        Self {
            power_kw,
            remaining_intervals: 0,
        }
    }

    pub fn is_charging(&self) -> bool {
        self.remaining_intervals > 0
    }
}

/// Expands groups into individual stations, preserving declaration order.
pub fn expand_stations(groups: &[ChargePointGroup]) -> Vec<StationState> {
    groups
        .iter()
        .flat_map(|g| (0..g.count).map(move |_| StationState::idle(g.power_kw)))
        .collect()
}

/// Timing and intensity parameters for one engine run.
///
/// # Examples
///
/// ```
/// use ev_charge_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::year(100.0);
/// assert_eq!(cfg.interval_count, 35_040);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimConfig {
    /// Number of 15-minute intervals to simulate.
    pub interval_count: usize,
    /// Arrival intensity; 100 is the typical site, 300 applies the raw table.
    pub arrival_multiplier: f64,
}

impl SimConfig {
    pub fn new(interval_count: usize, arrival_multiplier: f64) -> Self {
        Self {
            interval_count,
            arrival_multiplier,
        }
    }

    /// A full-year run.
    pub fn year(arrival_multiplier: f64) -> Self {
        Self::new(INTERVALS_PER_YEAR, arrival_multiplier)
    }

    /// A run covering whole days.
    pub fn days(days: usize, arrival_multiplier: f64) -> Self {
        Self::new(days * INTERVALS_PER_DAY, arrival_multiplier)
    }
}

/// Outcome of one interval of the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub interval: usize,
    /// Power drawn by continuing sessions (kW).
    pub power_kw: f64,
    /// Sessions started in this interval.
    pub charging_events: u32,
    /// Stations charging or newly admitted at the end of the interval.
    pub active_stations: u32,
}

/// Raw time series and running totals produced by one engine run.
///
/// All series are indexed by interval; `charging_values_kw` is indexed by
/// station first, in fleet expansion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationOutput {
    pub power_usage_kw: Vec<f64>,
    pub total_energy_kwh: f64,
    pub actual_max_demand_kw: f64,
    pub charging_events: Vec<u32>,
    pub active_stations: Vec<u32>,
    pub charging_values_kw: Vec<Vec<f64>>,
}

impl SimulationOutput {
    /// The all-empty result returned for an empty fleet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of simulated intervals.
    pub fn interval_count(&self) -> usize {
        self.power_usage_kw.len()
    }

    /// Sessions started over the whole run.
    pub fn total_charging_events(&self) -> u64 {
        self.charging_events.iter().map(|&n| u64::from(n)).sum()
    }
}
