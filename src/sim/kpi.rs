//! Post-hoc aggregation of a simulation run.

use std::fmt;

use serde::Serialize;

use crate::tables::EmpiricalTables;

use super::clock::hour_of_day;
use super::types::{ChargePointGroup, DAYS_PER_YEAR, SimulationOutput, theoretical_max_demand_kw};

/// Average number of days in a calendar month.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Headline demand figures for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    /// Demand with every charge point active (kW).
    pub theoretical_max_demand_kw: f64,
    /// Highest interval demand observed (kW).
    pub actual_max_demand_kw: f64,
    /// Energy delivered over the run (kWh).
    pub total_energy_kwh: f64,
    /// `actual / theoretical`, or 0 for a fleet without rated power.
    pub concurrency_factor: f64,
    /// Mean interval demand (kW).
    pub average_power_kw: f64,
    /// First interval reaching the peak, `None` for an empty run.
    pub peak_interval: Option<usize>,
}

impl SimulationSummary {
    /// Computes the summary from the fleet and the engine output.
    pub fn from_output(groups: &[ChargePointGroup], output: &SimulationOutput) -> Self {
        let theoretical = theoretical_max_demand_kw(groups);
        let actual = output.actual_max_demand_kw;

        let series = &output.power_usage_kw;
        let average_power_kw = if series.is_empty() {
            0.0
        } else {
            series.iter().sum::<f64>() / series.len() as f64
        };

        Self {
            theoretical_max_demand_kw: theoretical,
            actual_max_demand_kw: actual,
            total_energy_kwh: output.total_energy_kwh,
            concurrency_factor: concurrency_factor(actual, theoretical),
            average_power_kw,
            peak_interval: series.iter().position(|&p| p == actual),
        }
    }
}

/// Ratio of observed to theoretical peak, defined as 0 when nothing is rated.
pub fn concurrency_factor(actual_kw: f64, theoretical_kw: f64) -> f64 {
    if theoretical_kw > 0.0 {
        actual_kw / theoretical_kw
    } else {
        0.0
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Results ---")?;
        writeln!(
            f,
            "Total energy consumed:             {:.2} kWh",
            self.total_energy_kwh
        )?;
        writeln!(
            f,
            "Theoretical maximum power demand:  {:.2} kW",
            self.theoretical_max_demand_kw
        )?;
        writeln!(
            f,
            "Actual maximum power demand:       {:.2} kW",
            self.actual_max_demand_kw
        )?;
        write!(
            f,
            "Concurrency factor:                {:.2}%",
            self.concurrency_factor * 100.0
        )
    }
}

/// Charging sessions per calendar period, averaged over a 365-day year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChargingEventStats {
    pub total: u64,
    pub daily_average: f64,
    pub weekly_average: f64,
    pub monthly_average: f64,
}

impl ChargingEventStats {
    pub fn from_events(events: &[u32]) -> Self {
        let total: u64 = events.iter().map(|&n| u64::from(n)).sum();
        let daily_average = total as f64 / DAYS_PER_YEAR as f64;
        Self {
            total,
            daily_average,
            weekly_average: daily_average * 7.0,
            monthly_average: daily_average * DAYS_PER_MONTH,
        }
    }
}

impl fmt::Display for ChargingEventStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Charging Events Statistics ---")?;
        writeln!(f, "Total per year:     {} charging", self.total)?;
        writeln!(f, "Average per month:  {:.2} charging", self.monthly_average)?;
        writeln!(f, "Average per week:   {:.2} charging", self.weekly_average)?;
        write!(f, "Average per day:    {:.2} charging", self.daily_average)
    }
}

/// Hour-of-day label for each interval; labels repeat every 24 hours.
pub fn time_labels(tables: &EmpiricalTables, interval_count: usize) -> Vec<String> {
    (0..interval_count)
        .map(|i| tables.time_range(hour_of_day(i)).to_string())
        .collect()
}
