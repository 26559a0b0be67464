//! Fleet-size sweep producing a concurrency-factor scaling curve.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::tables::EmpiricalTables;

use super::engine::simulate;
use super::kpi::concurrency_factor;
use super::types::{ChargePointGroup, SimConfig, theoretical_max_demand_kw};

/// Result for one fleet size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub charge_points: u32,
    pub actual_max_demand_kw: f64,
    pub theoretical_max_demand_kw: f64,
    pub concurrency_factor: f64,
}

/// Runs single-group fleets of 1..=`max_charge_points` stations.
///
/// Each fleet size gets its own engine and a generator seeded with
/// `seed + size`, so a sweep is reproducible and sizes are independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSweep {
    pub max_charge_points: u32,
    pub power_kw: f64,
    pub config: SimConfig,
    pub seed: u64,
}

impl RangeSweep {
    /// Simulates every fleet size in ascending order.
    pub fn run(&self, tables: &EmpiricalTables) -> Vec<SweepPoint> {
        tracing::info!(
            max_charge_points = self.max_charge_points,
            power_kw = self.power_kw,
            "running fleet-size sweep"
        );
        (1..=self.max_charge_points)
            .map(|n| self.run_size(tables, n))
            .collect()
    }

    fn run_size(&self, tables: &EmpiricalTables, charge_points: u32) -> SweepPoint {
        let groups = [ChargePointGroup::new(charge_points, self.power_kw)];
        let rng = StdRng::seed_from_u64(self.seed.wrapping_add(u64::from(charge_points)));
        let output = simulate(tables, &groups, self.config, rng);
        let theoretical = theoretical_max_demand_kw(&groups);

        SweepPoint {
            charge_points,
            actual_max_demand_kw: output.actual_max_demand_kw,
            theoretical_max_demand_kw: theoretical,
            concurrency_factor: concurrency_factor(output.actual_max_demand_kw, theoretical),
        }
    }
}

/// Tabular rendering of a sweep, one fleet size per line.
pub struct SweepTable<'a>(pub &'a [SweepPoint]);

impl fmt::Display for SweepTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Range Simulation Results ---")?;
        write!(
            f,
            "{:>13}  {:>22}  {:>27}  {:>22}",
            "Charge Points",
            "Actual Max Demand (kW)",
            "Theoretical Max Demand (kW)",
            "Concurrency Factor (%)"
        )?;
        for p in self.0 {
            write!(
                f,
                "\n{:>13}  {:>22.2}  {:>27.2}  {:>22.2}",
                p.charge_points,
                p.actual_max_demand_kw,
                p.theoretical_max_demand_kw,
                p.concurrency_factor * 100.0
            )?;
        }
        Ok(())
    }
}
