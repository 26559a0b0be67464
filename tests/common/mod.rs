//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use ev_charge_sim::runner::{RunParameters, SimulationReport, run_simulation};
use ev_charge_sim::sim::types::ChargePointGroup;
use ev_charge_sim::tables::EmpiricalTables;

/// Built-in arrival and demand tables.
pub fn tables() -> &'static EmpiricalTables {
    EmpiricalTables::builtin().expect("embedded tables should parse")
}

/// Twenty 11 kW charge points.
pub fn baseline_fleet() -> Vec<ChargePointGroup> {
    vec![ChargePointGroup::new(20, 11.0)]
}

/// Mixed AC/DC fleet (12 × 11 kW, 6 × 22 kW, 2 × 50 kW).
pub fn mixed_fleet() -> Vec<ChargePointGroup> {
    vec![
        ChargePointGroup::new(12, 11.0),
        ChargePointGroup::new(6, 22.0),
        ChargePointGroup::new(2, 50.0),
    ]
}

/// Runs a full year of `fleet` at typical arrival intensity.
pub fn run_year(fleet: Vec<ChargePointGroup>, seed: u64) -> SimulationReport {
    run_with(RunParameters::new(fleet, 100.0), seed)
}

/// Runs `params` with a generator seeded from `seed`.
pub fn run_with(params: RunParameters, seed: u64) -> SimulationReport {
    run_simulation(tables(), &params, StdRng::seed_from_u64(seed))
}
