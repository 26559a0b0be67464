//! Per-interval charge-point state machine.

use rand::Rng;

use crate::tables::EmpiricalTables;

use super::clock::Clock;
use super::sampler::{ArrivalSampler, DemandSampler};
use super::types::{
    ChargePointGroup, INTERVAL_HOURS, SimConfig, SimulationOutput, StationState, StepResult,
    concurrency_cap, expand_stations,
};

/// Simulation engine owning the station states, samplers, and random source.
///
/// Stations are kept in fleet expansion order. That order is load-bearing:
/// when the concurrency cap binds, idle stations with lower indices are
/// offered arrivals first.
pub struct Engine<'t, R: Rng> {
    config: SimConfig,
    clock: Clock,
    stations: Vec<StationState>,
    cap: usize,
    arrivals: ArrivalSampler<'t>,
    demand: DemandSampler<'t>,
    rng: R,
    output: SimulationOutput,
}

impl<'t, R: Rng> Engine<'t, R> {
    /// Creates an engine for one run.
    ///
    /// # Arguments
    ///
    /// * `tables` - Arrival and demand tables
    /// * `groups` - Fleet, expanded into stations in declaration order
    /// * `config` - Interval count and arrival multiplier
    /// * `rng` - Random source; seed it for reproducible runs
    pub fn new(
        tables: &'t EmpiricalTables,
        groups: &[ChargePointGroup],
        config: SimConfig,
        rng: R,
    ) -> Self {
        let stations = expand_stations(groups);
        let cap = concurrency_cap(stations.len());
        let n = config.interval_count;
        let output = SimulationOutput {
            power_usage_kw: Vec::with_capacity(n),
            charging_events: Vec::with_capacity(n),
            active_stations: Vec::with_capacity(n),
            charging_values_kw: vec![Vec::with_capacity(n); stations.len()],
            ..SimulationOutput::default()
        };

        Self {
            config,
            clock: Clock::new(n),
            stations,
            cap,
            arrivals: ArrivalSampler::new(tables, config.arrival_multiplier),
            demand: DemandSampler::new(tables),
            rng,
            output,
        }
    }

    /// Executes the next interval, or returns `None` once all are done.
    ///
    /// 1. Continuing sessions draw power and count towards concurrency.
    /// 2. Idle stations are offered arrivals in index order until the cap is
    ///    reached. An arrival whose sampled demand is zero starts nothing.
    /// 3. The interval's usage is recorded and the running peak updated.
    pub fn step(&mut self) -> Option<StepResult> {
        let interval = self.clock.tick()?;
        let mut power_kw = 0.0;
        let mut active = 0_usize;

        for (station, series) in self
            .stations
            .iter_mut()
            .zip(self.output.charging_values_kw.iter_mut())
        {
            if station.is_charging() {
                station.remaining_intervals -= 1;
                power_kw += station.power_kw;
                self.output.total_energy_kwh += station.power_kw * INTERVAL_HOURS;
                series.push(station.power_kw);
                active += 1;
            } else {
                series.push(0.0);
            }
        }

        let p = self.arrivals.probability(interval);
        let mut events = 0_u32;
        for station in &mut self.stations {
            if active >= self.cap {
                break;
            }
            if station.is_charging() || !ArrivalSampler::arrives(&mut self.rng, p) {
                continue;
            }
            let demand_kwh = self.demand.sample(&mut self.rng);
            if demand_kwh > 0.0 {
                station.remaining_intervals = session_intervals(demand_kwh, station.power_kw);
                events += 1;
                active += 1;
            }
        }

        self.output.power_usage_kw.push(power_kw);
        self.output.charging_events.push(events);
        self.output.active_stations.push(active as u32);
        self.output.actual_max_demand_kw = self.output.actual_max_demand_kw.max(power_kw);

        Some(StepResult {
            interval,
            power_kw,
            charging_events: events,
            active_stations: active as u32,
        })
    }

    /// Executes all intervals and returns the collected series.
    ///
    /// An empty fleet returns the empty output without drawing any random
    /// numbers.
    pub fn run(mut self) -> SimulationOutput {
        if self.stations.is_empty() {
            return SimulationOutput::empty();
        }

        tracing::debug!(
            stations = self.stations.len(),
            cap = self.cap,
            intervals = self.config.interval_count,
            multiplier = self.config.arrival_multiplier,
            "simulation started"
        );

        while self.step().is_some() {}

        tracing::debug!(
            total_energy_kwh = self.output.total_energy_kwh,
            actual_max_demand_kw = self.output.actual_max_demand_kw,
            events = self.output.total_charging_events(),
            "simulation finished"
        );
        self.output
    }

    /// Current station states in index order.
    pub fn stations(&self) -> &[StationState] {
        &self.stations
    }

    /// Maximum number of simultaneously charging stations.
    pub fn concurrency_cap(&self) -> usize {
        self.cap
    }
}

/// Number of whole intervals needed to deliver `demand_kwh` at `power_kw`.
pub fn session_intervals(demand_kwh: f64, power_kw: f64) -> u32 {
    (demand_kwh / (power_kw * INTERVAL_HOURS)).ceil() as u32
}

/// Runs a fleet through the engine in one call.
pub fn simulate<R: Rng>(
    tables: &EmpiricalTables,
    groups: &[ChargePointGroup],
    config: SimConfig,
    rng: R,
) -> SimulationOutput {
    Engine::new(tables, groups, config, rng).run()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::test_rng::ScriptedRng;

    fn tables() -> &'static EmpiricalTables {
        EmpiricalTables::builtin().expect("embedded tables should parse")
    }

    // Hour 0 arrival probability at multiplier 100 is 0.005, so a 0.0 draw
    // admits and the fallback draw never does. A 0.6 demand draw lands in the
    // 20 km bucket: 3.6 kWh, two intervals at 11 kW.
    const ADMIT: f64 = 0.0;
    const DEMAND_3_6_KWH: f64 = 0.6;
    const DEMAND_NONE: f64 = 0.1;

    #[test]
    fn session_length_rounds_up() {
        assert_eq!(session_intervals(3.6, 11.0), 2);
        assert_eq!(session_intervals(2.75, 11.0), 1);
        assert_eq!(session_intervals(18.0, 22.0), 4);
    }

    #[test]
    fn admitted_session_charges_from_next_interval() {
        let mut rng = ScriptedRng::new(&[ADMIT, DEMAND_3_6_KWH]);
        let groups = [ChargePointGroup::new(2, 11.0)];
        let out = simulate(tables(), &groups, SimConfig::new(8, 100.0), &mut rng);

        assert_eq!(out.power_usage_kw, vec![0.0, 11.0, 11.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(out.charging_events, vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(out.active_stations, vec![1, 1, 1, 0, 0, 0, 0, 0]);
        assert_eq!(out.charging_values_kw[0][1], 11.0);
        assert!(out.charging_values_kw[1].iter().all(|&v| v == 0.0));
        assert_eq!(out.total_energy_kwh, 5.5);
        assert_eq!(out.actual_max_demand_kw, 11.0);
        // 2 draws at t0, none while the cap binds, then 2 per interval for t3..t7
        assert_eq!(rng.draws, 12);
    }

    #[test]
    fn zero_demand_arrival_keeps_cap_slot_free() {
        let mut rng = ScriptedRng::new(&[ADMIT, DEMAND_NONE, ADMIT, DEMAND_3_6_KWH]);
        let groups = [ChargePointGroup::new(2, 11.0)];
        let out = simulate(tables(), &groups, SimConfig::new(4, 100.0), &mut rng);

        assert_eq!(out.charging_events[0], 1);
        assert!(out.charging_values_kw[0].iter().all(|&v| v == 0.0));
        assert_eq!(out.charging_values_kw[1], vec![0.0, 11.0, 11.0, 0.0]);
    }

    #[test]
    fn cap_favours_lower_station_indices() {
        let script = [ADMIT, DEMAND_3_6_KWH, ADMIT, DEMAND_3_6_KWH];
        let mut rng = ScriptedRng::new(&script);
        let groups = [ChargePointGroup::new(4, 11.0)];
        let out = simulate(tables(), &groups, SimConfig::new(2, 100.0), &mut rng);

        assert_eq!(out.charging_events[0], 2);
        assert_eq!(out.charging_values_kw[0][1], 11.0);
        assert_eq!(out.charging_values_kw[1][1], 11.0);
        assert_eq!(out.charging_values_kw[2][1], 0.0);
        assert_eq!(out.charging_values_kw[3][1], 0.0);
        // Stations 2 and 3 were never offered an arrival at t0, and t1 is capped
        assert_eq!(rng.draws, 4);
    }

    #[test]
    fn empty_fleet_draws_nothing() {
        let mut rng = ScriptedRng::new(&[]);
        let out = simulate(tables(), &[], SimConfig::year(100.0), &mut rng);
        assert_eq!(out, SimulationOutput::empty());
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn single_station_is_always_capped() {
        let mut rng = ScriptedRng::new(&[]);
        let groups = [ChargePointGroup::new(1, 11.0)];
        let engine = Engine::new(tables(), &groups, SimConfig::days(1, 200.0), &mut rng);
        assert_eq!(engine.concurrency_cap(), 0);

        let out = engine.run();
        assert_eq!(out.interval_count(), 96);
        assert!(out.power_usage_kw.iter().all(|&p| p == 0.0));
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn step_returns_none_after_last_interval() {
        let groups = [ChargePointGroup::new(4, 11.0)];
        let mut engine = Engine::new(
            tables(),
            &groups,
            SimConfig::new(3, 100.0),
            StdRng::seed_from_u64(1),
        );
        let intervals: Vec<usize> = std::iter::from_fn(|| engine.step())
            .map(|s| s.interval)
            .collect();
        assert_eq!(intervals, vec![0, 1, 2]);
        assert!(engine.step().is_none());
        assert_eq!(engine.stations().len(), 4);
    }

    #[test]
    fn seeded_runs_are_identical() {
        let groups = [ChargePointGroup::new(10, 11.0), ChargePointGroup::new(3, 22.0)];
        let cfg = SimConfig::days(30, 150.0);
        let a = simulate(tables(), &groups, cfg, StdRng::seed_from_u64(7));
        let b = simulate(tables(), &groups, cfg, StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn energy_matches_charging_values() {
        let groups = [ChargePointGroup::new(12, 11.0)];
        let out = simulate(
            tables(),
            &groups,
            SimConfig::days(60, 120.0),
            StdRng::seed_from_u64(3),
        );
        let from_series: f64 = out
            .charging_values_kw
            .iter()
            .flatten()
            .map(|kw| kw * INTERVAL_HOURS)
            .sum();
        assert!(out.total_energy_kwh > 0.0);
        assert!((out.total_energy_kwh - from_series).abs() < 1e-6);
    }
}
