//! Integration tests for full-year runs of the built-in tables.

mod common;

use ev_charge_sim::runner::{RunParameters, SimulationReport};
use ev_charge_sim::sim::types::{
    ChargePointGroup, INTERVAL_HOURS, INTERVALS_PER_YEAR, concurrency_cap, station_count,
};

fn assert_close(a: f64, b: f64, what: &str) {
    assert!(
        (a - b).abs() <= 1e-6 * b.abs().max(1.0),
        "{what}: {a} != {b}"
    );
}

#[test]
fn full_year_produces_every_series() {
    let report = common::run_year(common::baseline_fleet(), 42);
    let out = &report.output;
    assert_eq!(out.interval_count(), INTERVALS_PER_YEAR);
    assert_eq!(out.charging_events.len(), INTERVALS_PER_YEAR);
    assert_eq!(out.active_stations.len(), INTERVALS_PER_YEAR);
    assert_eq!(out.charging_values_kw.len(), 20);
    for series in &out.charging_values_kw {
        assert_eq!(series.len(), INTERVALS_PER_YEAR);
    }
    assert_eq!(report.time_labels.len(), INTERVALS_PER_YEAR);
}

#[test]
fn demand_stays_within_bounds() {
    for fleet in [common::baseline_fleet(), common::mixed_fleet()] {
        let report = common::run_year(fleet, 7);
        let s = &report.summary;
        assert!(s.actual_max_demand_kw >= 0.0);
        assert!(s.actual_max_demand_kw <= s.theoretical_max_demand_kw);
        assert!((0.0..=1.0).contains(&s.concurrency_factor));
        assert!(s.actual_max_demand_kw > 0.0, "a typical year should see charging");
    }
}

#[test]
fn concurrency_cap_is_never_exceeded() {
    let fleet = common::mixed_fleet();
    let cap = concurrency_cap(station_count(&fleet));
    assert_eq!(cap, 10);

    let report = common::run_year(fleet, 3);
    let out = &report.output;
    let charging = |i: usize| {
        out.charging_values_kw
            .iter()
            .filter(|series| series[i] > 0.0)
            .count()
    };
    for i in 0..out.interval_count() {
        let active = out.active_stations[i] as usize;
        assert!(active <= cap, "interval {i}: {active} stations active");
        assert!(charging(i) <= cap, "interval {i}: {} stations charging", charging(i));
        // sessions admitted in an interval draw power from the next one
        if i + 1 < out.interval_count() {
            assert!(charging(i + 1) <= active, "interval {i}");
        }
    }
}

#[test]
fn admitted_sessions_count_before_drawing_power() {
    let report = common::run_year(common::mixed_fleet(), 3);
    let out = &report.output;
    let first = out.charging_events.iter().position(|&e| e > 0);
    assert!(first.is_some(), "a typical year should start sessions");
    let i = first.unwrap_or_default();

    // nothing charged before the first admission
    assert_eq!(out.power_usage_kw[i], 0.0);
    assert_eq!(out.active_stations[i], out.charging_events[i]);
    assert!(out.power_usage_kw[i + 1] > 0.0);
}

#[test]
fn homogeneous_fleet_peaks_at_half_capacity() {
    let report = common::run_year(common::baseline_fleet(), 11);
    assert!(report.summary.actual_max_demand_kw <= 110.0);
    assert!(report.summary.concurrency_factor <= 0.5);
}

#[test]
fn usage_and_energy_match_station_series() {
    let report = common::run_year(common::mixed_fleet(), 21);
    let out = &report.output;

    let mut station_energy = 0.0;
    for i in 0..out.interval_count() {
        let sum: f64 = out.charging_values_kw.iter().map(|s| s[i]).sum();
        assert_close(out.power_usage_kw[i], sum, "interval usage");
        station_energy += sum * INTERVAL_HOURS;
    }
    assert_close(out.total_energy_kwh, station_energy, "total energy");

    let peak = out.power_usage_kw.iter().copied().fold(0.0, f64::max);
    assert_eq!(out.actual_max_demand_kw, peak);
    let peak_interval = report.summary.peak_interval;
    assert_eq!(peak_interval.map(|i| out.power_usage_kw[i]), Some(peak));
}

#[test]
fn station_values_are_zero_or_rated_power() {
    let fleet = common::mixed_fleet();
    let report = common::run_year(fleet.clone(), 5);
    let powers: Vec<f64> = fleet
        .iter()
        .flat_map(|g| std::iter::repeat_n(g.power_kw, g.count as usize))
        .collect();
    for (series, power) in report.output.charging_values_kw.iter().zip(&powers) {
        assert!(series.iter().all(|v| *v == 0.0 || v == power));
    }
}

#[test]
fn seeded_runs_are_identical() {
    let a = common::run_year(common::baseline_fleet(), 99);
    let b = common::run_year(common::baseline_fleet(), 99);
    assert_eq!(a, b);

    let c = common::run_year(common::baseline_fleet(), 100);
    assert_ne!(a.output.power_usage_kw, c.output.power_usage_kw);
}

#[test]
fn empty_fleet_yields_empty_report() {
    let report = common::run_year(Vec::new(), 1);
    assert_eq!(report, SimulationReport::empty());
    assert_eq!(report.summary.concurrency_factor, 0.0);
    assert_eq!(report.event_stats.total, 0);
}

#[test]
fn single_station_never_charges() {
    let report = common::run_year(vec![ChargePointGroup::new(1, 11.0)], 8);
    assert_eq!(report.summary.theoretical_max_demand_kw, 11.0);
    assert!(
        report
            .output
            .power_usage_kw
            .iter()
            .all(|v| *v == 0.0 || *v == 11.0)
    );
    assert_eq!(report.summary.actual_max_demand_kw, 0.0);
    assert_eq!(report.event_stats.total, 0);
}

#[test]
fn event_statistics_follow_the_series() {
    let report = common::run_year(common::baseline_fleet(), 13);
    let total: u64 = report
        .output
        .charging_events
        .iter()
        .map(|e| u64::from(*e))
        .sum();
    let stats = report.event_stats;
    assert_eq!(stats.total, total);
    assert_close(stats.daily_average, total as f64 / 365.0, "daily average");
    assert_close(stats.weekly_average, stats.daily_average * 7.0, "weekly average");
    assert_close(stats.monthly_average, stats.daily_average * 30.44, "monthly average");
}

#[test]
fn higher_multiplier_means_more_sessions() {
    let quiet = common::run_with(RunParameters::new(common::baseline_fleet(), 20.0), 4);
    let busy = common::run_with(RunParameters::new(common::baseline_fleet(), 200.0), 4);
    assert!(busy.event_stats.total > quiet.event_stats.total);
    assert!(busy.output.total_energy_kwh > quiet.output.total_energy_kwh);
}
