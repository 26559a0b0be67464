//! CSV export for per-interval series and sweep results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::runner::SimulationReport;
use crate::sim::sweep::SweepPoint;
use crate::sim::window::ViewWindow;

/// Leading columns of the series export; one `station_<n>` column follows per station.
const SERIES_HEADER: &str = "interval,time_range,power_kw,charging_events,active_stations";

const SWEEP_HEADER: &str =
    "charge_points,actual_max_demand_kw,theoretical_max_demand_kw,concurrency_factor";

/// Exports the windowed per-interval series of a run to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(
    report: &SimulationReport,
    window: ViewWindow,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    write_series_csv(report, window, io::BufWriter::new(file))
}

/// Writes the windowed per-interval series of a run as CSV to any writer.
///
/// Station columns are in fleet order. Produces deterministic output for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(
    report: &SimulationReport,
    window: ViewWindow,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let output = &report.output;
    let stations = output.charging_values_kw.len();

    let header = SERIES_HEADER
        .split(',')
        .map(str::to_owned)
        .chain((1..=stations).map(|n| format!("station_{n}")));
    wtr.write_record(header)?;

    let rows = window.slice(&output.power_usage_kw).len();
    for i in 0..rows {
        let mut record = vec![
            i.to_string(),
            report.time_labels.get(i).cloned().unwrap_or_default(),
            format!("{:.4}", output.power_usage_kw[i]),
            output.charging_events[i].to_string(),
            output.active_stations[i].to_string(),
        ];
        record.extend(
            output
                .charging_values_kw
                .iter()
                .map(|series| format!("{:.4}", series[i])),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports sweep results to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_sweep_csv(points: &[SweepPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_sweep_csv(points, io::BufWriter::new(file))
}

/// Writes sweep results as CSV, one row per fleet size.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_sweep_csv(points: &[SweepPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SWEEP_HEADER.split(','))?;

    for p in points {
        wtr.write_record(&[
            p.charge_points.to_string(),
            format!("{:.4}", p.actual_max_demand_kw),
            format!("{:.4}", p.theoretical_max_demand_kw),
            format!("{:.6}", p.concurrency_factor),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
