//! Empirical arrival and charging-demand tables.
//!
//! Both tables are declared as CSV (percent-valued probabilities) and parsed
//! once into immutable, ordered vectors. The built-in tables are embedded in
//! the binary; alternative tables can be loaded from disk.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;
use thiserror::Error;

/// Hours covered by the arrival table, one entry per hour of day.
pub const HOURS_PER_DAY: usize = 24;

/// Fixed vehicle consumption used to turn tabulated driving distances into
/// energy demand (kWh per 100 km).
pub const DISTANCE_CONSUMPTION_KWH_PER_100KM: f64 = 18.0;

const BUILTIN_ARRIVAL_CSV: &str = include_str!("../data/arrival_probability.csv");
const BUILTIN_DEMAND_CSV: &str = include_str!("../data/charging_demand.csv");

static BUILTIN: LazyLock<Result<EmpiricalTables, TableError>> = LazyLock::new(|| {
    EmpiricalTables::from_readers(BUILTIN_ARRIVAL_CSV.as_bytes(), BUILTIN_DEMAND_CSV.as_bytes())
});

/// Errors raised while loading an empirical table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("cannot read {table} table \"{path}\": {message}")]
    Io {
        table: &'static str,
        path: String,
        message: String,
    },
    #[error("{table} table is not valid CSV: {message}")]
    Csv {
        table: &'static str,
        message: String,
    },
    #[error("{table} table row {row}: invalid probability \"{value}\"")]
    Probability {
        table: &'static str,
        row: usize,
        value: String,
    },
    #[error("charging demand table row {row}: invalid demand \"{value}\"")]
    Demand { row: usize, value: String },
    #[error("arrival probability table must have 24 rows, got {0}")]
    RowCount(usize),
    #[error("arrival probability table row {row}: expected hour {expected}, got {actual}")]
    HourOrder {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("charging demand table has no rows")]
    EmptyDemand,
}

/// Base probability of a vehicle arriving at an idle charge point during one
/// 15-minute interval of the given hour.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalProbabilityEntry {
    pub hour: u8,
    /// Display label for the hour, e.g. `"08:00 - 09:00"`.
    pub time_range: String,
    /// Fraction in `[0, 1]`.
    pub probability: f64,
}

/// One bucket of the charging-demand probability mass function.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandDistributionEntry {
    /// Probability mass as a fraction.
    pub probability: f64,
    /// Energy demanded by a session in this bucket; 0 means no session.
    pub demand_kwh: f64,
}

#[derive(Debug, Deserialize)]
struct ArrivalRow {
    hour: usize,
    time_range: String,
    probability: String,
}

#[derive(Debug, Deserialize)]
struct DemandRow {
    probability: String,
    demand: String,
}

/// The pair of read-only lookup tables driving the samplers.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalTables {
    arrival: Vec<ArrivalProbabilityEntry>,
    demand: Vec<DemandDistributionEntry>,
}

impl EmpiricalTables {
    /// Returns the tables shipped with the crate, parsed on first use.
    ///
    /// # Errors
    ///
    /// Returns the parse error of the embedded data, which only happens if
    /// the bundled CSV files are broken.
    pub fn builtin() -> Result<&'static Self, TableError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Loads both tables from CSV files on disk.
    ///
    /// # Errors
    ///
    /// Returns a `TableError` if either file cannot be read or fails validation.
    pub fn from_paths(arrival: &Path, demand: &Path) -> Result<Self, TableError> {
        let arrival_csv = read_table("arrival probability", arrival)?;
        let demand_csv = read_table("charging demand", demand)?;
        Self::from_readers(arrival_csv.as_bytes(), demand_csv.as_bytes())
    }

    /// Parses both tables from CSV readers.
    ///
    /// # Errors
    ///
    /// Returns a `TableError` describing the first invalid row.
    pub fn from_readers(arrival: impl Read, demand: impl Read) -> Result<Self, TableError> {
        let arrival = parse_arrival(arrival)?;
        let demand = parse_demand(demand)?;
        Ok(Self { arrival, demand })
    }

    /// Arrival entries indexed by hour of day.
    pub fn arrival(&self) -> &[ArrivalProbabilityEntry] {
        &self.arrival
    }

    /// Demand entries in declaration order.
    pub fn demand(&self) -> &[DemandDistributionEntry] {
        &self.demand
    }

    /// Base arrival probability for an hour of day (taken modulo 24).
    pub fn arrival_probability(&self, hour: usize) -> f64 {
        self.arrival[hour % HOURS_PER_DAY].probability
    }

    /// Display label for an hour of day (taken modulo 24).
    pub fn time_range(&self, hour: usize) -> &str {
        &self.arrival[hour % HOURS_PER_DAY].time_range
    }
}

fn read_table(table: &'static str, path: &Path) -> Result<String, TableError> {
    fs::read_to_string(path).map_err(|e| TableError::Io {
        table,
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_arrival(reader: impl Read) -> Result<Vec<ArrivalProbabilityEntry>, TableError> {
    const TABLE: &str = "arrival probability";

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut entries = Vec::with_capacity(HOURS_PER_DAY);

    for (row, record) in rdr.deserialize::<ArrivalRow>().enumerate() {
        let record = record.map_err(|e| TableError::Csv {
            table: TABLE,
            message: e.to_string(),
        })?;
        if record.hour != row {
            return Err(TableError::HourOrder {
                row,
                expected: row,
                actual: record.hour,
            });
        }
        let probability = parse_percent(&record.probability)
            .filter(|p| (0.0..=1.0).contains(p))
            .ok_or_else(|| TableError::Probability {
                table: TABLE,
                row,
                value: record.probability.clone(),
            })?;
        entries.push(ArrivalProbabilityEntry {
            hour: row as u8,
            time_range: record.time_range,
            probability,
        });
    }

    if entries.len() != HOURS_PER_DAY {
        return Err(TableError::RowCount(entries.len()));
    }
    Ok(entries)
}

fn parse_demand(reader: impl Read) -> Result<Vec<DemandDistributionEntry>, TableError> {
    const TABLE: &str = "charging demand";

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for (row, record) in rdr.deserialize::<DemandRow>().enumerate() {
        let record = record.map_err(|e| TableError::Csv {
            table: TABLE,
            message: e.to_string(),
        })?;
        let probability = parse_percent(&record.probability)
            .filter(|p| *p >= 0.0)
            .ok_or_else(|| TableError::Probability {
                table: TABLE,
                row,
                value: record.probability.clone(),
            })?;
        let demand_kwh = parse_demand_kwh(&record.demand).ok_or_else(|| TableError::Demand {
            row,
            value: record.demand.clone(),
        })?;
        entries.push(DemandDistributionEntry {
            probability,
            demand_kwh,
        });
    }

    if entries.is_empty() {
        return Err(TableError::EmptyDemand);
    }

    let total_pct: f64 = entries.iter().map(|e| e.probability * 100.0).sum();
    if (total_pct - 100.0).abs() > 1e-6 {
        tracing::warn!(
            total_pct,
            "charging demand masses do not sum to 100%, uncovered draws yield no session"
        );
    }
    Ok(entries)
}

/// Parses `"7.5%"` (or a bare `"7.5"`) into the fraction `0.075`.
fn parse_percent(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    value.is_finite().then_some(value / 100.0)
}

/// Parses `"None"` as 0 kWh and `"<km> km"` as the energy for that distance.
fn parse_demand_kwh(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.contains("None") {
        return Some(0.0);
    }
    let km: f64 = raw.split(' ').next()?.parse().ok()?;
    (km.is_finite() && km >= 0.0).then(|| km * DISTANCE_CONSUMPTION_KWH_PER_100KM / 100.0)
}
