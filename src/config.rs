//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::runner::RunParameters;
use crate::sim::sweep::RangeSweep;
use crate::sim::types::{ChargePointGroup, DAYS_PER_YEAR, SimConfig};
use crate::tables::{EmpiricalTables, TableError};

/// Recognised range of the arrival multiplier.
pub const ARRIVAL_MULTIPLIER_RANGE: std::ops::RangeInclusive<f64> = 20.0..=200.0;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length, seed and arrival intensity.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Charge-point groups in station order.
    #[serde(default = "default_fleet")]
    pub fleet: Vec<ChargePointGroup>,
    /// Fleet-size sweep parameters.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Optional replacement tables.
    #[serde(default)]
    pub tables: TablesConfig,
}

/// Run length, seed and arrival intensity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// Number of days to simulate (must be > 0).
    pub days: usize,
    /// Arrival intensity, 100 for a typical site (20–200).
    pub arrival_multiplier: f64,
    /// Vehicle consumption (kWh / 100 km); reserved, not used by the engine.
    pub car_consumption_kwh_per_100km: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            days: DAYS_PER_YEAR,
            arrival_multiplier: 100.0,
            car_consumption_kwh_per_100km: 18.0,
        }
    }
}

fn default_fleet() -> Vec<ChargePointGroup> {
    vec![ChargePointGroup::new(20, 11.0)]
}

/// Fleet-size sweep parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Largest fleet simulated (sizes 1..=N).
    pub max_charge_points: u32,
    /// Power of every swept charge point (kW).
    pub power_kw: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_charge_points: 30,
            power_kw: 11.0,
        }
    }
}

/// Paths to CSV tables replacing the built-in ones. Both or neither.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    pub arrival_probability: Option<PathBuf>,
    pub charging_demand: Option<PathBuf>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field} — {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Twenty 11 kW charge points at typical arrival intensity.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            fleet: default_fleet(),
            sweep: SweepConfig::default(),
            tables: TablesConfig::default(),
        }
    }

    /// Workplace-style site mixing AC and fast DC charge points.
    pub fn mixed_site() -> Self {
        Self {
            fleet: vec![
                ChargePointGroup::new(12, 11.0),
                ChargePointGroup::new(6, 22.0),
                ChargePointGroup::new(2, 50.0),
            ],
            simulation: SimulationConfig {
                arrival_multiplier: 120.0,
                ..SimulationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Busy site at the top of the recognised arrival range.
    pub fn peak_stress() -> Self {
        Self {
            fleet: vec![ChargePointGroup::new(40, 22.0)],
            simulation: SimulationConfig {
                arrival_multiplier: 200.0,
                ..SimulationConfig::default()
            },
            sweep: SweepConfig {
                power_kw: 22.0,
                ..SweepConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "mixed_site", "peak_stress"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "mixed_site" => Ok(Self::mixed_site()),
            "peak_stress" => Ok(Self::peak_stress()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. An empty fleet is
    /// valid and produces an all-zero run.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if !ARRIVAL_MULTIPLIER_RANGE.contains(&s.arrival_multiplier) {
            errors.push(ConfigError::new(
                "simulation.arrival_multiplier",
                format!(
                    "must be in [{}, {}], got {}",
                    ARRIVAL_MULTIPLIER_RANGE.start(),
                    ARRIVAL_MULTIPLIER_RANGE.end(),
                    s.arrival_multiplier
                ),
            ));
        }
        if !(s.car_consumption_kwh_per_100km > 0.0) {
            errors.push(ConfigError::new(
                "simulation.car_consumption_kwh_per_100km",
                "must be > 0",
            ));
        }

        for (i, group) in self.fleet.iter().enumerate() {
            if group.count == 0 {
                errors.push(ConfigError::new(format!("fleet[{i}].count"), "must be > 0"));
            }
            if !(group.power_kw > 0.0 && group.power_kw.is_finite()) {
                errors.push(ConfigError::new(
                    format!("fleet[{i}].power_kw"),
                    "must be a finite value > 0",
                ));
            }
        }

        let sw = &self.sweep;
        if sw.max_charge_points == 0 {
            errors.push(ConfigError::new("sweep.max_charge_points", "must be > 0"));
        }
        if !(sw.power_kw > 0.0 && sw.power_kw.is_finite()) {
            errors.push(ConfigError::new(
                "sweep.power_kw",
                "must be a finite value > 0",
            ));
        }

        let t = &self.tables;
        if t.arrival_probability.is_some() != t.charging_demand.is_some() {
            errors.push(ConfigError::new(
                "tables",
                "arrival_probability and charging_demand must be given together",
            ));
        }

        errors
    }

    /// Parameters for a single run of the configured fleet.
    pub fn run_parameters(&self) -> RunParameters {
        RunParameters {
            fleet: self.fleet.clone(),
            days: self.simulation.days,
            arrival_multiplier: self.simulation.arrival_multiplier,
            car_consumption_kwh_per_100km: self.simulation.car_consumption_kwh_per_100km,
        }
    }

    /// Sweep driver using the scenario's run length, intensity and seed.
    pub fn range_sweep(&self) -> RangeSweep {
        RangeSweep {
            max_charge_points: self.sweep.max_charge_points,
            power_kw: self.sweep.power_kw,
            config: SimConfig::days(self.simulation.days, self.simulation.arrival_multiplier),
            seed: self.simulation.seed,
        }
    }

    /// Loads the configured tables, falling back to the built-in ones.
    ///
    /// # Errors
    ///
    /// Returns a `TableError` if a table cannot be read or parsed.
    pub fn load_tables(&self) -> Result<EmpiricalTables, TableError> {
        match (&self.tables.arrival_probability, &self.tables.charging_demand) {
            (Some(arrival), Some(demand)) => EmpiricalTables::from_paths(arrival, demand),
            _ => EmpiricalTables::builtin().cloned(),
        }
    }
}
