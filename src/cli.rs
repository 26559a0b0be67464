//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use ev_charge_sim::sim::window::ViewWindow;

/// Yearly power-demand simulator for a fleet of EV charge points.
///
/// Without `--scenario` or `--preset` the baseline preset is used.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Load scenario from a TOML config file.
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, mixed_site, peak_stress).
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the arrival multiplier (20 to 200, 100 is typical).
    #[arg(long)]
    pub multiplier: Option<f64>,

    /// Export the per-interval series to CSV.
    #[arg(long)]
    pub series_out: Option<PathBuf>,

    /// Calendar window of the exported series.
    #[arg(long, default_value = "day")]
    pub window: ViewWindow,

    /// Also simulate fleet sizes 1..=N and print the scaling table.
    #[arg(long)]
    pub sweep: bool,

    /// Export the sweep to CSV (implies `--sweep`).
    #[arg(long)]
    pub sweep_out: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Start the REST API server after the run.
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl Args {
    pub fn run_sweep(&self) -> bool {
        self.sweep || self.sweep_out.is_some()
    }
}
