//! Simulator entry point: CLI wiring and config-driven run construction.

mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::Level;

use ev_charge_sim::config::ScenarioConfig;
use ev_charge_sim::io::export::{export_series_csv, export_sweep_csv};
use ev_charge_sim::runner::run_simulation;
use ev_charge_sim::sim::sweep::SweepTable;

use crate::cli::Args;

fn load_scenario(args: &Args) -> anyhow::Result<ScenarioConfig> {
    let mut scenario = if let Some(ref path) = args.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(ref name) = args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = args.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(multiplier) = args.multiplier {
        scenario.simulation.arrival_multiplier = multiplier;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            tracing::error!("{e}");
        }
        bail!("invalid scenario ({} errors)", errors.len());
    }
    Ok(scenario)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();

    let scenario = load_scenario(&args)?;
    let tables = scenario.load_tables().context("failed to load tables")?;
    let params = scenario.run_parameters();

    let rng = StdRng::seed_from_u64(scenario.simulation.seed);
    let report = run_simulation(&tables, &params, rng);

    println!("{}", report.summary);
    println!();
    println!("{}", report.event_stats);

    let sweep = if args.run_sweep() {
        let points = scenario.range_sweep().run(&tables);
        println!();
        println!("{}", SweepTable(&points));
        points
    } else {
        Vec::new()
    };

    if let Some(ref path) = args.series_out {
        export_series_csv(&report, args.window, path)
            .with_context(|| format!("failed to write series CSV to {}", path.display()))?;
        tracing::info!(path = %path.display(), window = %args.window, "series written");
    }

    if let Some(ref path) = args.sweep_out {
        export_sweep_csv(&sweep, path)
            .with_context(|| format!("failed to write sweep CSV to {}", path.display()))?;
        tracing::info!(path = %path.display(), "sweep written");
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ev_charge_sim::api::AppState {
            config: params.sim_config(),
            fleet: params.fleet,
            seed: scenario.simulation.seed,
            report,
            sweep,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(ev_charge_sim::api::serve(state, addr))
            .with_context(|| format!("API server on {addr} failed"))?;
    }

    Ok(())
}
