//! Yearly power-demand simulator for fleets of EV charge points.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// CSV export of series and sweep results.
pub mod io {
    pub mod export;
}
pub mod runner;
/// Simulation engine, samplers, aggregation and sweep modules.
pub mod sim;
pub mod tables;

#[cfg(test)]
mod test_rng;
