//! Arrival and charging-demand samplers over the empirical tables.

use rand::Rng;

use crate::tables::{ArrivalProbabilityEntry, DemandDistributionEntry, EmpiricalTables};

use super::clock::hour_of_day;

/// Multiplier that reproduces the raw table probabilities.
///
/// The default site intensity of 100 therefore applies one third of the
/// tabulated probability.
pub const ARRIVAL_MULTIPLIER_SCALE: f64 = 300.0;

/// Per-interval arrival probability for an idle charge point.
#[derive(Debug, Clone, Copy)]
pub struct ArrivalSampler<'t> {
    table: &'t [ArrivalProbabilityEntry],
    multiplier: f64,
}

impl<'t> ArrivalSampler<'t> {
    pub fn new(tables: &'t EmpiricalTables, multiplier: f64) -> Self {
        Self {
            table: tables.arrival(),
            multiplier,
        }
    }

    /// Bernoulli arrival probability for the hour containing `interval`.
    ///
    /// Not clamped: multipliers above the scale can exceed 1, which simply
    /// makes every draw succeed.
    pub fn probability(&self, interval: usize) -> f64 {
        self.table[hour_of_day(interval)].probability * (self.multiplier / ARRIVAL_MULTIPLIER_SCALE)
    }

    /// Draws whether a vehicle arrives with probability `p`.
    pub fn arrives<R: Rng>(rng: &mut R, p: f64) -> bool {
        rng.random::<f64>() < p
    }
}

/// Inverse-CDF sampler over the charging-demand distribution.
#[derive(Debug, Clone, Copy)]
pub struct DemandSampler<'t> {
    table: &'t [DemandDistributionEntry],
}

impl<'t> DemandSampler<'t> {
    pub fn new(tables: &'t EmpiricalTables) -> Self {
        Self {
            table: tables.demand(),
        }
    }

    /// Draws one session's energy demand in kWh.
    ///
    /// Entries are scanned in declaration order and the first bucket whose
    /// cumulative percentage reaches the draw wins. A draw beyond the last
    /// bucket yields 0 (no session).
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let draw = rng.random::<f64>() * 100.0;
        let mut cumulative = 0.0;
        for entry in self.table {
            cumulative += entry.probability * 100.0;
            if draw <= cumulative {
                return entry.demand_kwh;
            }
        }
        0.0
    }
}
