//! Calendar windows over per-interval series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::INTERVALS_PER_DAY;

/// Leading slice of a run shown for a calendar period.
///
/// A month is always taken as 31 days from the start of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewWindow {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl ViewWindow {
    pub const ALL: [Self; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    /// Number of leading intervals covered, `None` for the whole run.
    pub fn interval_count(self) -> Option<usize> {
        match self {
            Self::Day => Some(INTERVALS_PER_DAY),
            Self::Week => Some(7 * INTERVALS_PER_DAY),
            Self::Month => Some(31 * INTERVALS_PER_DAY),
            Self::Year => None,
        }
    }

    /// Restricts a series to this window.
    pub fn slice<T>(self, series: &[T]) -> &[T] {
        match self.interval_count() {
            Some(n) => &series[..n.min(series.len())],
            None => series,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for ViewWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown window \"{s}\", expected day, week, month or year"))
    }
}
