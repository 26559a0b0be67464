use super::types::INTERVALS_PER_HOUR;

/// Interval counter for a run of fixed length.
///
/// # Examples
///
/// ```
/// use ev_charge_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(2);
/// assert_eq!(clock.tick(), Some(0));
/// assert_eq!(clock.tick(), Some(1));
/// assert_eq!(clock.tick(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next interval to hand out
    current: usize,
    /// Total intervals in the run
    total: usize,
}

impl Clock {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Returns the next interval index, or `None` once the run is complete.
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let interval = self.current;
            self.current += 1;
            Some(interval)
        } else {
            None
        }
    }
}

/// Hour of day (0..24) containing a 15-minute interval.
pub fn hour_of_day(interval: usize) -> usize {
    (interval / INTERVALS_PER_HOUR) % 24
}
