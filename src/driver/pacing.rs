/*!
 * Tick Pacing
 * Drift-corrected wall-clock deadlines for the tick driver
 */

use std::time::Duration;
use tokio::time::Instant;

/// Longest period between ticks, reached only at vanishingly small speeds
pub const MAX_TICK_PERIOD: Duration = Duration::from_secs(3600);

/// Wall-clock period for a base interval at a speed multiplier
pub fn period_for(base: Duration, speed: f64) -> Duration {
    Duration::try_from_secs_f64(base.as_secs_f64() / speed)
        .unwrap_or(MAX_TICK_PERIOD)
        .min(MAX_TICK_PERIOD)
}

/// Deadline chain anchored on the previous deadline rather than on when the
/// previous tick finished
///
/// The next deadline is `max(now, anchor + period)`: lateness is absorbed
/// without bursts of catch-up ticks, and scheduling jitter does not accumulate.
#[derive(Debug, Clone)]
pub struct Pacer {
    base: Duration,
    period: Duration,
    anchor: Instant,
}

impl Pacer {
    pub fn new(base: Duration, speed: f64) -> Self {
        Self {
            base,
            period: period_for(base, speed),
            anchor: Instant::now(),
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Change the speed; applies from the next deadline
    pub fn set_speed(&mut self, speed: f64) {
        self.period = period_for(self.base, speed);
    }

    /// Re-anchor the chain at the current instant, after a start or resume
    pub fn restart(&mut self) {
        self.anchor = Instant::now();
    }

    pub fn next_deadline(&self) -> Instant {
        (self.anchor + self.period).max(Instant::now())
    }

    /// Record that the tick due at `deadline` has run
    #[inline]
    pub fn advance_to(&mut self, deadline: Instant) {
        self.anchor = deadline;
    }
}
