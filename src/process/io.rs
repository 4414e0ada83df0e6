/*!
 * I/O Burst Model
 * Periodic I/O triggers for I/O-bound processes
 */

use crate::core::limits::IO_OPERATION_SPAN_MS;
use crate::core::types::SimTime;

/// Countdown to the next I/O burst of an I/O-bound process
///
/// A process with execution time `E` performs `max(1, E / 1000)` bursts,
/// one every `E / (bursts + 1)` ms of CPU time. Once the burst budget is spent
/// and the countdown runs out, the plan is disarmed and no longer limits slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoBurstPlan {
    operations_remaining: u64,
    interval: SimTime,
    next_io_time: SimTime,
}

impl IoBurstPlan {
    pub fn for_execution_time(execution_time: SimTime) -> Self {
        let operations = (execution_time / IO_OPERATION_SPAN_MS).max(1);
        let interval = execution_time / (operations + 1);
        Self {
            operations_remaining: operations,
            interval,
            next_io_time: interval,
        }
    }

    #[inline]
    pub fn operations_remaining(&self) -> u64 {
        self.operations_remaining
    }

    #[inline]
    pub fn interval(&self) -> SimTime {
        self.interval
    }

    #[inline]
    pub fn next_io_time(&self) -> SimTime {
        self.next_io_time
    }

    #[inline(always)]
    fn is_disarmed(&self) -> bool {
        self.operations_remaining == 0 && self.next_io_time == 0
    }

    /// Longest slice that may run before the next burst is due
    #[inline]
    pub fn limit(&self) -> Option<SimTime> {
        if self.is_disarmed() {
            None
        } else {
            Some(self.next_io_time)
        }
    }

    /// Account `slice` ms of CPU time; returns true when a burst triggers
    pub fn consume(&mut self, slice: SimTime) -> bool {
        if self.is_disarmed() {
            return false;
        }
        self.next_io_time = self.next_io_time.saturating_sub(slice);
        if self.next_io_time == 0 && self.operations_remaining > 0 {
            self.operations_remaining -= 1;
            self.next_io_time = self.interval;
            return true;
        }
        false
    }
}
