/*!
 * Scheduler Policy
 * Ready-queue ordering and runtime policy changes
 */

use super::types::TieBreak;
use super::SchedulerEngine;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::{AgingFactor, SimTime};
use crate::process::Process;
use std::cmp::Ordering;
use tracing::info;

impl TieBreak {
    /// Compare two ready processes of equal dynamic priority
    #[inline]
    pub fn compare(self, a: &Process, b: &Process) -> Ordering {
        match self {
            Self::ShortestWait => a.waiting_time().cmp(&b.waiting_time()),
            Self::LongestWait => b.waiting_time().cmp(&a.waiting_time()),
        }
    }
}

/// Dispatch order: higher dynamic priority first, then the tie-break
#[inline]
pub fn dispatch_order(a: &Process, b: &Process, tie_break: TieBreak) -> Ordering {
    b.dynamic_priority()
        .cmp(&a.dynamic_priority())
        .then_with(|| tie_break.compare(a, b))
}

impl SchedulerEngine {
    /// Set the preemption threshold
    pub fn set_time_quantum(&mut self, quantum: SimTime) -> SchedulerResult<()> {
        if quantum == 0 {
            return Err(SchedulerError::InvalidQuantum(quantum));
        }
        let previous = self.config.time_quantum;
        self.config.time_quantum = quantum;
        info!(previous, quantum, "Time quantum updated");
        Ok(())
    }

    /// Set the aging factor; zero disables aging
    pub fn set_aging_factor(&mut self, factor: AgingFactor) {
        let previous = self.config.aging_factor;
        self.config.aging_factor = factor;
        info!(previous, factor, "Aging factor updated");
    }

    /// Change the tie-break among equal dynamic priorities
    pub fn set_tie_break(&mut self, tie_break: TieBreak) {
        if tie_break != self.config.tie_break {
            info!(tie_break = tie_break.as_str(), "Tie-break policy updated");
        }
        self.config.tie_break = tie_break;
    }

    #[inline]
    pub fn time_quantum(&self) -> SimTime {
        self.config.time_quantum
    }

    #[inline]
    pub fn aging_factor(&self) -> AgingFactor {
        self.config.aging_factor
    }

    #[inline]
    pub fn tie_break(&self) -> TieBreak {
        self.config.tie_break
    }
}
