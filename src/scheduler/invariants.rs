/*!
 * Engine Invariants
 * Structural checks run after every tick
 */

use super::SchedulerEngine;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::limits::{MAX_PRIORITY, MIN_PRIORITY};
use crate::process::ProcessState;
use tracing::error;

/// Where an active process currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    None,
    Ready,
    Waiting,
    Running,
}

fn violation(message: String) -> SchedulerError {
    SchedulerError::InvariantViolation(message.into())
}

/// Report a broken invariant
///
/// Fatal in debug and test builds; logged and tolerated in release.
#[cold]
pub(super) fn invariant_violation(err: &SchedulerError) {
    error!(error = %err, "Scheduler invariant violated");
    debug_assert!(false, "{}", err);
}

impl SchedulerEngine {
    /// Verify queue membership, status consistency and field bounds
    pub fn check_invariants(&self) -> SchedulerResult<()> {
        let mut membership = vec![Membership::None; self.processes.len()];

        let mut claim = |index: usize, slot: Membership| -> SchedulerResult<()> {
            let current = membership
                .get_mut(index)
                .ok_or_else(|| violation(format!("queue holds unknown process #{}", index)))?;
            if *current != Membership::None {
                return Err(violation(format!(
                    "process #{} is in {:?} and {:?}",
                    index, current, slot
                )));
            }
            *current = slot;
            Ok(())
        };

        for id in &self.ready_queue {
            claim(id.index(), Membership::Ready)?;
        }
        for id in &self.waiting_queue {
            claim(id.index(), Membership::Waiting)?;
        }
        if let Some(id) = self.running {
            claim(id.index(), Membership::Running)?;
        }

        for (process, slot) in self.processes.iter().zip(membership) {
            let expected = match process.status() {
                ProcessState::Ready => Membership::Ready,
                ProcessState::Waiting => Membership::Waiting,
                ProcessState::Running => Membership::Running,
                ProcessState::Completed | ProcessState::Created => Membership::None,
            };
            if slot != expected {
                return Err(violation(format!(
                    "{} has status {} but is in {:?}",
                    process.name(),
                    process.status(),
                    slot
                )));
            }

            let priority = process.dynamic_priority();
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
                return Err(violation(format!(
                    "{} has dynamic priority {}",
                    process.name(),
                    priority
                )));
            }

            if (process.remaining_time() == 0) != process.is_completed() {
                return Err(violation(format!(
                    "{} has remaining time {} in status {}",
                    process.name(),
                    process.remaining_time(),
                    process.status()
                )));
            }
        }

        Ok(())
    }
}
