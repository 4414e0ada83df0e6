/*!
 * Scheduler Core Operations
 * Admission, priority overrides, lookups and reset
 */

use super::transitions::TransitionEntry;
use super::SchedulerEngine;
use crate::core::config::ProcessSpec;
use crate::core::data_structures::InlineString;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::{Priority, ProcessId, SimTime};
use crate::process::validation::{validate_execution_time, validate_name, validate_priority};
use crate::process::{Process, ProcessState, ProcessType};
use tracing::{info, warn};

/// Log a rejected command and hand the error back to the caller
#[cold]
fn rejected(err: SchedulerError) -> SchedulerError {
    warn!(error = %err, kind = ?err.kind(), "Command rejected");
    err
}

impl SchedulerEngine {
    /// Admit a new process
    ///
    /// The process is created at the current time, moves straight to `Ready`
    /// and joins the tail of the ready queue. Invalid requests are rejected
    /// without touching engine state.
    pub fn admit(
        &mut self,
        name: &str,
        kind: ProcessType,
        priority: Priority,
        execution_time: SimTime,
    ) -> SchedulerResult<ProcessId> {
        let name = validate_name(name).map_err(rejected)?;
        let priority = validate_priority(priority).map_err(rejected)?;
        let execution_time = validate_execution_time(execution_time).map_err(rejected)?;
        if self.names.contains_key(name) {
            return Err(rejected(SchedulerError::DuplicateName(name.into())));
        }

        let id = ProcessId(self.processes.len());
        let name = InlineString::from(name);
        let now = self.current_time;

        let mut process = Process::new(id, name.clone(), kind, priority, execution_time, now);
        process.record_state(ProcessState::Ready, now);

        self.processes.push(process);
        self.names.insert(name.clone(), id);
        self.ready_queue.push_back(id);
        self.log_transition(id, ProcessState::Created, ProcessState::Ready);

        info!(
            process = %name,
            id = id.index(),
            kind = kind.as_str(),
            class = kind.display_name(),
            priority,
            execution_time,
            time = now,
            "Process admitted"
        );
        Ok(id)
    }

    /// Admit a process described by a workload entry
    pub fn admit_spec(&mut self, spec: &ProcessSpec) -> SchedulerResult<ProcessId> {
        self.admit(&spec.name, spec.kind, spec.priority, spec.execution_time)
    }

    /// Override a process's priority by name
    ///
    /// Sets both the original and the dynamic priority; the next aging pass
    /// recomputes the dynamic priority from the new original.
    pub fn set_priority(&mut self, name: &str, priority: Priority) -> SchedulerResult<()> {
        let priority = validate_priority(priority).map_err(rejected)?;
        let id = self
            .process_id(name)
            .ok_or_else(|| rejected(SchedulerError::ProcessNotFound(name.into())))?;

        let process = &mut self.processes[id.index()];
        let previous = process.original_priority();
        process.override_priority(priority);

        info!(process = name, previous, priority, "Priority overridden");
        Ok(())
    }

    /// Apply the same priority override to several processes
    ///
    /// All names are resolved before anything changes: one unknown name
    /// rejects the whole batch. Returns the number of processes updated.
    pub fn set_priorities<I, S>(&mut self, names: I, priority: Priority) -> SchedulerResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let priority = validate_priority(priority).map_err(rejected)?;
        let ids = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                self.process_id(name)
                    .ok_or_else(|| rejected(SchedulerError::ProcessNotFound(name.into())))
            })
            .collect::<SchedulerResult<Vec<_>>>()?;

        for &id in &ids {
            self.processes[id.index()].override_priority(priority);
        }

        info!(count = ids.len(), priority, "Batch priority override applied");
        Ok(ids.len())
    }

    /// Drop every process, zero the clock and aggregates, clear the log
    ///
    /// Configuration and the I/O wait source are kept. Idempotent.
    pub fn reset(&mut self) {
        let dropped = self.processes.len();
        self.processes.clear();
        self.names.clear();
        self.ready_queue.clear();
        self.waiting_queue.clear();
        self.running = None;
        self.current_time = 0;
        self.completed_tasks = 0;
        self.total_waiting_time = 0;
        self.transitions.clear();

        info!(dropped, "Simulation reset");
    }

    /// Look up a process handle by name
    #[inline]
    pub fn process_id(&self, name: &str) -> Option<ProcessId> {
        self.names.get(name).copied()
    }

    #[inline]
    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(id.index())
    }

    pub fn process_by_name(&self, name: &str) -> Option<&Process> {
        self.process_id(name).and_then(|id| self.process(id))
    }

    /// All admitted processes in admission order
    pub fn processes(&self) -> impl Iterator<Item = &Process> + '_ {
        self.processes.iter()
    }

    /// Record a transition of `id` at the current time
    pub(super) fn log_transition(&mut self, id: ProcessId, from: ProcessState, to: ProcessState) {
        let process = &self.processes[id.index()];
        let entry = TransitionEntry {
            process: process.label(),
            from,
            to,
            time: self.current_time,
            priority: process.dynamic_priority(),
        };
        self.transitions.record(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FixedIoWait;
    use pretty_assertions::assert_eq;

    fn engine() -> SchedulerEngine {
        SchedulerEngine::builder()
            .with_io_wait_source(FixedIoWait(500))
            .build()
    }

    #[test]
    fn test_admit_records_created_then_ready() {
        let mut engine = engine();
        let id = engine.admit("P1", ProcessType::Cpu, 5, 300).unwrap();
        let p = engine.process(id).unwrap();

        let states: Vec<_> = p.history().iter().map(|r| (r.state, r.time)).collect();
        assert_eq!(
            states,
            vec![(ProcessState::Created, 0), (ProcessState::Ready, 1)]
        );
        assert_eq!(engine.ready_queue().collect::<Vec<_>>(), vec![id]);

        let entry = engine.transitions().latest().unwrap();
        assert_eq!(entry.process.as_str(), "P1 - cpu");
        assert_eq!(entry.from, ProcessState::Created);
        assert_eq!(entry.to, ProcessState::Ready);
    }

    #[test]
    fn test_admit_rejects_invalid_fields_without_mutation() {
        let mut engine = engine();
        assert_eq!(
            engine.admit("", ProcessType::Cpu, 5, 300),
            Err(SchedulerError::EmptyName)
        );
        assert_eq!(
            engine.admit("P1", ProcessType::Cpu, 0, 300),
            Err(SchedulerError::InvalidPriority(0))
        );
        assert_eq!(
            engine.admit("P1", ProcessType::Cpu, 11, 300),
            Err(SchedulerError::InvalidPriority(11))
        );
        assert_eq!(
            engine.admit("P1", ProcessType::Cpu, 5, 0),
            Err(SchedulerError::InvalidExecutionTime(0))
        );
        assert!(engine.is_empty());
        assert!(engine.transitions().is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut engine = engine();
        engine.admit("P1", ProcessType::Cpu, 5, 300).unwrap();
        assert_eq!(
            engine.admit("P1", ProcessType::Io, 3, 900),
            Err(SchedulerError::DuplicateName("P1".into()))
        );
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_set_priority() {
        let mut engine = engine();
        engine.admit("P1", ProcessType::Cpu, 5, 300).unwrap();
        engine.set_priority("P1", 9).unwrap();

        let p = engine.process_by_name("P1").unwrap();
        assert_eq!(p.original_priority(), 9);
        assert_eq!(p.dynamic_priority(), 9);
    }

    #[test]
    fn test_set_priority_rejections() {
        let mut engine = engine();
        engine.admit("P1", ProcessType::Cpu, 5, 300).unwrap();

        for bad in [0, 11] {
            assert_eq!(
                engine.set_priority("P1", bad),
                Err(SchedulerError::InvalidPriority(bad))
            );
        }
        assert_eq!(
            engine.set_priority("ghost", 5),
            Err(SchedulerError::ProcessNotFound("ghost".into()))
        );

        let p = engine.process_by_name("P1").unwrap();
        assert_eq!(p.original_priority(), 5);
        assert_eq!(p.dynamic_priority(), 5);
    }

    #[test]
    fn test_batch_override_is_all_or_nothing() {
        let mut engine = engine();
        engine.admit("A", ProcessType::Cpu, 2, 300).unwrap();
        engine.admit("B", ProcessType::Io, 3, 300).unwrap();

        assert_eq!(
            engine.set_priorities(["A", "missing"], 8),
            Err(SchedulerError::ProcessNotFound("missing".into()))
        );
        assert_eq!(engine.process_by_name("A").unwrap().original_priority(), 2);

        assert_eq!(engine.set_priorities(["A", "B"], 8), Ok(2));
        assert!(engine.processes().all(|p| p.original_priority() == 8));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut engine = engine();
        engine.admit("P1", ProcessType::Cpu, 5, 300).unwrap();
        engine.admit("P2", ProcessType::Io, 5, 2000).unwrap();
        for _ in 0..4 {
            engine.advance_tick();
        }

        engine.reset();
        let first = engine.snapshot();
        engine.reset();
        let second = engine.snapshot();

        assert_eq!(first, second);
        assert!(engine.is_empty());
        assert_eq!(engine.current_time(), 0);
        assert_eq!(engine.completed_tasks(), 0);
        assert!(engine.transitions().is_empty());
        assert_eq!(engine.process_id("P1"), None);

        // Names are free again after a reset
        assert!(engine.admit("P1", ProcessType::Cpu, 5, 300).is_ok());
    }
}
