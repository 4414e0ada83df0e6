/*!
 * Process Entity
 * A unit of simulated work with its own priority, progress and I/O state
 */

use super::core::types::{ExecOutcome, ProcessSnapshot, ProcessState, ProcessType, StateRecord};
use super::io::IoBurstPlan;
use super::priority;
use super::timeline::{StepSeries, Timeline};
use crate::core::data_structures::InlineString;
use crate::core::types::{AgingFactor, Priority, ProcessId, SimTime};

/// Simulated process
///
/// Queue membership is owned by the scheduling engine; a process only tracks
/// its own counters and history.
#[derive(Debug, Clone)]
pub struct Process {
    id: ProcessId,
    name: InlineString,
    kind: ProcessType,
    original_priority: Priority,
    dynamic_priority: Priority,
    execution_time: SimTime,
    remaining_time: SimTime,
    waiting_time: SimTime,
    start_time: Option<SimTime>,
    status: ProcessState,
    queue_entry_time: SimTime,
    last_run_time: SimTime,
    last_state_change_time: SimTime,
    total_cpu_time: SimTime,
    io: Option<IoBurstPlan>,
    io_wait_time: SimTime,
    history: Vec<StateRecord>,
}

impl Process {
    /// Construct a process in `Created` at `now`
    pub fn new(
        id: ProcessId,
        name: InlineString,
        kind: ProcessType,
        priority: Priority,
        execution_time: SimTime,
        now: SimTime,
    ) -> Self {
        let io = kind
            .performs_io()
            .then(|| IoBurstPlan::for_execution_time(execution_time));

        let mut process = Self {
            id,
            name,
            kind,
            original_priority: priority,
            dynamic_priority: priority,
            execution_time,
            remaining_time: execution_time,
            waiting_time: 0,
            start_time: None,
            status: ProcessState::Created,
            queue_entry_time: now,
            last_run_time: now,
            last_state_change_time: now,
            total_cpu_time: 0,
            io,
            io_wait_time: 0,
            history: Vec::new(),
        };
        process.record_state(ProcessState::Created, now);
        process
    }

    /// Append a state transition to the history and make it the current status
    ///
    /// History timestamps are strictly increasing: a transition at or before
    /// the last recorded time is stored at `last + 1`. Returns the stored time.
    pub fn record_state(&mut self, state: ProcessState, time: SimTime) -> SimTime {
        let time = match self.history.last() {
            Some(last) if time <= last.time => last.time + 1,
            _ => time,
        };
        self.history.push(StateRecord {
            state,
            time,
            priority: self.dynamic_priority,
        });
        self.status = state;
        self.last_state_change_time = time;
        time
    }

    /// Recompute the dynamic priority from aging, type bonus and CPU penalty
    pub fn update_dynamic_priority(&mut self, current_time: SimTime, aging_factor: AgingFactor) {
        let wait = current_time.saturating_sub(self.last_run_time);
        self.dynamic_priority = priority::dynamic_priority(
            self.original_priority,
            self.kind,
            wait,
            self.total_cpu_time,
            aging_factor,
        );
    }

    /// Run for at most `time_slice` ms
    ///
    /// The slice is cut short by completion or by a due I/O burst, so callers
    /// must read the consumed time from `remaining_time`/`total_cpu_time`.
    pub fn execute(&mut self, time_slice: SimTime) -> ExecOutcome {
        let mut actual = time_slice.min(self.remaining_time);
        if let Some(limit) = self.io.as_ref().and_then(IoBurstPlan::limit) {
            actual = actual.min(limit);
        }

        self.remaining_time -= actual;
        self.total_cpu_time += actual;

        if let Some(plan) = self.io.as_mut() {
            if plan.consume(actual) {
                return ExecOutcome::NeedsIo;
            }
        }

        if self.remaining_time == 0 {
            ExecOutcome::Completed
        } else {
            ExecOutcome::StillRunning
        }
    }

    /// Recompute `waiting_time` relative to the last ready-queue entry
    #[inline]
    pub(crate) fn refresh_waiting_time(&mut self, current_time: SimTime) {
        self.waiting_time = current_time.saturating_sub(self.queue_entry_time);
    }

    #[inline]
    pub(crate) fn enter_ready_queue(&mut self, now: SimTime) {
        self.queue_entry_time = now;
    }

    /// Bookkeeping for a dispatch onto the CPU
    pub(crate) fn mark_dispatched(&mut self, now: SimTime) {
        self.start_time.get_or_insert(now);
        self.last_run_time = now;
    }

    #[inline]
    pub(crate) fn begin_io_wait(&mut self, wait: SimTime) {
        self.io_wait_time = wait;
    }

    /// Count down the I/O wait; returns true when the I/O has finished
    #[inline]
    pub(crate) fn tick_io_wait(&mut self, elapsed: SimTime) -> bool {
        self.io_wait_time = self.io_wait_time.saturating_sub(elapsed);
        self.io_wait_time == 0
    }

    /// Set both priorities directly, bypassing aging until the next recomputation
    pub(crate) fn override_priority(&mut self, priority: Priority) {
        self.original_priority = priority;
        self.dynamic_priority = priority;
    }

    #[inline(always)]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline(always)]
    pub fn kind(&self) -> ProcessType {
        self.kind
    }

    #[inline(always)]
    pub fn status(&self) -> ProcessState {
        self.status
    }

    #[inline(always)]
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    #[inline(always)]
    pub fn original_priority(&self) -> Priority {
        self.original_priority
    }

    #[inline(always)]
    pub fn dynamic_priority(&self) -> Priority {
        self.dynamic_priority
    }

    #[inline(always)]
    pub fn execution_time(&self) -> SimTime {
        self.execution_time
    }

    #[inline(always)]
    pub fn remaining_time(&self) -> SimTime {
        self.remaining_time
    }

    #[inline(always)]
    pub fn waiting_time(&self) -> SimTime {
        self.waiting_time
    }

    #[inline(always)]
    pub fn start_time(&self) -> Option<SimTime> {
        self.start_time
    }

    #[inline(always)]
    pub fn queue_entry_time(&self) -> SimTime {
        self.queue_entry_time
    }

    #[inline(always)]
    pub fn last_run_time(&self) -> SimTime {
        self.last_run_time
    }

    #[inline(always)]
    pub fn last_state_change_time(&self) -> SimTime {
        self.last_state_change_time
    }

    #[inline(always)]
    pub fn total_cpu_time(&self) -> SimTime {
        self.total_cpu_time
    }

    #[inline(always)]
    pub fn io_wait_time(&self) -> SimTime {
        self.io_wait_time
    }

    /// I/O burst countdown, `None` for classes without I/O
    #[inline]
    pub fn io_plan(&self) -> Option<&IoBurstPlan> {
        self.io.as_ref()
    }

    #[inline]
    pub fn history(&self) -> &[StateRecord] {
        &self.history
    }

    /// Percentage of execution time already consumed
    pub fn progress(&self) -> f64 {
        let done = self.execution_time - self.remaining_time;
        done as f64 / self.execution_time as f64 * 100.0
    }

    /// `"name - type"` label used by the transition log
    pub fn label(&self) -> InlineString {
        let mut label = self.name.clone();
        label.push_str(" - ");
        label.push_str(self.kind.as_str());
        label
    }

    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            dynamic_priority: self.dynamic_priority,
            original_priority: self.original_priority,
            remaining_time: self.remaining_time,
            execution_time: self.execution_time,
            status: self.status,
            progress: self.progress(),
        }
    }

    /// State timeline up to `current_time`
    pub fn timeline(&self, current_time: SimTime) -> Timeline<'_> {
        Timeline::new(&self.history, self.status, current_time)
    }

    /// Stepped chart series up to `current_time`
    pub fn step_series(&self, current_time: SimTime) -> StepSeries {
        StepSeries::build(&self.history, self.status, current_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn process(kind: ProcessType, priority: Priority, execution_time: SimTime) -> Process {
        Process::new(ProcessId(0), "P1".into(), kind, priority, execution_time, 0)
    }

    #[test]
    fn test_new_process_is_created() {
        let p = process(ProcessType::Cpu, 5, 300);
        assert_eq!(p.status(), ProcessState::Created);
        assert_eq!(p.history().len(), 1);
        assert_eq!(p.remaining_time(), 300);
        assert!(p.io_plan().is_none());
    }

    #[test]
    fn test_record_state_forces_strict_order() {
        let mut p = process(ProcessType::Cpu, 5, 300);
        assert_eq!(p.record_state(ProcessState::Ready, 0), 1);
        assert_eq!(p.record_state(ProcessState::Running, 1), 2);
        assert_eq!(p.record_state(ProcessState::Ready, 100), 100);
        let times: Vec<_> = p.history().iter().map(|r| r.time).collect();
        assert_eq!(times, vec![0, 1, 2, 100]);
        assert_eq!(p.last_state_change_time(), 100);
    }

    #[test]
    fn test_execute_cpu_slices() {
        let mut p = process(ProcessType::Cpu, 5, 250);
        assert_eq!(p.execute(100), ExecOutcome::StillRunning);
        assert_eq!(p.execute(100), ExecOutcome::StillRunning);
        assert_eq!(p.execute(100), ExecOutcome::Completed);
        assert_eq!(p.remaining_time(), 0);
        assert_eq!(p.total_cpu_time(), 250);
    }

    #[test]
    fn test_execute_truncated_by_io() {
        let mut p = process(ProcessType::Io, 5, 2000);
        for _ in 0..6 {
            assert_eq!(p.execute(100), ExecOutcome::StillRunning);
        }
        assert_eq!(p.execute(100), ExecOutcome::NeedsIo);
        assert_eq!(p.total_cpu_time(), 666);
        assert_eq!(p.remaining_time(), 1334);
    }

    #[test]
    fn test_io_process_completes_with_uneven_interval() {
        let mut p = process(ProcessType::Io, 5, 2000);
        let mut bursts = 0;
        for _ in 0..100 {
            match p.execute(100) {
                ExecOutcome::NeedsIo => bursts += 1,
                ExecOutcome::Completed => break,
                ExecOutcome::StillRunning => {}
            }
        }
        assert_eq!(bursts, 2);
        assert!(p.remaining_time() == 0);
    }

    #[test]
    fn test_priority_aging_and_override() {
        let mut p = process(ProcessType::Cpu, 3, 5000);
        p.update_dynamic_priority(1000, 5);
        assert_eq!(p.dynamic_priority(), 8);
        assert_eq!(p.original_priority(), 3);

        p.override_priority(7);
        assert_eq!(p.dynamic_priority(), 7);
        assert_eq!(p.original_priority(), 7);
    }

    #[test]
    fn test_dispatch_keeps_first_start_time() {
        let mut p = process(ProcessType::Cpu, 5, 500);
        p.mark_dispatched(100);
        p.mark_dispatched(700);
        assert_eq!(p.start_time(), Some(100));
        assert_eq!(p.last_run_time(), 700);
    }

    #[test]
    fn test_io_wait_countdown() {
        let mut p = process(ProcessType::Io, 5, 2000);
        p.begin_io_wait(250);
        assert!(!p.tick_io_wait(100));
        assert!(!p.tick_io_wait(100));
        assert!(p.tick_io_wait(100));
    }

    #[test]
    fn test_snapshot_and_label() {
        let mut p = process(ProcessType::Io, 4, 1000);
        p.execute(100);
        let snap = p.snapshot();
        assert_eq!(snap.remaining_time, 900);
        assert!((snap.progress - 10.0).abs() < f64::EPSILON);
        assert_eq!(p.label().as_str(), "P1 - io");
    }
}
