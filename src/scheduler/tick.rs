/*!
 * Tick Algorithm
 * One fixed logical step: aging, I/O completion, dispatch, execution, termination
 */

use super::policy::dispatch_order;
use super::types::TickOutcome;
use super::{invariants, SchedulerEngine};
use crate::core::limits::{TICK_MS, TIME_SLICE_MS};
use crate::core::types::ProcessId;
use crate::monitoring::span_tick;
use crate::process::{ExecOutcome, ProcessState};
use tracing::{debug, info};

impl SchedulerEngine {
    /// Advance the simulation clock by one tick
    ///
    /// The step is a non-reentrant critical section; `&mut self` rules out
    /// overlapping ticks. Phases run in a fixed order: ready-queue aging,
    /// I/O completions, dispatch, execution, termination check.
    pub fn advance_tick(&mut self) -> TickOutcome {
        let span = span_tick(self.current_time + TICK_MS);
        let _guard = span.enter();

        self.current_time += TICK_MS;

        self.age_ready_queue();
        self.complete_io();
        if self.running.is_none() {
            self.dispatch();
        }
        if let Some(id) = self.running {
            self.run_slice(id);
        }

        if let Err(err) = self.check_invariants() {
            invariants::invariant_violation(&err);
        }

        if self.is_run_complete() {
            info!(
                time = self.current_time,
                completed = self.completed_tasks,
                "All processes completed"
            );
            TickOutcome::RunComplete
        } else {
            TickOutcome::Advanced
        }
    }

    fn age_ready_queue(&mut self) {
        let now = self.current_time;
        let factor = self.config.aging_factor;
        for &id in &self.ready_queue {
            let process = &mut self.processes[id.index()];
            process.refresh_waiting_time(now);
            process.update_dynamic_priority(now, factor);
        }
    }

    /// Move every process whose I/O finished this tick back to the ready tail
    fn complete_io(&mut self) {
        let now = self.current_time;
        let processes = &mut self.processes;
        let mut finished = Vec::new();

        self.waiting_queue.retain(|&id| {
            let done = processes[id.index()].tick_io_wait(TICK_MS);
            if done {
                finished.push(id);
            }
            !done
        });

        for id in finished {
            let process = &mut self.processes[id.index()];
            process.enter_ready_queue(now);
            process.record_state(ProcessState::Ready, now);
            self.ready_queue.push_back(id);
            self.log_transition(id, ProcessState::Waiting, ProcessState::Ready);
            debug!(process = %id, time = now, "I/O completed");
        }
    }

    /// Hand the CPU to the best ready process
    fn dispatch(&mut self) {
        if self.ready_queue.is_empty() {
            return;
        }

        let tie_break = self.config.tie_break;
        let processes = &self.processes;
        self.ready_queue
            .make_contiguous()
            .sort_by(|&a, &b| dispatch_order(&processes[a.index()], &processes[b.index()], tie_break));

        let Some(id) = self.ready_queue.pop_front() else {
            return;
        };

        let now = self.current_time;
        let process = &mut self.processes[id.index()];
        process.mark_dispatched(now);
        process.record_state(ProcessState::Running, now);
        let priority = process.dynamic_priority();
        self.running = Some(id);
        self.log_transition(id, ProcessState::Ready, ProcessState::Running);

        debug!(process = %id, priority, time = now, "Process dispatched");
    }

    /// Execute one slice of the running process and apply its outcome
    fn run_slice(&mut self, id: ProcessId) {
        let now = self.current_time;
        let outcome = self.processes[id.index()].execute(TIME_SLICE_MS);

        match outcome {
            ExecOutcome::NeedsIo => {
                let wait = self.io_wait.next_wait();
                let process = &mut self.processes[id.index()];
                process.begin_io_wait(wait);
                process.record_state(ProcessState::Waiting, now);
                self.waiting_queue.push(id);
                self.running = None;
                self.log_transition(id, ProcessState::Running, ProcessState::Waiting);
                debug!(process = %id, wait, time = now, "Process blocked on I/O");
            }
            ExecOutcome::Completed => {
                let close_interval = self.config.close_running_interval;
                let process = &mut self.processes[id.index()];
                if close_interval {
                    process.record_state(ProcessState::Running, now.saturating_sub(1));
                }
                process.record_state(ProcessState::Completed, now);
                let waited = process.waiting_time();
                let name = process.label();

                self.completed_tasks += 1;
                self.total_waiting_time += waited;
                self.running = None;
                self.log_transition(id, ProcessState::Running, ProcessState::Completed);
                info!(process = %name, time = now, waiting_time = waited, "Process completed");
            }
            ExecOutcome::StillRunning => {
                let process = &self.processes[id.index()];
                if now.saturating_sub(process.last_run_time()) >= self.config.time_quantum {
                    self.preempt(id);
                }
            }
        }
    }

    fn preempt(&mut self, id: ProcessId) {
        let now = self.current_time;
        let process = &mut self.processes[id.index()];
        process.record_state(ProcessState::Ready, now);
        process.enter_ready_queue(now);
        self.ready_queue.push_back(id);
        self.running = None;
        self.log_transition(id, ProcessState::Running, ProcessState::Ready);

        debug!(process = %id, time = now, "Quantum expired, process preempted");
    }
}
