/*!
 * Scheduler Statistics
 * Metrics and read-only snapshots for presentation layers
 */

use super::transitions::TransitionEntry;
use super::types::{EngineSnapshot, Metrics};
use super::SchedulerEngine;
use crate::core::types::ProcessId;
use crate::process::{ProcessSnapshot, Timeline};

impl SchedulerEngine {
    /// Current throughput and latency metrics
    pub fn metrics(&self) -> Metrics {
        let avg_waiting_time = if self.completed_tasks > 0 {
            self.total_waiting_time as f64 / self.completed_tasks as f64
        } else {
            0.0
        };
        let throughput = if self.current_time > 0 {
            self.completed_tasks as f64 / (self.current_time as f64 / 1000.0)
        } else {
            0.0
        };

        Metrics {
            completed_tasks: self.completed_tasks,
            avg_waiting_time,
            throughput,
            current_time: self.current_time,
            total_processes: self.processes.len(),
        }
    }

    fn snapshot_of(&self, id: ProcessId) -> ProcessSnapshot {
        self.processes[id.index()].snapshot()
    }

    /// Ready queue in its current order
    pub fn ready_snapshot(&self) -> Vec<ProcessSnapshot> {
        self.ready_queue.iter().map(|&id| self.snapshot_of(id)).collect()
    }

    pub fn waiting_snapshot(&self) -> Vec<ProcessSnapshot> {
        self.waiting_queue.iter().map(|&id| self.snapshot_of(id)).collect()
    }

    pub fn running_snapshot(&self) -> Option<ProcessSnapshot> {
        self.running.map(|id| self.snapshot_of(id))
    }

    /// Every admitted process in admission order, for bulk priority editing
    pub fn process_list(&self) -> Vec<ProcessSnapshot> {
        self.processes.iter().map(|p| p.snapshot()).collect()
    }

    /// Owned view of all queues and the metrics
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            current_time: self.current_time,
            ready: self.ready_snapshot(),
            waiting: self.waiting_snapshot(),
            running: self.running_snapshot(),
            metrics: self.metrics(),
        }
    }

    /// Transition feed, most recent first
    pub fn transition_feed(&self) -> Vec<TransitionEntry> {
        self.transitions.recent().cloned().collect()
    }

    /// Timeline of the named process up to the current time
    pub fn timeline(&self, name: &str) -> Option<Timeline<'_>> {
        self.process_by_name(name)
            .map(|p| p.timeline(self.current_time))
    }
}
