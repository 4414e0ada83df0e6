/*!
 * Transition Log
 * Bounded FIFO record of process state changes with ringbuf-based storage
 */

use crate::core::data_structures::InlineString;
use crate::core::limits::TRANSITION_LOG_CAPACITY;
use crate::core::types::{Priority, SimTime};
use crate::process::ProcessState;
use ringbuf::{traits::*, HeapRb};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One observed state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEntry {
    /// `"name - type"` of the process
    pub process: InlineString,
    pub from: ProcessState,
    pub to: ProcessState,
    pub time: SimTime,
    /// Dynamic priority at the moment of the transition
    pub priority: Priority,
}

/// Append-only ring of the most recent transitions
///
/// Insertion-ordered; when full, the oldest entry is evicted.
pub struct TransitionLog {
    buffer: HeapRb<TransitionEntry>,
    capacity: usize,
}

impl std::fmt::Debug for TransitionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionLog")
            .field("entries", &self.buffer.occupied_len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::with_capacity(TRANSITION_LOG_CAPACITY)
    }

    /// Log retaining `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: HeapRb::new(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full
    pub fn record(&mut self, entry: TransitionEntry) {
        if let Some(evicted) = self.buffer.push_overwrite(entry) {
            trace!(
                process = %evicted.process,
                time = evicted.time,
                "Transition evicted from log"
            );
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.occupied_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries in insertion order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &TransitionEntry> + '_ {
        let (head, tail) = self.buffer.as_slices();
        head.iter().chain(tail.iter())
    }

    /// Entries most-recent-first, as displayed by a transition feed
    pub fn recent(&self) -> impl Iterator<Item = &TransitionEntry> + '_ {
        let (head, tail) = self.buffer.as_slices();
        tail.iter().rev().chain(head.iter().rev())
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&TransitionEntry> {
        self.recent().next()
    }

    pub fn clear(&mut self) {
        self.buffer = HeapRb::new(self.capacity);
    }
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(time: SimTime) -> TransitionEntry {
        TransitionEntry {
            process: "P1 - cpu".into(),
            from: ProcessState::Ready,
            to: ProcessState::Running,
            time,
            priority: 5,
        }
    }

    #[test]
    fn test_insertion_order_and_recent_view() {
        let mut log = TransitionLog::with_capacity(4);
        for t in [100, 200, 300] {
            log.record(entry(t));
        }
        let forward: Vec<_> = log.iter().map(|e| e.time).collect();
        let recent: Vec<_> = log.recent().map(|e| e.time).collect();
        assert_eq!(forward, vec![100, 200, 300]);
        assert_eq!(recent, vec![300, 200, 100]);
        assert_eq!(log.latest().map(|e| e.time), Some(300));
    }

    #[test]
    fn test_oldest_evicted_when_full() {
        let mut log = TransitionLog::new();
        for t in 0..60 {
            log.record(entry(t));
        }
        assert_eq!(log.len(), 50);
        assert_eq!(log.iter().next().map(|e| e.time), Some(10));
        assert_eq!(log.recent().next().map(|e| e.time), Some(59));
        // Wrapped storage still reads in order
        let forward: Vec<_> = log.iter().map(|e| e.time).collect();
        assert_eq!(forward, (10..60).collect::<Vec<_>>());
    }

    #[test]
    fn test_clear() {
        let mut log = TransitionLog::with_capacity(2);
        log.record(entry(1));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 2);
        log.record(entry(2));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let log = TransitionLog::with_capacity(0);
        assert_eq!(log.capacity(), 1);
    }
}
