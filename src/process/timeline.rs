/*!
 * Process Timelines
 * Lazy state timelines and stepped chart series derived from state history
 */

use super::core::types::{ProcessState, StateRecord};
use crate::core::types::SimTime;
use serde::{Deserialize, Serialize};

/// A `{time, state}` point of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub time: SimTime,
    pub state: ProcessState,
}

impl TimelinePoint {
    #[inline(always)]
    pub const fn new(time: SimTime, state: ProcessState) -> Self {
        Self { time, state }
    }
}

/// Restartable view over a process's state history
///
/// Yields a leading `{0, ready}` point when the history starts after time zero,
/// every recorded transition except the transient `created`, and a
/// trailing `{current_time, status}` point while the process is still active.
/// Each call to [`Timeline::iter`] starts from the beginning.
#[derive(Debug, Clone, Copy)]
pub struct Timeline<'a> {
    history: &'a [StateRecord],
    status: ProcessState,
    current_time: SimTime,
}

impl<'a> Timeline<'a> {
    pub(crate) fn new(history: &'a [StateRecord], status: ProcessState, current_time: SimTime) -> Self {
        Self {
            history,
            status,
            current_time,
        }
    }

    pub fn iter(&self) -> TimelineIter<'a> {
        let history: &'a [StateRecord] = self.history;
        let first = history
            .iter()
            .find(|record| record.state != ProcessState::Created);
        let leading = match (history.first(), first) {
            (Some(start), Some(_)) if start.time > 0 => {
                Some(TimelinePoint::new(0, ProcessState::Ready))
            }
            _ => None,
        };
        // Nothing but `created` means the process has not been queued yet
        let records = match first {
            Some(_) => history.iter(),
            None => history[history.len()..].iter(),
        };
        let trailing = (!self.status.is_terminal())
            .then(|| TimelinePoint::new(self.current_time, self.status));

        TimelineIter {
            leading,
            records,
            trailing,
        }
    }
}

impl<'a> IntoIterator for &Timeline<'a> {
    type Item = TimelinePoint;
    type IntoIter = TimelineIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for Timeline<'a> {
    type Item = TimelinePoint;
    type IntoIter = TimelineIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`Timeline::iter`]
#[derive(Debug, Clone)]
pub struct TimelineIter<'a> {
    leading: Option<TimelinePoint>,
    records: std::slice::Iter<'a, StateRecord>,
    trailing: Option<TimelinePoint>,
}

impl Iterator for TimelineIter<'_> {
    type Item = TimelinePoint;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(point) = self.leading.take() {
            return Some(point);
        }
        for record in self.records.by_ref() {
            if record.state != ProcessState::Created {
                return Some(TimelinePoint::new(record.time, record.state));
            }
        }
        self.trailing.take()
    }
}

/// Stepped chart series for a single process
///
/// Every transition contributes a closing point at the previous state and an
/// opening point at the new state, so a step renderer draws flat segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSeries {
    pub points: Vec<TimelinePoint>,
}

impl StepSeries {
    pub(crate) fn build(history: &[StateRecord], status: ProcessState, current_time: SimTime) -> Self {
        let mut relevant: Vec<&StateRecord> = history
            .iter()
            .filter(|record| record.state != ProcessState::Created)
            .collect();
        if relevant.is_empty() {
            return Self::default();
        }
        relevant.sort_by_key(|record| record.time);

        let mut points = Vec::with_capacity(relevant.len() * 2 + 2);
        points.push(TimelinePoint::new(0, ProcessState::Ready));

        let mut last_state = ProcessState::Ready;
        let mut last_time = 0;
        for record in relevant {
            points.push(TimelinePoint::new(record.time, last_state));
            points.push(TimelinePoint::new(record.time, record.state));
            last_state = record.state;
            last_time = record.time;
        }

        if status.is_terminal() {
            points.push(TimelinePoint::new(last_time, ProcessState::Completed));
        } else {
            points.push(TimelinePoint::new(current_time, status));
        }

        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
