//! Ready queue of waiting processes.
//!
//! Entries are stored unsorted, each stamped with a monotonically
//! increasing submission sequence number. Ordering is derived from the
//! active [`SchedulingPolicy`] at every extraction or snapshot, so a
//! policy switch applies to the very next query and no stale ordering
//! can survive a switch. Ties resolve in submission order.
//!
//! Cost: submit O(1), extract O(n), snapshot O(n log n).

use std::cmp::Ordering;

use crate::dispatching::SchedulingPolicy;
use crate::error::SchedulerError;
use crate::models::ProcessRecord;

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    record: ProcessRecord,
}

/// The collection of processes waiting to run.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    entries: Vec<Entry>,
    next_seq: u64,
    policy: SchedulingPolicy,
}

impl ReadyQueue {
    /// Creates an empty queue with the given ordering policy.
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
            policy,
        }
    }

    /// The currently active ordering policy.
    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Switches the ordering policy.
    ///
    /// Queued entries are untouched; the new policy governs every
    /// extraction and snapshot performed from here on.
    pub fn set_policy(&mut self, policy: SchedulingPolicy) {
        self.policy = policy;
    }

    /// Enqueues a record, stamping it with the next submission sequence.
    pub fn submit(&mut self, record: ProcessRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { seq, record });
    }

    /// Whether the queue holds no waiting processes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of waiting processes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All waiting records in the order the active policy would run them.
    ///
    /// Non-mutating; intended for display.
    pub fn snapshot_ordered(&self) -> Vec<ProcessRecord> {
        let mut ordered: Vec<&Entry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| self.compare_entries(a, b));
        ordered.into_iter().map(|e| e.record.clone()).collect()
    }

    /// Removes and returns the record the active policy ranks first.
    ///
    /// Ties break by submission order. Fails with
    /// [`SchedulerError::EmptyQueue`] when nothing is waiting.
    pub fn extract_min(&mut self) -> Result<ProcessRecord, SchedulerError> {
        if self.entries.is_empty() {
            return Err(SchedulerError::EmptyQueue);
        }
        let mut best = 0;
        for i in 1..self.entries.len() {
            if self.compare_entries(&self.entries[i], &self.entries[best]) == Ordering::Less {
                best = i;
            }
        }
        Ok(self.entries.remove(best).record)
    }

    fn compare_entries(&self, a: &Entry, b: &Entry) -> Ordering {
        self.policy
            .compare(&a.record, &b.record)
            .then(a.seq.cmp(&b.seq))
    }
}
