//! Process record model.
//!
//! A process is the unit of scheduling: a name, a priority, and a
//! simulated execution time. Records are immutable once submitted.
//! Status is derived from where a record currently lives (ready queue
//! vs. the runner's current slot), not stored on the record itself.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A schedulable process.
///
/// `priority` follows the convention that a lower value runs earlier
/// under the `Priority` policy. `execution_time` is both the simulated
/// run length and the sort key under `ShortestJobFirst`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Display name. Not required to be unique.
    pub name: String,
    /// Scheduling priority (lower = runs earlier).
    pub priority: i32,
    /// Simulated execution duration.
    pub execution_time: Duration,
}

impl ProcessRecord {
    /// Creates a new process record.
    pub fn new(name: impl Into<String>, priority: i32, execution_time: Duration) -> Self {
        Self {
            name: name.into(),
            priority,
            execution_time,
        }
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (priority {}, {:?})",
            self.name, self.priority, self.execution_time
        )
    }
}

/// Lifecycle status of a process, as reported in snapshots and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// In the ready queue.
    Waiting,
    /// Occupying the runner's current slot.
    Executing,
    /// Finished; the record is discarded after the completion event.
    Completed,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Waiting => "Waiting",
            Self::Executing => "Executing",
            Self::Completed => "Completed",
        };
        f.write_str(s)
    }
}
