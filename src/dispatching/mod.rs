//! Ordering policies for the ready queue.
//!
//! Two policies are supported: `Priority` (ascending priority value,
//! lower runs first) and `ShortestJobFirst` (ascending execution time).
//! The policy is owned by the queue and switchable at runtime; a switch
//! takes effect on the next extraction or snapshot.
//!
//! # Score Convention
//! Comparisons order ascending — the smaller key is scheduled first.
//! Equal keys are reported as `Ordering::Equal`; the queue breaks those
//! ties by submission order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::models::ProcessRecord;

/// The rule determining which waiting process is selected next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulingPolicy {
    /// Ascending `priority` value (lower value = higher priority).
    #[default]
    Priority,
    /// Ascending `execution_time` (shortest job first).
    ShortestJobFirst,
}

impl SchedulingPolicy {
    /// Short policy name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Priority => "Priority",
            Self::ShortestJobFirst => "SJF",
        }
    }

    /// Compares two records under this policy.
    ///
    /// Returns `Ordering::Less` when `a` should run before `b`. Equal
    /// keys compare `Equal` so the caller can apply FIFO tie-breaking.
    pub fn compare(&self, a: &ProcessRecord, b: &ProcessRecord) -> Ordering {
        match self {
            Self::Priority => a.priority.cmp(&b.priority),
            Self::ShortestJobFirst => a.execution_time.cmp(&b.execution_time),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchedulingPolicy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "sjf" | "shortestjobfirst" | "shortest_job_first" => Ok(Self::ShortestJobFirst),
            other => Err(SchedulerError::InvalidInput(format!(
                "unknown scheduling policy '{other}'"
            ))),
        }
    }
}
