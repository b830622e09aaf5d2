//! Events emitted by the scheduler runner.

use std::time::Duration;

use serde::Serialize;

use crate::models::ProcessStatus;

/// A lifecycle event published on the scheduler's event stream.
///
/// Delivery is best-effort: the runner never blocks or fails because a
/// consumer stopped listening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// A process changed lifecycle state (waiting, executing, completed).
    StatusChanged {
        /// Process name.
        name: String,
        /// New status.
        status: ProcessStatus,
    },
    /// A process finished.
    Completed {
        /// Process name.
        name: String,
        /// Measured wall time from start to completion.
        elapsed: Duration,
    },
    /// The queue drained and the runner returned to idle.
    QueueEmpty,
}
