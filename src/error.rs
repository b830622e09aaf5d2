//! Scheduler error types.

use thiserror::Error;

/// Errors surfaced by the scheduling API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Malformed submission rejected at the input boundary. Never reaches
    /// the ready queue.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Extraction attempted on an empty queue. The runner always checks
    /// emptiness first, so hitting this indicates a logic defect.
    #[error("ready queue is empty")]
    EmptyQueue,
}
