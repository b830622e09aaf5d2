//! Scheduling domain models.
//!
//! Core data types for the simulator: the process record submitted by
//! callers and the lifecycle status reported back through snapshots and
//! events.

mod process;

pub use process::{ProcessRecord, ProcessStatus};
