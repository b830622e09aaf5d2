//! Single-resource process scheduling simulator.
//!
//! Processes are submitted with a name, a priority, and a simulated
//! execution time. The scheduler runs them one at a time, picking the
//! next process with a runtime-switchable ordering policy — priority
//! based or shortest-job-first — and reporting each completion with the
//! measured elapsed time. Submissions and status queries stay responsive
//! while a process executes.
//!
//! # Modules
//!
//! - **`models`**: domain types — [`ProcessRecord`], [`ProcessStatus`]
//! - **`dispatching`**: ordering policies — [`SchedulingPolicy`]
//! - **`queue`**: the [`ReadyQueue`] of waiting processes
//! - **`scheduler`**: the async [`Scheduler`] runner and its event stream
//! - **`validation`**: boundary checks for raw submissions
//!
//! # Usage
//!
//! ```
//! use procsim::{Scheduler, SchedulerEvent, SchedulingPolicy};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (scheduler, mut events) = Scheduler::with_policy(SchedulingPolicy::ShortestJobFirst);
//! scheduler.submit_process("compile", 2, 0.0).unwrap();
//! scheduler.start_or_continue();
//!
//! while let Some(event) = events.recv().await {
//!     if event == SchedulerEvent::QueueEmpty {
//!         break;
//!     }
//! }
//! # }
//! ```

pub mod dispatching;
pub mod error;
pub mod models;
pub mod queue;
pub mod scheduler;
pub mod validation;

pub use dispatching::SchedulingPolicy;
pub use error::SchedulerError;
pub use models::{ProcessRecord, ProcessStatus};
pub use queue::ReadyQueue;
pub use scheduler::{Scheduler, SchedulerEvent};
