//! Scheduler runner and its event stream.
//!
//! The runner executes one process at a time: it extracts the best
//! waiting process under the active policy, simulates its run without
//! blocking submitters, and chains automatically into the next one
//! until the queue drains. Each transition is published as a
//! [`SchedulerEvent`] for the presentation layer to render.

mod events;
mod runner;

pub use events::SchedulerEvent;
pub use runner::Scheduler;
