//! Single-runner execution loop.
//!
//! The scheduler owns the ready queue and an at-most-one `current` slot
//! behind a single mutex. [`Scheduler::start_or_continue`] extracts the
//! best waiting process and spawns an async run loop that sleeps the
//! simulated duration, reports completion with the measured elapsed
//! time, and chains straight into the next waiting process until the
//! queue drains. Submissions, snapshots, and policy switches stay
//! synchronous and never wait on an in-flight run.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::dispatching::SchedulingPolicy;
use crate::error::SchedulerError;
use crate::models::{ProcessRecord, ProcessStatus};
use crate::queue::ReadyQueue;
use crate::validation::{self, Submission};

use super::events::SchedulerEvent;

/// The process occupying the current slot, with its start stamp.
struct Executing {
    record: ProcessRecord,
    started: Instant,
}

/// Shared mutable state: the queue and the current slot.
///
/// Invariant: a record is never in both at once; execution only begins
/// when `current` is empty.
struct State {
    queue: ReadyQueue,
    current: Option<Executing>,
}

/// Single-resource scheduler runner.
///
/// Cheap to clone; clones share the same queue, current slot, and event
/// stream. The lock is only held for bounded, non-awaiting sections, so
/// every synchronous operation completes promptly regardless of whether
/// a simulated run is in flight.
///
/// # Example
///
/// ```
/// use procsim::{Scheduler, SchedulerEvent};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (scheduler, mut events) = Scheduler::new();
/// scheduler.submit_process("compile", 1, 0.0).unwrap();
/// scheduler.start_or_continue();
/// while let Some(event) = events.recv().await {
///     if event == SchedulerEvent::QueueEmpty {
///         break;
///     }
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct Scheduler {
    state: Arc<Mutex<State>>,
    events: UnboundedSender<SchedulerEvent>,
}

impl Scheduler {
    /// Creates a scheduler with the default policy, returning it with
    /// the receiving end of its event stream.
    pub fn new() -> (Self, UnboundedReceiver<SchedulerEvent>) {
        Self::with_policy(SchedulingPolicy::default())
    }

    /// Creates a scheduler with the given ordering policy.
    pub fn with_policy(policy: SchedulingPolicy) -> (Self, UnboundedReceiver<SchedulerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            state: Arc::new(Mutex::new(State {
                queue: ReadyQueue::new(policy),
                current: None,
            })),
            events: tx,
        };
        (scheduler, rx)
    }

    /// Validates and submits a new process. Allowed in any state;
    /// a record submitted during a run is visible to the next snapshot
    /// and extraction immediately.
    pub fn submit_process(
        &self,
        name: impl Into<String>,
        priority: i32,
        execution_secs: f64,
    ) -> Result<(), SchedulerError> {
        let execution_time = validation::execution_time_from_secs(execution_secs)?;
        self.submit(Submission {
            name: name.into(),
            priority,
            execution_time,
        });
        Ok(())
    }

    /// Submits an already-validated [`Submission`], as produced by
    /// [`validation::parse_submission`].
    pub fn submit(&self, submission: Submission) {
        let Submission {
            name,
            priority,
            execution_time,
        } = submission;
        let record = ProcessRecord::new(name.clone(), priority, execution_time);
        {
            let mut state = self.lock_state();
            state.queue.submit(record);
        }
        debug!(name = %name, priority, execution_time = ?execution_time, "process submitted");
        self.emit(SchedulerEvent::StatusChanged {
            name,
            status: ProcessStatus::Waiting,
        });
    }

    /// Switches the ordering policy.
    ///
    /// Governs the next extraction and snapshot; never the in-flight run.
    pub fn set_policy(&self, policy: SchedulingPolicy) {
        self.lock_state().queue.set_policy(policy);
        debug!(policy = %policy, "scheduling policy changed");
    }

    /// The currently active ordering policy.
    pub fn policy(&self) -> SchedulingPolicy {
        self.lock_state().queue.policy()
    }

    /// Starts execution if idle and work is waiting.
    ///
    /// Idempotent: returns `false` without effect while a process is
    /// already executing, and when the queue is empty. Returns `true`
    /// when a run actually started. Must be called within a tokio
    /// runtime.
    pub fn start_or_continue(&self) -> bool {
        {
            let mut state = self.lock_state();
            if state.current.is_some() {
                debug!("start requested while already running; ignored");
                return false;
            }
            match state.queue.extract_min() {
                Ok(record) => {
                    state.current = Some(Executing {
                        record: record.clone(),
                        started: Instant::now(),
                    });
                    info!(
                        name = %record.name,
                        execution_time = ?record.execution_time,
                        "process started"
                    );
                    // Emitted under the lock: stream order matches the
                    // state transition.
                    self.emit(SchedulerEvent::StatusChanged {
                        name: record.name,
                        status: ProcessStatus::Executing,
                    });
                }
                Err(_) => return false,
            }
        }

        let runner = self.clone();
        tokio::spawn(async move { runner.run_loop().await });
        true
    }

    /// Waiting processes in the order the active policy would run them.
    pub fn waiting_snapshot(&self) -> Vec<ProcessRecord> {
        self.lock_state().queue.snapshot_ordered()
    }

    /// The currently executing process, if any.
    pub fn current(&self) -> Option<ProcessRecord> {
        self.lock_state().current.as_ref().map(|e| e.record.clone())
    }

    /// Whether no process is executing.
    pub fn is_idle(&self) -> bool {
        self.lock_state().current.is_none()
    }

    /// Number of waiting processes.
    pub fn queue_len(&self) -> usize {
        self.lock_state().queue.len()
    }

    /// Iterative execution loop: run the current process, then keep
    /// chaining into the next extraction until the queue drains.
    async fn run_loop(&self) {
        loop {
            let (name, duration, started) = {
                let state = self.lock_state();
                match state.current.as_ref() {
                    Some(e) => (e.record.name.clone(), e.record.execution_time, e.started),
                    None => return,
                }
            };

            // Simulated CPU work. Only this point suspends.
            sleep(duration).await;
            let elapsed = started.elapsed();

            info!(name = %name, elapsed = ?elapsed, "process completed");
            self.emit(SchedulerEvent::StatusChanged {
                name: name.clone(),
                status: ProcessStatus::Completed,
            });
            self.emit(SchedulerEvent::Completed { name, elapsed });

            // Clear the slot and chain to the next waiting process, if
            // any, under one lock so no competing start can slip in
            // between. The events are emitted in the same critical
            // section: a racing start cannot place its `Executing` ahead
            // of this drain's `QueueEmpty` in the stream.
            let chained = {
                let mut state = self.lock_state();
                state.current = None;
                match state.queue.extract_min() {
                    Ok(record) => {
                        state.current = Some(Executing {
                            record: record.clone(),
                            started: Instant::now(),
                        });
                        info!(
                            name = %record.name,
                            execution_time = ?record.execution_time,
                            "process started"
                        );
                        self.emit(SchedulerEvent::StatusChanged {
                            name: record.name,
                            status: ProcessStatus::Executing,
                        });
                        true
                    }
                    Err(_) => {
                        debug!("queue drained; runner idle");
                        self.emit(SchedulerEvent::QueueEmpty);
                        false
                    }
                }
            };

            if !chained {
                return;
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        // Lock poisoning only occurs after a panic in a critical section.
        self.state.lock().unwrap()
    }

    /// Best-effort event send; a dropped receiver never fails the runner.
    fn emit(&self, event: SchedulerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc::error::TryRecvError;

    /// Receives events until (and including) `QueueEmpty`.
    async fn collect_until_empty(
        rx: &mut UnboundedReceiver<SchedulerEvent>,
    ) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = event == SchedulerEvent::QueueEmpty;
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    fn completed_names(events: &[SchedulerEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                SchedulerEvent::Completed { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_zero_duration_process() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("quick", 1, 0.0).unwrap();
        assert!(scheduler.start_or_continue());

        let events = collect_until_empty(&mut rx).await;
        let completed = completed_names(&events);
        assert_eq!(completed, ["quick"]);

        match events
            .iter()
            .find(|e| matches!(e, SchedulerEvent::Completed { .. }))
        {
            Some(SchedulerEvent::Completed { elapsed, .. }) => {
                assert_eq!(*elapsed, Duration::ZERO);
            }
            _ => unreachable!(),
        }

        assert!(scheduler.is_idle());
        assert_eq!(scheduler.queue_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chaining_runs_all_without_external_trigger() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("A", 3, 2.0).unwrap();
        scheduler.submit_process("B", 1, 1.0).unwrap();
        scheduler.submit_process("C", 2, 5.0).unwrap();

        assert!(scheduler.start_or_continue());
        let events = collect_until_empty(&mut rx).await;

        // One start produced all three completions, in priority order.
        assert_eq!(completed_names(&events), ["B", "C", "A"]);
        assert!(scheduler.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sjf_completion_order() {
        let (scheduler, mut rx) =
            Scheduler::with_policy(SchedulingPolicy::ShortestJobFirst);
        scheduler.submit_process("A", 3, 2.0).unwrap();
        scheduler.submit_process("B", 1, 1.0).unwrap();
        scheduler.submit_process("C", 2, 5.0).unwrap();

        assert!(scheduler.start_or_continue());
        let events = collect_until_empty(&mut rx).await;
        assert_eq!(completed_names(&events), ["B", "A", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_matches_simulated_duration() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("work", 1, 2.0).unwrap();
        scheduler.start_or_continue();

        let events = collect_until_empty(&mut rx).await;
        match events
            .iter()
            .find(|e| matches!(e, SchedulerEvent::Completed { .. }))
        {
            Some(SchedulerEvent::Completed { elapsed, .. }) => {
                // Paused clock: elapsed is exactly the simulated run length.
                assert_eq!(*elapsed, Duration::from_secs(2));
            }
            _ => unreachable!(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent_while_running() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("long", 1, 10.0).unwrap();
        scheduler.submit_process("next", 2, 1.0).unwrap();

        assert!(scheduler.start_or_continue());
        assert!(!scheduler.start_or_continue());
        assert!(!scheduler.start_or_continue());

        let events = collect_until_empty(&mut rx).await;
        // Repeated starts added no extra runs or completions.
        assert_eq!(completed_names(&events), ["long", "next"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_with_empty_queue_stays_idle() {
        let (scheduler, mut rx) = Scheduler::new();
        assert!(!scheduler.start_or_continue());
        assert!(scheduler.is_idle());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submissions_during_run_are_visible() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("running", 1, 10.0).unwrap();
        scheduler.start_or_continue();

        scheduler.submit_process("late", 2, 1.0).unwrap();

        // Queue and current slot are disjoint and together hold every
        // submitted-but-not-completed record.
        let current = scheduler.current().unwrap();
        assert_eq!(current.name, "running");
        let waiting: Vec<String> = scheduler
            .waiting_snapshot()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(waiting, ["late"]);

        let events = collect_until_empty(&mut rx).await;
        assert_eq!(completed_names(&events), ["running", "late"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_switch_during_run_affects_next_extraction() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("running", 0, 10.0).unwrap();
        scheduler.start_or_continue();

        // Queued while running: under Priority, Y(1) would beat X(5).
        scheduler.submit_process("X", 5, 1.0).unwrap();
        scheduler.submit_process("Y", 1, 9.0).unwrap();
        scheduler.set_policy(SchedulingPolicy::ShortestJobFirst);

        let events = collect_until_empty(&mut rx).await;
        // SJF governs the chained extractions: X(1s) before Y(9s).
        assert_eq!(completed_names(&events), ["running", "X", "Y"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_transitions_in_order() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("only", 1, 1.0).unwrap();
        scheduler.start_or_continue();

        let events = collect_until_empty(&mut rx).await;
        assert_eq!(
            events,
            [
                SchedulerEvent::StatusChanged {
                    name: "only".into(),
                    status: ProcessStatus::Waiting,
                },
                SchedulerEvent::StatusChanged {
                    name: "only".into(),
                    status: ProcessStatus::Executing,
                },
                SchedulerEvent::StatusChanged {
                    name: "only".into(),
                    status: ProcessStatus::Completed,
                },
                SchedulerEvent::Completed {
                    name: "only".into(),
                    elapsed: Duration::from_secs(1),
                },
                SchedulerEvent::QueueEmpty,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submission_rejected() {
        let (scheduler, mut rx) = Scheduler::new();
        assert!(matches!(
            scheduler.submit_process("bad", 1, -1.0),
            Err(SchedulerError::InvalidInput(_))
        ));
        assert!(matches!(
            scheduler.submit_process("worse", 1, f64::NAN),
            Err(SchedulerError::InvalidInput(_))
        ));
        // Finite but unrepresentable as a Duration: rejected, not a panic.
        assert!(matches!(
            scheduler.submit_process("huge", 1, 1e300),
            Err(SchedulerError::InvalidInput(_))
        ));
        assert_eq!(scheduler.queue_len(), 0);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_parsed_submission() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit(validation::parse_submission("backup, 2, 1").unwrap());
        scheduler.submit(validation::parse_submission("index, 1, 2").unwrap());

        let waiting: Vec<String> = scheduler
            .waiting_snapshot()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(waiting, ["index", "backup"]);

        scheduler.start_or_continue();
        let events = collect_until_empty(&mut rx).await;
        assert_eq!(completed_names(&events), ["index", "backup"]);
    }

    /// At every `QueueEmpty` in the stream, each `Executing` must have a
    /// matching `Completed` before it — a consumer that sees the queue
    /// drain can never have an unreported run in flight, even when
    /// another thread restarts the scheduler at that exact moment.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_queue_empty_consistent_with_executions() {
        for _ in 0..20 {
            let (scheduler, mut rx) = Scheduler::new();
            scheduler.submit_process("a", 1, 0.0).unwrap();
            scheduler.start_or_continue();
            scheduler.submit_process("b", 1, 0.0).unwrap();

            let mut events = Vec::new();
            let mut completed = 0;
            loop {
                if completed >= 2 && events.last() == Some(&SchedulerEvent::QueueEmpty) {
                    break;
                }
                // Races the runner's drain for the restart.
                scheduler.start_or_continue();
                while let Ok(event) = rx.try_recv() {
                    if matches!(event, SchedulerEvent::Completed { .. }) {
                        completed += 1;
                    }
                    events.push(event);
                }
                tokio::task::yield_now().await;
            }

            let mut started = 0;
            let mut finished = 0;
            for event in &events {
                match event {
                    SchedulerEvent::StatusChanged {
                        status: ProcessStatus::Executing,
                        ..
                    } => started += 1,
                    SchedulerEvent::Completed { .. } => finished += 1,
                    SchedulerEvent::QueueEmpty => assert_eq!(started, finished),
                    _ => {}
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_drain() {
        let (scheduler, mut rx) = Scheduler::new();
        scheduler.submit_process("one", 1, 1.0).unwrap();
        scheduler.start_or_continue();
        let _ = collect_until_empty(&mut rx).await;

        scheduler.submit_process("two", 1, 1.0).unwrap();
        assert!(scheduler.start_or_continue());
        let events = collect_until_empty(&mut rx).await;
        assert_eq!(completed_names(&events), ["two"]);
    }
}
