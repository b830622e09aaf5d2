//! Boundary validation for process submissions.
//!
//! Raw submissions arrive as comma-separated "name, priority, seconds"
//! text or as already-typed fields. Everything here rejects malformed
//! input before it can reach the ready queue; a rejected submission is
//! reported to the caller for re-entry and has no other effect.

use std::time::Duration;

use crate::error::SchedulerError;

/// A parsed, validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Process name (trimmed, non-empty).
    pub name: String,
    /// Scheduling priority.
    pub priority: i32,
    /// Simulated execution duration.
    pub execution_time: Duration,
}

/// Converts user-supplied seconds into an execution duration.
///
/// Rejects NaN, infinite, and negative values, and values too large to
/// represent as a `Duration`.
pub fn execution_time_from_secs(secs: f64) -> Result<Duration, SchedulerError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        SchedulerError::InvalidInput(format!(
            "execution time must be a finite, non-negative number of seconds, got {secs}"
        ))
    })
}

/// Parses a comma-separated "name, priority, seconds" entry.
///
/// Fields are trimmed; exactly three are required. The priority must be
/// an integer and the execution time a finite non-negative number.
pub fn parse_submission(input: &str) -> Result<Submission, SchedulerError> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(SchedulerError::InvalidInput(format!(
            "expected 3 comma-separated fields (name, priority, execution time), got {}",
            fields.len()
        )));
    }

    let name = fields[0];
    if name.is_empty() {
        return Err(SchedulerError::InvalidInput(
            "process name must not be empty".into(),
        ));
    }

    let priority: i32 = fields[1].parse().map_err(|_| {
        SchedulerError::InvalidInput(format!("priority must be an integer, got '{}'", fields[1]))
    })?;

    let secs: f64 = fields[2].parse().map_err(|_| {
        SchedulerError::InvalidInput(format!(
            "execution time must be a number, got '{}'",
            fields[2]
        ))
    })?;

    Ok(Submission {
        name: name.to_string(),
        priority,
        execution_time: execution_time_from_secs(secs)?,
    })
}
