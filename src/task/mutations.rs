//! Lifecycle transitions.
//!
//! Transitions out of a finished state are ignored so a late writer can
//! never overwrite a recorded outcome.

use super::{AnalysisResult, Task, TaskOutcome, TaskStatus};
use chrono::{DateTime, Utc};

impl Task {
    /// Move a pending task to in_progress.
    pub fn mark_started(&mut self, time: DateTime<Utc>) {
        if self.status != TaskStatus::Pending {
            return;
        }
        self.status = TaskStatus::InProgress;
        self.started_at = Some(time);
    }

    /// Record a successful result.
    pub fn mark_completed(&mut self, result: AnalysisResult, time: DateTime<Utc>) {
        if self.status.is_finished() {
            return;
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(time);
        self.outcome = Some(TaskOutcome::Result(result));
    }

    /// Record a failure with its error message.
    pub fn mark_failed(&mut self, error: impl Into<String>, time: DateTime<Utc>) {
        if self.status.is_finished() {
            return;
        }
        self.status = TaskStatus::Failed;
        self.completed_at = Some(time);
        self.outcome = Some(TaskOutcome::Error(error.into()));
    }
}
