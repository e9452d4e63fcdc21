//! Append-only audit log for swarm activity.
//!
//! Events are stored as NDJSON (one JSON object per line) at the path given by
//! the `events_log` config key. When no path is configured the sink is
//! disabled and every append is a no-op.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The action performed (swarm_init, agent_spawn, task_submit, ...)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `task`: Optional task ID for task-specific events
//! - `details`: Freeform object with action-specific details

use crate::error::{Result, SwarmError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Swarm (re)initialized
    SwarmInit,
    /// Agent added to the registry
    AgentSpawn,
    /// Task accepted and agents assigned
    TaskSubmit,
    /// Task finished with a result
    TaskComplete,
    /// Task finished with an error
    TaskFail,
    /// Evidence scan finished
    Scan,
    /// JSON report written
    ReportWrite,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::SwarmInit => write!(f, "swarm_init"),
            EventAction::AgentSpawn => write!(f, "agent_spawn"),
            EventAction::TaskSubmit => write!(f, "task_submit"),
            EventAction::TaskComplete => write!(f, "task_complete"),
            EventAction::TaskFail => write!(f, "task_fail"),
            EventAction::Scan => write!(f, "scan"),
            EventAction::ReportWrite => write!(f, "report_write"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Optional task ID for task-specific events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped now.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            task: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the task ID for this event.
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task = Some(task_id.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SwarmError::UserError(format!("failed to serialize event: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event as one line to `path`, creating the file and its parent
/// directory if needed.
pub fn append_event(path: &Path, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| {
            SwarmError::Io(format!(
                "failed to create events directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            SwarmError::Io(format!(
                "failed to open events file '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        SwarmError::Io(format!(
            "failed to write event to '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Shared, best-effort event writer.
///
/// Background task threads and the foreground share one sink; the mutex keeps
/// concurrent appends from interleaving within a line.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    path: Option<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl EventSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// A sink that drops every event.
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an event. Failures are logged and swallowed.
    pub fn emit(&self, event: Event) {
        let Some(path) = &self.path else {
            return;
        };

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        if let Err(err) = append_event(path, &event) {
            tracing::warn!(
                action = %event.action,
                path = %path.display(),
                error = %err,
                "event log write failed"
            );
        }
    }
}
