//! Task execution.
//!
//! Runs one task to completion: mark it started, wait out the simulated
//! processing delay, call the analyzer, and record the outcome together with
//! agent metrics. Analyzer errors and panics both fail the task; nothing
//! escapes to the caller and nothing is retried.

use super::Orchestrator;
use crate::events::{Event, EventAction};
use crate::task::{AnalysisResult, Task};
use chrono::Utc;
use serde_json::json;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

/// Where a submitted task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Detached worker thread; `submit_task` returns immediately.
    #[default]
    Background,
    /// On the caller's thread; `submit_task` returns the finished task.
    Inline,
}

/// Start execution of an already-stored task.
pub(super) fn dispatch(orchestrator: &Orchestrator, task_id: &str, mode: ExecutionMode) {
    match mode {
        ExecutionMode::Inline => run_task(orchestrator, task_id),
        ExecutionMode::Background => {
            let worker = orchestrator.clone();
            let id = task_id.to_string();
            let spawned = thread::Builder::new()
                .name(format!("exec-{}", task_id))
                .spawn(move || run_task(&worker, &id));

            if let Err(e) = spawned {
                tracing::error!(task = %task_id, error = %e, "failed to start worker thread");
                let message = format!("failed to start worker thread: {}", e);
                finish(orchestrator, task_id, Err(message), 0.0);
            }
        }
    }
}

fn run_task(orchestrator: &Orchestrator, task_id: &str) {
    let started = Instant::now();

    let Some(snapshot) = begin(orchestrator, task_id) else {
        return;
    };

    let delay = orchestrator.settings.analysis_delay;
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let analyzer = orchestrator.analyzer.clone();
    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(&snapshot))) {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(format!("analyzer panicked: {}", panic_message(payload.as_ref()))),
    };

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    finish(orchestrator, task_id, outcome, elapsed_ms);
}

/// Mark the task in progress and its agents busy. Returns a copy for the
/// analyzer, or `None` if the task is gone or already past pending.
fn begin(orchestrator: &Orchestrator, task_id: &str) -> Option<Task> {
    let mut state = orchestrator.lock();
    let task = state.tasks.get_mut(task_id)?;
    if task.status.is_finished() {
        return None;
    }
    task.mark_started(Utc::now());
    let snapshot = task.clone();

    for agent_id in &snapshot.assigned_agents {
        if let Some(agent) = state.registry.get_mut(agent_id) {
            agent.begin_task();
        }
    }
    Some(snapshot)
}

fn finish(
    orchestrator: &Orchestrator,
    task_id: &str,
    outcome: std::result::Result<AnalysisResult, String>,
    elapsed_ms: f64,
) {
    let (event, assigned) = {
        let mut state = orchestrator.lock();
        let Some(task) = state.tasks.get_mut(task_id) else {
            return;
        };
        let now = Utc::now();
        let event = match outcome {
            Ok(result) => {
                let event = Event::new(EventAction::TaskComplete)
                    .with_task(task_id)
                    .with_details(json!({
                        "analysis_type": result.analysis_type,
                        "elapsed_ms": elapsed_ms,
                    }));
                task.mark_completed(result, now);
                event
            }
            Err(message) => {
                let event = Event::new(EventAction::TaskFail)
                    .with_task(task_id)
                    .with_details(json!({ "error": message }));
                task.mark_failed(message, now);
                event
            }
        };
        let assigned = task.assigned_agents.clone();
        let succeeded = task.result().is_some();

        for agent_id in &assigned {
            if let Some(agent) = state.registry.get_mut(agent_id) {
                agent.end_task();
            }
            let recorded = if succeeded {
                state.registry.record_success(agent_id, elapsed_ms)
            } else {
                state.registry.record_failure(agent_id)
            };
            if let Err(e) = recorded {
                tracing::warn!(task = %task_id, agent = %agent_id, error = %e, "metrics not updated");
            }
        }
        (event, assigned)
    };

    match event.action {
        EventAction::TaskComplete => tracing::info!(
            task = %task_id,
            agents = assigned.len(),
            elapsed_ms,
            "task completed"
        ),
        _ => tracing::error!(task = %task_id, details = %event.details, "task failed"),
    }
    orchestrator.events.emit(event);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
