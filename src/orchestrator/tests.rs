//! Tests for the orchestrator: submission, execution, metrics, and waiting.

use super::*;
use crate::agent::Agent;
use crate::agent::model::AgentStatus;
use crate::error::SwarmError;
use crate::task::TaskOutcome;
use crate::task::analysis::AnalysisKind;
use crate::test_support::fast_config;
use tempfile::TempDir;

struct FailingAnalyzer;

impl Analyzer for FailingAnalyzer {
    fn analyze(&self, _task: &Task) -> Result<AnalysisResult> {
        Err(SwarmError::TaskFailed("analysis backend unavailable".to_string()))
    }
}

struct PanickingAnalyzer;

impl Analyzer for PanickingAnalyzer {
    fn analyze(&self, _task: &Task) -> Result<AnalysisResult> {
        panic!("analyzer blew up");
    }
}

fn inline() -> SubmitOptions {
    SubmitOptions {
        mode: ExecutionMode::Inline,
        ..Default::default()
    }
}

fn agent_by_id(orchestrator: &Orchestrator, id: &str) -> Agent {
    orchestrator
        .agents()
        .into_iter()
        .find(|agent| agent.id == id)
        .unwrap()
}

fn orchestrator_with_team() -> Orchestrator {
    let orchestrator = Orchestrator::new(&fast_config());
    orchestrator
        .spawn_agent("Coordinator", AgentType::Coordinator, vec![])
        .unwrap();
    orchestrator
        .spawn_agent("Researcher", AgentType::Researcher, vec!["fabric_investigation".into()])
        .unwrap();
    orchestrator
        .spawn_agent("Analyst", AgentType::Analyst, vec![])
        .unwrap();
    orchestrator
        .spawn_agent("Specialist", AgentType::Specialist, vec![])
        .unwrap();
    orchestrator
}

// ============================================================================
// Swarm
// ============================================================================

#[test]
fn test_new_uses_config_defaults() {
    let mut config = fast_config();
    config.swarm.topology = Topology::Mesh;
    config.swarm.max_agents = 5;

    let swarm = Orchestrator::new(&config).swarm();
    assert_eq!(swarm.topology, Topology::Mesh);
    assert_eq!(swarm.max_agents, 5);
    assert_eq!(swarm.strategy, "adaptive");
    assert!(swarm.swarm_id.starts_with("swarm-"));
}

#[test]
fn test_init_swarm_overrides_only_given_fields() {
    let orchestrator = Orchestrator::new(&fast_config());
    let before = orchestrator.swarm();

    let info = orchestrator
        .init_swarm(SwarmInit {
            topology: Some(Topology::Star),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(info.topology, Topology::Star);
    assert_eq!(info.max_agents, before.max_agents);
    assert_eq!(info.strategy, before.strategy);
    assert_eq!(orchestrator.swarm(), info);
}

#[test]
fn test_init_swarm_rejects_zero_max_agents() {
    let orchestrator = Orchestrator::new(&fast_config());
    let err = orchestrator
        .init_swarm(SwarmInit {
            max_agents: Some(0),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, SwarmError::ValidationError(_)));
}

#[test]
fn test_init_swarm_capacity_limits_spawns() {
    let orchestrator = Orchestrator::new(&fast_config());
    orchestrator
        .init_swarm(SwarmInit {
            max_agents: Some(1),
            ..Default::default()
        })
        .unwrap();

    orchestrator.spawn_agent("a", AgentType::Coder, vec![]).unwrap();
    assert!(orchestrator.spawn_agent("b", AgentType::Coder, vec![]).is_err());
}

// ============================================================================
// Submission and execution
// ============================================================================

#[test]
fn test_inline_fabric_task_completes() {
    let orchestrator = orchestrator_with_team();

    let task = orchestrator.submit_task("Fabric is undefined", inline()).unwrap();

    assert_eq!(task.status, TaskStatus::Completed);
    let result = task.result().unwrap();
    assert_eq!(result.analysis_type, AnalysisKind::FabricJsLoadingFailure);
    assert!(task.completed_at.is_some());
}

#[test]
fn test_assigned_agents_are_registered() {
    let orchestrator = orchestrator_with_team();
    let registered: Vec<String> = orchestrator.agents().into_iter().map(|a| a.id).collect();

    for description in ["fabric", "webpack", "phantom", "console cleanup"] {
        let task = orchestrator.submit_task(description, inline()).unwrap();
        assert!(!task.assigned_agents.is_empty());
        for id in &task.assigned_agents {
            assert!(registered.contains(id));
        }
    }
}

#[test]
fn test_submit_with_no_agents_still_runs() {
    let orchestrator = Orchestrator::new(&fast_config());
    let task = orchestrator.submit_task("fabric", inline()).unwrap();

    assert!(task.assigned_agents.is_empty());
    assert_eq!(task.status, TaskStatus::Completed);
}

#[test]
fn test_max_agents_option_truncates_selection() {
    let orchestrator = orchestrator_with_team();
    let task = orchestrator
        .submit_task(
            "unrelated work",
            SubmitOptions {
                mode: ExecutionMode::Inline,
                max_agents: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(task.assigned_agents.len(), 1);
}

#[test]
fn test_priority_is_recorded() {
    let orchestrator = orchestrator_with_team();
    let task = orchestrator
        .submit_task(
            "x",
            SubmitOptions {
                priority: Priority::Critical,
                mode: ExecutionMode::Inline,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(task.priority, Priority::Critical);
}

#[test]
fn test_background_task_finishes_after_wait() {
    let orchestrator = orchestrator_with_team();

    let submitted = orchestrator
        .submit_task("webpack vendor bundle", SubmitOptions::default())
        .unwrap();
    assert_eq!(submitted.status, TaskStatus::Pending);

    let outcome = orchestrator.wait_for(&submitted.id).unwrap();
    assert!(!outcome.timed_out());
    let task = outcome.into_task();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(
        task.result().unwrap().analysis_type,
        AnalysisKind::WebpackBundleInvestigation
    );
}

#[test]
fn test_completed_task_updates_agent_metrics() {
    let orchestrator = orchestrator_with_team();
    let task = orchestrator.submit_task("fabric", inline()).unwrap();

    for id in &task.assigned_agents {
        let agent = agent_by_id(&orchestrator, id);
        assert_eq!(agent.metrics.tasks_completed, 1);
        assert_eq!(agent.metrics.success_rate, 1.0);
        assert_eq!(agent.status, AgentStatus::Idle);
    }
}

#[test]
fn test_failing_analyzer_fails_task_and_counts_failure() {
    let orchestrator = orchestrator_with_team().with_analyzer(Arc::new(FailingAnalyzer));

    let task = orchestrator.submit_task("fabric", inline()).unwrap();

    assert_eq!(task.status, TaskStatus::Failed);
    assert_eq!(
        task.outcome,
        Some(TaskOutcome::Error("analysis backend unavailable".to_string()))
    );
    for id in &task.assigned_agents {
        let metrics = agent_by_id(&orchestrator, id).metrics;
        assert_eq!(metrics.tasks_failed, 1);
        assert_eq!(metrics.tasks_completed, 0);
        assert_eq!(metrics.success_rate, 0.0);
    }
}

#[test]
fn test_panicking_analyzer_fails_task() {
    let orchestrator = orchestrator_with_team().with_analyzer(Arc::new(PanickingAnalyzer));

    let task = orchestrator.submit_task("phantom", inline()).unwrap();

    assert_eq!(task.status, TaskStatus::Failed);
    assert!(task.error().unwrap().contains("analyzer blew up"));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_unknown_task_is_not_found() {
    let orchestrator = Orchestrator::new(&fast_config());

    let err = orchestrator.task("task-missing").unwrap_err();
    assert_eq!(err.to_string(), "Task task-missing not found");
    assert!(matches!(
        orchestrator.wait_for("task-missing"),
        Err(SwarmError::NotFound(_))
    ));
    assert!(matches!(
        orchestrator.task_results("task-missing"),
        Err(SwarmError::NotFound(_))
    ));
}

#[test]
fn test_task_results_requires_completion() {
    let orchestrator = orchestrator_with_team().with_analyzer(Arc::new(FailingAnalyzer));
    let task = orchestrator.submit_task("fabric", inline()).unwrap();

    let err = orchestrator.task_results(&task.id).unwrap_err();
    assert!(err.to_string().contains("not completed yet (status: failed)"));
}

#[test]
fn test_task_results_returns_result() {
    let orchestrator = orchestrator_with_team();
    let task = orchestrator.submit_task("something else", inline()).unwrap();

    let result = orchestrator.task_results(&task.id).unwrap();
    assert_eq!(result.task_description.as_deref(), Some("something else"));
}

#[test]
fn test_wait_gives_up_without_error() {
    let mut config = fast_config();
    config.analysis_delay_ms = 2_000;
    let orchestrator = Orchestrator::new(&config);

    let task = orchestrator.submit_task("fabric", SubmitOptions::default()).unwrap();
    let outcome = orchestrator
        .wait_for_with(
            &task.id,
            WaitSettings {
                poll_interval_ms: 1,
                max_polls: 2,
            },
        )
        .unwrap();

    assert!(outcome.timed_out());
    assert!(!outcome.into_task().status.is_finished());
}

#[test]
fn test_status_counts() {
    let orchestrator = orchestrator_with_team();
    orchestrator.submit_task("fabric", inline()).unwrap();
    orchestrator.submit_task("webpack", inline()).unwrap();

    let failing = orchestrator.clone().with_analyzer(Arc::new(FailingAnalyzer));
    failing.submit_task("phantom", inline()).unwrap();

    let status = orchestrator.status();
    assert_eq!(status.agent_count, 4);
    assert_eq!(status.total_tasks, 3);
    assert_eq!(status.completed_tasks, 2);
    assert_eq!(status.failed_tasks, 1);
    assert_eq!(status.active_tasks, 0);
    assert_eq!(status.agents_by_type["researcher"], 1);
    assert_eq!(status.agents_by_type["optimizer"], 0);
}

#[test]
fn test_tasks_in_submission_order() {
    let orchestrator = orchestrator_with_team();
    let a = orchestrator.submit_task("first", inline()).unwrap();
    let b = orchestrator.submit_task("second", inline()).unwrap();

    let ids: Vec<String> = orchestrator.tasks().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_lifecycle_events_are_logged() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("logs").join("events.ndjson");
    let orchestrator =
        Orchestrator::new(&fast_config()).with_events(EventSink::new(Some(log.clone())));

    orchestrator.init_swarm(SwarmInit::default()).unwrap();
    orchestrator.spawn_agent("a", AgentType::Analyst, vec![]).unwrap();
    let task = orchestrator.submit_task("fabric", inline()).unwrap();

    let content = std::fs::read_to_string(&log).unwrap();
    let actions: Vec<String> = content
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["action"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(
        actions,
        vec!["swarm_init", "agent_spawn", "task_submit", "task_complete"]
    );
    assert!(content.contains(&task.id));
}
