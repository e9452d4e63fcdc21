//! The seven swarm tools.
//!
//! Malformed arguments are protocol errors (`-32602`). Everything the
//! orchestrator refuses (unknown ids, unfinished tasks, full swarm) is a
//! normal tool result with `"success": false` and `isError: true`.

use super::protocol::{CallToolResult, JsonRpcError, ToolDefinition};
use crate::agent::{Agent, AgentType};
use crate::config::Topology;
use crate::error::SwarmError;
use crate::orchestrator::{Orchestrator, SubmitOptions, SwarmInit};
use crate::task::{Priority, Task};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

type ToolResult = std::result::Result<CallToolResult, JsonRpcError>;

/// Run a tool by name.
///
/// # Errors
///
/// `-32602` for an unknown tool or arguments that do not fit its schema.
pub fn call_tool(orchestrator: &Orchestrator, name: &str, arguments: Value) -> ToolResult {
    match name {
        "swarm_init" => swarm_init(orchestrator, parse_args(arguments)?),
        "agent_spawn" => agent_spawn(orchestrator, parse_args(arguments)?),
        "task_orchestrate" => task_orchestrate(orchestrator, parse_args(arguments)?),
        "task_status" => task_status(orchestrator, parse_args(arguments)?),
        "task_results" => task_results(orchestrator, parse_args(arguments)?),
        "agent_list" => Ok(agent_list(orchestrator)),
        "swarm_status" => Ok(swarm_status(orchestrator)),
        other => Err(JsonRpcError::invalid_params(format!("unknown tool '{}'", other))),
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> std::result::Result<T, JsonRpcError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn ok(payload: Value) -> CallToolResult {
    CallToolResult::json(&payload, false)
}

fn failure(error: &SwarmError) -> CallToolResult {
    CallToolResult::json(&json!({ "success": false, "error": error.to_string() }), true)
}

// ============================================================================
// swarm_init
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct SwarmInitArgs {
    #[serde(default)]
    topology: Option<String>,
    #[serde(default)]
    max_agents: Option<usize>,
    #[serde(default)]
    strategy: Option<String>,
}

fn swarm_init(orchestrator: &Orchestrator, args: SwarmInitArgs) -> ToolResult {
    let topology = match args.topology.as_deref() {
        None => None,
        Some(raw) => Some(Topology::from_str(raw).ok_or_else(|| {
            JsonRpcError::invalid_params(format!(
                "unknown topology '{}'; expected hierarchical, mesh, ring, or star",
                raw
            ))
        })?),
    };
    if args.max_agents == Some(0) {
        return Err(JsonRpcError::invalid_params("max_agents must be greater than zero"));
    }

    let info = match orchestrator.init_swarm(SwarmInit {
        topology,
        max_agents: args.max_agents,
        strategy: args.strategy,
    }) {
        Ok(info) => info,
        Err(e) => return Ok(failure(&e)),
    };

    Ok(ok(json!({
        "success": true,
        "swarm_id": info.swarm_id,
        "topology": info.topology,
        "max_agents": info.max_agents,
        "strategy": info.strategy,
        "initialized_at": info.initialized_at,
        "message": format!(
            "Initialized {} swarm with {} max agents",
            info.topology, info.max_agents
        ),
    })))
}

// ============================================================================
// agent_spawn
// ============================================================================

#[derive(Debug, Deserialize)]
struct AgentSpawnArgs {
    agent_type: String,
    name: String,
    #[serde(default)]
    capabilities: Vec<String>,
}

fn agent_json(agent: &Agent) -> Value {
    json!({
        "agent_id": agent.id,
        "name": agent.name,
        "type": agent.agent_type,
        "capabilities": agent.capabilities,
        "status": agent.status,
        "created_at": agent.created_at,
        "metrics": agent.metrics,
    })
}

fn agent_spawn(orchestrator: &Orchestrator, args: AgentSpawnArgs) -> ToolResult {
    let agent_type: AgentType = match args.agent_type.parse() {
        Ok(t) => t,
        Err(e) => {
            return Ok(CallToolResult::json(
                &json!({
                    "success": false,
                    "error": e.to_string(),
                    "valid_types": AgentType::valid_names(),
                }),
                true,
            ));
        }
    };

    match orchestrator.spawn_agent(&args.name, agent_type, args.capabilities) {
        Ok(agent) => {
            let mut payload = agent_json(&agent);
            payload["success"] = json!(true);
            payload["message"] = json!(format!("Spawned {} agent: {}", agent.agent_type, agent.name));
            Ok(ok(payload))
        }
        Err(e) => Ok(failure(&e)),
    }
}

// ============================================================================
// task_orchestrate
// ============================================================================

#[derive(Debug, Deserialize)]
struct TaskOrchestrateArgs {
    task: String,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
    #[serde(default)]
    max_agents: Option<usize>,
}

fn task_orchestrate(orchestrator: &Orchestrator, args: TaskOrchestrateArgs) -> ToolResult {
    let priority = match args.priority.as_deref() {
        None => Priority::default(),
        Some(raw) => raw
            .parse::<Priority>()
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?,
    };
    let strategy = args.strategy.unwrap_or_else(|| orchestrator.swarm().strategy);

    let options = SubmitOptions {
        priority,
        max_agents: args.max_agents,
        ..Default::default()
    };
    let task = match orchestrator.submit_task(&args.task, options) {
        Ok(task) => task,
        Err(e) => return Ok(failure(&e)),
    };

    Ok(ok(json!({
        "success": true,
        "task_id": task.id,
        "description": task.description,
        "status": task.status,
        "assigned_agents": task.assigned_agents,
        "priority": task.priority,
        "strategy": strategy,
        "message": format!("Task orchestrated across {} agents", task.assigned_agents.len()),
    })))
}

// ============================================================================
// task_status / task_results
// ============================================================================

#[derive(Debug, Deserialize)]
struct TaskIdArgs {
    task_id: String,
}

fn task_status_json(task: &Task) -> Value {
    let mut payload = json!({
        "success": true,
        "task_id": task.id,
        "status": task.status,
        "description": task.description,
        "priority": task.priority,
        "assigned_agents": task.assigned_agents,
        "created_at": task.created_at,
        "started_at": task.started_at,
        "completed_at": task.completed_at,
        "execution_time_ms": task.execution_time_ms(),
        "progress": task.status.progress(),
    });
    if let Some(error) = task.error() {
        payload["error"] = json!(error);
    }
    payload
}

fn task_status(orchestrator: &Orchestrator, args: TaskIdArgs) -> ToolResult {
    match orchestrator.task(&args.task_id) {
        Ok(task) => Ok(ok(task_status_json(&task))),
        Err(e) => Ok(failure(&e)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum ResultFormat {
    #[default]
    Detailed,
    Summary,
}

#[derive(Debug, Deserialize)]
struct TaskResultsArgs {
    task_id: String,
    #[serde(default)]
    format: ResultFormat,
}

fn task_results(orchestrator: &Orchestrator, args: TaskResultsArgs) -> ToolResult {
    let result = match orchestrator.task_results(&args.task_id) {
        Ok(result) => result,
        Err(e) => return Ok(failure(&e)),
    };

    let payload = match args.format {
        ResultFormat::Detailed => json!({
            "success": true,
            "task_id": args.task_id,
            "format": "detailed",
            "results": result,
        }),
        ResultFormat::Summary => json!({
            "success": true,
            "task_id": args.task_id,
            "format": "summary",
            "analysis_type": result.analysis_type,
            "summary": result.summary,
            "confidence": result.confidence,
            "findings": result.findings.len(),
            "recommendations": result.recommendations.len(),
        }),
    };
    Ok(ok(payload))
}

// ============================================================================
// agent_list / swarm_status
// ============================================================================

fn agent_list(orchestrator: &Orchestrator) -> CallToolResult {
    let agents: Vec<Value> = orchestrator.agents().iter().map(agent_json).collect();
    ok(json!({
        "success": true,
        "total_agents": agents.len(),
        "agents": agents,
        "swarm": orchestrator.swarm(),
    }))
}

fn swarm_status(orchestrator: &Orchestrator) -> CallToolResult {
    let status = orchestrator.status();
    ok(json!({
        "success": true,
        "swarm": status.swarm,
        "agents": {
            "total": status.agent_count,
            "by_type": status.agents_by_type,
        },
        "tasks": {
            "total": status.total_tasks,
            "active": status.active_tasks,
            "completed": status.completed_tasks,
            "failed": status.failed_tasks,
        },
    }))
}

// ============================================================================
// Definitions
// ============================================================================

/// `tools/list` entries, in a fixed order.
pub fn definitions() -> Vec<ToolDefinition> {
    let def = |name: &str, description: &str, input_schema: Value| ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    };
    let task_id_schema = json!({
        "type": "object",
        "properties": { "task_id": { "type": "string" } },
        "required": ["task_id"],
    });
    let no_args = json!({ "type": "object", "properties": {} });

    vec![
        def(
            "swarm_init",
            "Initialize the swarm with a topology, agent limit, and strategy",
            json!({
                "type": "object",
                "properties": {
                    "topology": { "type": "string", "enum": ["hierarchical", "mesh", "ring", "star"] },
                    "max_agents": { "type": "integer", "minimum": 1 },
                    "strategy": { "type": "string" },
                },
            }),
        ),
        def(
            "agent_spawn",
            "Register an agent with a type and capability tags",
            json!({
                "type": "object",
                "properties": {
                    "agent_type": { "type": "string", "enum": AgentType::valid_names() },
                    "name": { "type": "string" },
                    "capabilities": { "type": "array", "items": { "type": "string" } },
                },
                "required": ["agent_type", "name"],
            }),
        ),
        def(
            "task_orchestrate",
            "Submit a task; agents are selected by keyword and the task runs in the background",
            json!({
                "type": "object",
                "properties": {
                    "task": { "type": "string" },
                    "priority": { "type": "string", "enum": ["low", "medium", "high", "critical"] },
                    "strategy": { "type": "string" },
                    "max_agents": { "type": "integer", "minimum": 0 },
                },
                "required": ["task"],
            }),
        ),
        def("task_status", "Status, progress, and timings of a task", task_id_schema),
        def(
            "task_results",
            "Analysis result of a completed task",
            json!({
                "type": "object",
                "properties": {
                    "task_id": { "type": "string" },
                    "format": { "type": "string", "enum": ["detailed", "summary"] },
                },
                "required": ["task_id"],
            }),
        ),
        def("agent_list", "All agents with metrics and the swarm settings", no_args.clone()),
        def("swarm_status", "Aggregate agent and task counts", no_args),
    ]
}
