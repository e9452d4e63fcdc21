//! Tests for the JSON-RPC tool server.

use super::protocol::*;
use super::*;
use crate::orchestrator::Orchestrator;
use crate::test_support::fast_config;
use serde_json::{Value, json};
use std::io::Cursor;

fn server() -> ToolServer {
    ToolServer::new(Orchestrator::new(&fast_config()))
}

fn request(id: i64, method: &str, params: Value) -> String {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }).to_string()
}

fn send(server: &ToolServer, line: &str) -> JsonRpcResponse {
    let reply = server.handle_line(line).expect("expected a response");
    serde_json::from_str(&reply).unwrap()
}

/// Call a tool and return `(payload, isError)`.
fn call(server: &ToolServer, name: &str, arguments: Value) -> (Value, bool) {
    let response = send(
        server,
        &request(1, "tools/call", json!({ "name": name, "arguments": arguments })),
    );
    assert!(!response.is_error(), "unexpected error: {:?}", response.error);
    let result: CallToolResult = serde_json::from_value(response.result.unwrap()).unwrap();
    (result.payload().unwrap(), result.is_error)
}

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn test_initialize_reports_server_info() {
    let server = server().with_name("test-swarm");
    let response = send(&server, &request(1, "initialize", json!({})));

    let result = response.result.unwrap();
    assert_eq!(response.id, json!(1));
    assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(result["serverInfo"]["name"], "test-swarm");
    assert!(result["capabilities"]["tools"].is_object());
}

#[test]
fn test_ping() {
    let response = send(&server(), &request(7, "ping", Value::Null));
    assert_eq!(response.id, json!(7));
    assert_eq!(response.result, Some(json!({})));
}

#[test]
fn test_tools_list_has_seven_tools() {
    let response = send(&server(), &request(2, "tools/list", json!({})));
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "swarm_init",
            "agent_spawn",
            "task_orchestrate",
            "task_status",
            "task_results",
            "agent_list",
            "swarm_status",
        ]
    );
    for tool in &tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[test]
fn test_malformed_json_is_parse_error() {
    let response = send(&server(), "{\"jsonrpc\": \"2.0\", \"id\": 1,");
    assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    assert_eq!(response.id, Value::Null);
}

#[test]
fn test_unknown_method() {
    let response = send(&server(), &request(3, "resources/list", json!({})));
    let error = response.error.unwrap();
    assert_eq!(error.code, METHOD_NOT_FOUND);
    assert!(error.message.contains("resources/list"));
}

#[test]
fn test_missing_method_is_invalid_request() {
    let response = send(&server(), r#"{"jsonrpc":"2.0","id":4}"#);
    assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    assert_eq!(response.id, json!(4));
}

#[test]
fn test_wrong_version_is_invalid_request() {
    let response = send(&server(), r#"{"jsonrpc":"1.0","id":5,"method":"ping"}"#);
    assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
}

#[test]
fn test_notifications_get_no_reply() {
    let server = server();
    assert!(server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .is_none());
    assert!(server.handle_line(r#"{"jsonrpc":"2.0","method":"ping"}"#).is_none());
    assert!(server.handle_line("   ").is_none());
}

#[test]
fn test_notification_tool_call_still_runs() {
    let server = server();
    let line = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": { "name": "agent_spawn", "arguments": { "agent_type": "analyst", "name": "Quiet" } },
    })
    .to_string();

    assert!(server.handle_line(&line).is_none());
    assert_eq!(server.orchestrator().agents().len(), 1);
}

#[test]
fn test_tools_call_requires_params() {
    let response = send(&server(), r#"{"jsonrpc":"2.0","id":1,"method":"tools/call"}"#);
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn test_unknown_tool_is_invalid_params() {
    let response = send(
        &server(),
        &request(1, "tools/call", json!({ "name": "neural_train", "arguments": {} })),
    );
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn test_serve_answers_each_line() {
    let server = server();
    let input = format!(
        "{}\n\n{}\n{}\n",
        request(1, "ping", json!({})),
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        request(2, "tools/list", json!({}))
    );
    let mut output = Vec::new();

    server.serve(Cursor::new(input), &mut output).unwrap();

    let lines: Vec<JsonRpcResponse> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].id, json!(1));
    assert_eq!(lines[1].id, json!(2));
}

// ============================================================================
// Tools
// ============================================================================

#[test]
fn test_swarm_init_tool() {
    let server = server();
    let (payload, is_error) = call(
        &server,
        "swarm_init",
        json!({ "topology": "mesh", "max_agents": 4, "strategy": "balanced" }),
    );

    assert!(!is_error);
    assert_eq!(payload["success"], true);
    assert_eq!(payload["topology"], "mesh");
    assert_eq!(payload["max_agents"], 4);
    assert!(payload["swarm_id"].as_str().unwrap().starts_with("swarm-"));
}

#[test]
fn test_swarm_init_rejects_unknown_topology() {
    let response = send(
        &server(),
        &request(1, "tools/call", json!({ "name": "swarm_init", "arguments": { "topology": "blob" } })),
    );
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn test_agent_spawn_tool() {
    let server = server();
    let (payload, is_error) = call(
        &server,
        "agent_spawn",
        json!({ "agent_type": "researcher", "name": "FabricInvestigator", "capabilities": ["fabric_investigation"] }),
    );

    assert!(!is_error);
    assert_eq!(payload["type"], "researcher");
    assert!(payload["agent_id"].as_str().unwrap().starts_with("agent-"));
    assert_eq!(payload["capabilities"][0], "fabric_investigation");
}

#[test]
fn test_agent_spawn_invalid_type_lists_valid_types() {
    let (payload, is_error) = call(
        &server(),
        "agent_spawn",
        json!({ "agent_type": "wizard", "name": "Merlin", "capabilities": [] }),
    );

    assert!(is_error);
    assert_eq!(payload["success"], false);
    assert_eq!(payload["valid_types"].as_array().unwrap().len(), 7);
}

#[test]
fn test_agent_spawn_missing_name_is_invalid_params() {
    let response = send(
        &server(),
        &request(1, "tools/call", json!({ "name": "agent_spawn", "arguments": { "agent_type": "coder" } })),
    );
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn test_orchestrate_then_status_and_results() {
    let server = server();
    call(&server, "agent_spawn", json!({ "agent_type": "researcher", "name": "R" }));
    call(&server, "agent_spawn", json!({ "agent_type": "analyst", "name": "A" }));

    let (submitted, _) = call(
        &server,
        "task_orchestrate",
        json!({ "task": "Investigate Fabric loading", "priority": "high" }),
    );
    let task_id = submitted["task_id"].as_str().unwrap().to_string();
    assert_eq!(submitted["priority"], "high");
    assert_eq!(submitted["assigned_agents"].as_array().unwrap().len(), 2);

    server.orchestrator().wait_for(&task_id).unwrap();

    let (status, is_error) = call(&server, "task_status", json!({ "task_id": task_id }));
    assert!(!is_error);
    assert_eq!(status["status"], "completed");
    assert_eq!(status["progress"], 1.0);
    assert!(status["execution_time_ms"].is_i64());

    let (results, _) = call(&server, "task_results", json!({ "task_id": task_id }));
    assert_eq!(results["results"]["analysis_type"], "fabric_js_loading_failure");

    let (summary, _) = call(
        &server,
        "task_results",
        json!({ "task_id": task_id, "format": "summary" }),
    );
    assert_eq!(summary["format"], "summary");
    assert_eq!(summary["confidence"], "high");
}

#[test]
fn test_orchestrate_rejects_bad_priority() {
    let response = send(
        &server(),
        &request(
            1,
            "tools/call",
            json!({ "name": "task_orchestrate", "arguments": { "task": "x", "priority": "urgent" } }),
        ),
    );
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn test_unknown_task_id_is_not_found_payload() {
    let server = server();
    for tool in ["task_status", "task_results"] {
        let (payload, is_error) = call(&server, tool, json!({ "task_id": "task-404" }));
        assert!(is_error);
        assert_eq!(
            payload,
            json!({ "success": false, "error": "Task task-404 not found" })
        );
    }
}

#[test]
fn test_task_results_bad_format_is_invalid_params() {
    let response = send(
        &server(),
        &request(
            1,
            "tools/call",
            json!({ "name": "task_results", "arguments": { "task_id": "t", "format": "xml" } }),
        ),
    );
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn test_agent_list_and_swarm_status() {
    let server = server();
    call(&server, "agent_spawn", json!({ "agent_type": "coder", "name": "C" }));
    call(&server, "agent_spawn", json!({ "agent_type": "coder", "name": "D" }));

    let (list, _) = call(&server, "agent_list", json!({}));
    assert_eq!(list["total_agents"], 2);
    assert_eq!(list["agents"][0]["metrics"]["success_rate"], 1.0);
    assert_eq!(list["swarm"]["topology"], "hierarchical");

    let (status, _) = call(&server, "swarm_status", Value::Null);
    assert_eq!(status["agents"]["total"], 2);
    assert_eq!(status["agents"]["by_type"]["coder"], 2);
    assert_eq!(status["tasks"]["total"], 0);
}
