//! Line-delimited JSON-RPC server over a reader/writer pair.
//!
//! One request per line in, one response per line out. Stdout belongs to the
//! protocol; diagnostics go through `tracing` to stderr.

use super::handlers;
use super::protocol::{
    CallToolParams, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    PROTOCOL_VERSION,
};
use crate::error::{Result, SwarmError};
use crate::orchestrator::Orchestrator;
use serde_json::{Value, json};
use std::io::{BufRead, Write};

pub const DEFAULT_SERVER_NAME: &str = "swarmctl";

pub struct ToolServer {
    orchestrator: Orchestrator,
    name: String,
}

impl ToolServer {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            name: DEFAULT_SERVER_NAME.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Read requests until EOF, answering each on its own line.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<()> {
        tracing::info!(server = %self.name, "tool server listening on stdio");

        for line in reader.lines() {
            let line = line.map_err(|e| SwarmError::Io(format!("failed to read request: {}", e)))?;
            let Some(reply) = self.handle_line(&line) else {
                continue;
            };
            writeln!(writer, "{}", reply)
                .and_then(|_| writer.flush())
                .map_err(|e| SwarmError::Io(format!("failed to write response: {}", e)))?;
        }

        tracing::info!(server = %self.name, "input closed, tool server stopping");
        Ok(())
    }

    /// Handle one raw line. Returns the serialized response, or `None` for
    /// blank lines and notifications.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string()))),
            Ok(value) => self.handle_value(value),
        }?;

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                None
            }
        }
    }

    fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        let id = value.get("id").cloned().filter(|id| !id.is_null());

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request(e.to_string())));
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!("jsonrpc must be \"{}\"", JSONRPC_VERSION)),
            ));
        }

        let notification = request.is_notification();
        let response = self.handle_request(request);
        if notification { None } else { Some(response) }
    }

    /// Route a parsed request to its method.
    pub fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "request");
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            method if method.starts_with("notifications/") => {
                JsonRpcResponse::success(request.id, json!({}))
            }
            method => JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(method)),
        }
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": {
                    "name": self.name,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match serde_json::to_value(handlers::definitions()) {
            Ok(tools) => JsonRpcResponse::success(request.id, json!({ "tools": tools })),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = match request.params {
            Some(params) => match serde_json::from_value::<CallToolParams>(params) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("tool call params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("tool call params are required"),
                );
            }
        };

        let arguments = params.arguments.unwrap_or(Value::Null);
        let result = match handlers::call_tool(&self.orchestrator, &params.name, arguments) {
            Ok(result) => result,
            Err(error) => return JsonRpcResponse::error(request.id, error),
        };
        if result.is_error {
            tracing::debug!(tool = %params.name, "tool reported an error");
        }

        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}
