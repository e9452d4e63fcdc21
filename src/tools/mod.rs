//! Tool-invocation interface over JSON-RPC 2.0.
//!
//! Methods: `initialize`, `ping`, `tools/list`, `tools/call`. Each tool
//! result carries one text block with a JSON document and an `isError`
//! flag. There is no authentication and nothing is persisted.

pub mod handlers;
pub mod protocol;
mod server;
#[cfg(test)]
mod tests;

pub use server::ToolServer;
