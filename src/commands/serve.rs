//! Implementation of the `swarmctl serve` command.
//!
//! stdout carries protocol messages only; logs go to stderr.

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::tools::ToolServer;

/// Execute the `swarmctl serve` command. Returns when stdin closes.
pub fn cmd_serve(args: ServeArgs, config: &Config) -> Result<()> {
    let mut server = ToolServer::new(Orchestrator::new(config));
    if let Some(name) = args.name {
        server = server.with_name(name);
    }

    tracing::info!(
        swarm = %server.orchestrator().swarm().swarm_id,
        "tool server reading from stdin"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    server.serve(stdin.lock(), stdout.lock())?;

    let status = server.orchestrator().status();
    tracing::info!(
        agents = status.agent_count,
        tasks = status.total_tasks,
        "tool server stopped"
    );
    Ok(())
}
