//! Tracing setup.
//!
//! Logs go to stderr so stdout stays free for command output and, under
//! `serve`, for protocol messages.

use crate::error::{Result, SwarmError};
use tracing_subscriber::EnvFilter;

/// Pick the filter directive: `--log-level`, then `RUST_LOG`, then the
/// config's `log_level`, then `info`. Blank values are skipped.
pub fn resolve_filter(flag: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    [flag, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("info")
        .to_string()
}

/// Install the global fmt subscriber writing to stderr.
pub fn init_tracing(filter: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(filter).map_err(|e| {
        SwarmError::UserError(format!("invalid log filter '{}': {}", filter, e))
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| SwarmError::UserError(format!("failed to initialize tracing: {}", e)))
}
