//! CLI argument parsing for swarmctl.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// swarmctl: in-memory agent swarm with keyword task dispatch.
///
/// Agents are registered with a type and capabilities; tasks are routed to
/// agents by keyword and resolved to an analysis result. The same operations
/// are available from scenario files and over a stdio tool protocol.
#[derive(Parser, Debug)]
#[command(name = "swarmctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./swarmctl.yaml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tracing filter, e.g. `debug` or `swarmctl=trace` (overrides RUST_LOG).
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for swarmctl.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default swarmctl.yaml and a sample scenario.yaml.
    ///
    /// Existing files are left alone unless --force is given.
    Init(InitArgs),

    /// Run a scenario file.
    ///
    /// Spawns the declared agents, submits every task, waits for them,
    /// and prints a summary. Exits with code 3 if any task failed.
    Run(RunArgs),

    /// Serve the tool protocol over stdin/stdout.
    ///
    /// Reads one JSON-RPC message per line and writes one reply per line.
    Serve(ServeArgs),

    /// Scan a codebase for script-loading evidence.
    ///
    /// Runs a probe profile against the given root and synthesizes a root
    /// cause and recommendations.
    Scan(ScanArgs),

    /// Resolve the load order of a script manifest.
    Scripts(ScriptsArgs),

    /// Show a saved run report.
    Show(ShowArgs),
}

/// Arguments for the `init` command.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite existing files.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario YAML file.
    pub scenario: PathBuf,

    /// Write the JSON report here (overrides the scenario's `output`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Execute tasks on the calling thread, one after another.
    #[arg(long)]
    pub inline: bool,

    /// Print the report as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Server name reported by `initialize`.
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Codebase root directory.
    pub root: PathBuf,

    /// Probe profile YAML (defaults to the built-in profile).
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Only run sections with these capabilities.
    #[arg(long, value_delimiter = ',')]
    pub capability: Vec<String>,

    /// Write the report as JSON to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the report as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `scripts` command.
#[derive(Parser, Debug)]
pub struct ScriptsArgs {
    /// Script manifest YAML file.
    pub manifest: PathBuf,

    /// Check that this handle is declared after all of its dependencies.
    #[arg(long, value_name = "HANDLE")]
    pub check: Option<String>,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Report JSON written by `swarmctl run`.
    pub report: PathBuf,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["swarmctl", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(InitArgs { force: false })));
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::try_parse_from(["swarmctl", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Command::Init(InitArgs { force: true })));
    }

    #[test]
    fn parse_run_full() {
        let cli = Cli::try_parse_from([
            "swarmctl",
            "run",
            "scenario.yaml",
            "--output",
            "out.json",
            "--inline",
        ])
        .unwrap();

        if let Command::Run(args) = cli.command {
            assert_eq!(args.scenario, PathBuf::from("scenario.yaml"));
            assert_eq!(args.output, Some(PathBuf::from("out.json")));
            assert!(args.inline);
            assert!(!args.json);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_requires_scenario() {
        assert!(Cli::try_parse_from(["swarmctl", "run"]).is_err());
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "swarmctl",
            "serve",
            "--config",
            "custom.yaml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Command::Serve(ServeArgs { name: None })));
    }

    #[test]
    fn parse_scan_capabilities() {
        let cli = Cli::try_parse_from([
            "swarmctl",
            "scan",
            "./plugin",
            "--capability",
            "security,javascript_modules",
            "--json",
        ])
        .unwrap();

        if let Command::Scan(args) = cli.command {
            assert_eq!(args.root, PathBuf::from("./plugin"));
            assert_eq!(args.capability, vec!["security", "javascript_modules"]);
            assert!(args.profile.is_none());
            assert!(args.json);
        } else {
            panic!("Expected Scan command");
        }
    }

    #[test]
    fn parse_scripts_check() {
        let cli =
            Cli::try_parse_from(["swarmctl", "scripts", "scripts.yaml", "--check", "designer"])
                .unwrap();

        if let Command::Scripts(args) = cli.command {
            assert_eq!(args.manifest, PathBuf::from("scripts.yaml"));
            assert_eq!(args.check.as_deref(), Some("designer"));
        } else {
            panic!("Expected Scripts command");
        }
    }

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["swarmctl", "show", "report.json"]).unwrap();
        assert!(matches!(cli.command, Command::Show(_)));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["swarmctl", "claim"]).is_err());
    }
}
