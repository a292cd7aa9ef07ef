//! CLI argument parsing using clap derive API
//!
//! Purely declarative; no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// logsync -- forwards security-relevant activity events to a syslog collector as CEF.
///
/// Use `logsync <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logsync", version, about, long_about = None)]
pub struct Cli {
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch events, evaluate detections and report matches.
    Run(RunArgs),

    /// Validate the configuration and list compiled detections.
    Check(CheckArgs),
}

// ---- run ----

/// Run one forwarding batch with the given configuration.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Use FILE as config (falls back to ./logsync.json, then <exe dir>/logsync.json).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not report to the syslog server.
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

// ---- check ----

/// Load and validate configuration without contacting any server.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Use FILE as config (falls back to ./logsync.json, then <exe dir>/logsync.json).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["logsync", "run"]).expect("parse succeeded");
        match cli.command {
            Commands::Run(args) => {
                assert!(args.config.is_none(), "config should default to None");
                assert!(!args.dry_run, "dry_run should default to false");
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_short_flags() {
        let cli = Cli::try_parse_from(["logsync", "run", "-c", "/etc/logsync.json", "-d"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, Some(PathBuf::from("/etc/logsync.json")));
                assert!(args.dry_run);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_long_flags() {
        let cli = Cli::try_parse_from(["logsync", "run", "--config", "a.toml", "--dry-run"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, Some(PathBuf::from("a.toml")));
                assert!(args.dry_run);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli =
            Cli::try_parse_from(["logsync", "check", "-c", "x.json"]).expect("parse succeeded");
        match cli.command {
            Commands::Check(args) => assert_eq!(args.config, Some(PathBuf::from("x.json"))),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "logsync",
            "check",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.log_level, Some("debug".to_owned()));
    }

    #[test]
    fn test_cli_parse_invalid_output_fails() {
        let args = Cli::try_parse_from(["logsync", "--output", "yaml", "check"]);
        assert!(args.is_err(), "unknown output format should fail");
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        let args = Cli::try_parse_from(["logsync"]);
        assert!(args.is_err(), "should fail when no command provided");
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "logsync");
        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert_eq!(subcommands, vec!["run", "check"]);
        cmd.debug_assert();
    }
}
