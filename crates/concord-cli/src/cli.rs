//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Concord CLI - Resolve questions by multi-agent consensus.
#[derive(Debug, Parser)]
#[command(name = "concord")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (outcome only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a question by replaying recorded agent verdicts
    Resolve(ResolveArgs),

    /// Print or save a configuration preset
    Config(ConfigArgs),

    /// Verify an archived bundle against its content hash
    Verify(VerifyArgs),
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Recording file: question, criteria and verdicts per round (JSON)
    #[arg(short, long)]
    pub recording: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(short, long, env = "CONCORD_CONFIG", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Configuration preset (default, strict, lenient)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Archive the research bundle into this directory
    #[arg(short, long)]
    pub archive_dir: Option<PathBuf>,

    /// Print the reviewer summary after the result
    #[arg(long)]
    pub summary: bool,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Preset to print (default, strict, lenient)
    #[arg(short, long, default_value = "default")]
    pub preset: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Archived bundle file
    #[arg(short, long)]
    pub bundle: PathBuf,

    /// Expected SHA-256 content hash (hex)
    #[arg(long)]
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "concord",
            "-vv",
            "--format",
            "json",
            "resolve",
            "--recording",
            "r.json",
            "--preset",
            "lenient",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.recording, PathBuf::from("r.json"));
                assert_eq!(args.preset.as_deref(), Some("lenient"));
                assert!(args.archive_dir.is_none());
            }
            other => panic!("Expected resolve, got {:?}", other),
        }
    }

    #[test]
    fn test_config_and_preset_conflict() {
        let result = Cli::try_parse_from([
            "concord", "resolve", "-r", "r.json", "--config", "c.toml", "--preset", "strict",
        ]);
        assert!(result.is_err());
    }
}
