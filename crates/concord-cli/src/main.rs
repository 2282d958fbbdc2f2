//! Concord CLI - Resolve questions by multi-agent consensus.

use clap::Parser;
use concord_cli::commands;
use concord_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter = Formatter::new(cli.format, !cli.no_color);
    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, formatter: &Formatter) -> concord_cli::Result<()> {
    match cli.command {
        Command::Resolve(args) => commands::execute_resolve(args, formatter).await,
        Command::Config(args) => commands::execute_config(args, formatter).await,
        Command::Verify(args) => commands::execute_verify(args, formatter).await,
    }
}
