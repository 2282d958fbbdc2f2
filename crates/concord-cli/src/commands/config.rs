//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use concord_engine::EngineConfig;

/// Execute the config command.
pub async fn execute_config(args: ConfigArgs, formatter: &Formatter) -> Result<()> {
    let config = EngineConfig::preset(&args.preset)
        .ok_or_else(|| CliError::Config(format!("unknown preset '{}'", args.preset)))?;

    match args.output {
        Some(path) => {
            config.save(&path)?;
            if !formatter.is_structured() {
                let message = format!("Saved '{}' preset to {}", args.preset, path.display());
                println!("{}", formatter.success(&message));
            }
        }
        None => print!("{}", config.to_toml()?),
    }

    Ok(())
}
