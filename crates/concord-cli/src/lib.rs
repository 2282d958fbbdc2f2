//! Concord CLI library.
//!
//! Replays recorded agent verdicts through the resolution engine, prints
//! the decision, and archives or verifies research bundles.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod replay;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use replay::{Recording, ReplayAgent};
