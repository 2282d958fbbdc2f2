//! Error types for consensus resolution

use crate::RoundState;
use thiserror::Error;

/// Errors that can occur while resolving consensus
///
/// Local problems (malformed or under-sourced verdicts) never surface here;
/// they are recorded in the round trail instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsensusError {
    /// Configuration rejected at construction
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Too few validated verdicts in the final permitted round
    #[error("Insufficient agents in round {round}: {actual} validated, {required} required")]
    InsufficientAgents {
        /// Round that fell short
        round: u32,
        /// Configured minimum
        required: usize,
        /// Verdicts that passed validation
        actual: usize,
    },

    /// A round was recorded after the resolution finished
    #[error("Resolution already finished in state {0}")]
    AlreadyTerminal(RoundState),
}

/// Result type for consensus operations
pub type Result<T> = std::result::Result<T, ConsensusError>;
