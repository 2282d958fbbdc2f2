//! Domain error types

use thiserror::Error;

/// Errors raised while building domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Agent output that does not conform to the verdict schema
    #[error("Malformed verdict from '{agent_id}': {reason}")]
    MalformedVerdict {
        /// Agent that produced the verdict (may be empty if that was the problem)
        agent_id: String,
        /// What was wrong with it
        reason: String,
    },

    /// Consensus configuration rejected at construction
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Score or confidence outside `[0, 1]`
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    /// URL that cannot be canonicalized
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as supplied
        url: String,
        /// Parser or scheme error
        reason: String,
    },
}

impl DomainError {
    /// Shorthand for a malformed verdict error
    pub fn malformed(agent_id: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::MalformedVerdict {
            agent_id: agent_id.into(),
            reason: reason.into(),
        }
    }
}
