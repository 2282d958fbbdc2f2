//! Error types for the engine

use concord_archive::ArchiveError;
use concord_consensus::ConsensusError;
use concord_domain::FailureKind;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by a single agent call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// No answer in time
    #[error("Agent timed out after {0:?}")]
    Timeout(Duration),

    /// The agent or its backend failed
    #[error("Agent failed: {0}")]
    Failed(String),

    /// The agent answered with something that is not a verdict
    #[error("Malformed verdict: {0}")]
    Malformed(String),
}

impl AgentError {
    /// Failure category for the round trail
    pub fn kind(&self) -> FailureKind {
        match self {
            AgentError::Timeout(_) => FailureKind::Timeout,
            AgentError::Failed(_) => FailureKind::Error,
            AgentError::Malformed(_) => FailureKind::Malformed,
        }
    }

    /// Whether another attempt could help
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AgentError::Malformed(_))
    }
}

/// Errors from collecting a round
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectorError {
    /// Fewer successful verdicts than the configured minimum
    #[error("Insufficient agents: {actual} succeeded, {required} required")]
    InsufficientAgents {
        /// Configured minimum
        required: usize,
        /// Verdicts received
        actual: usize,
    },
}

/// Errors that can occur while resolving a question
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Consensus could not be resolved
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    /// Archiving failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Reading or writing a config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_error_kinds() {
        assert_eq!(AgentError::Timeout(Duration::from_secs(1)).kind(), FailureKind::Timeout);
        assert_eq!(AgentError::Failed("x".into()).kind(), FailureKind::Error);
        assert_eq!(AgentError::Malformed("x".into()).kind(), FailureKind::Malformed);
        assert!(!AgentError::Malformed("x".into()).is_retryable());
        assert!(AgentError::Failed("x".into()).is_retryable());
    }
}
