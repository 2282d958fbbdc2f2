//! Research agent boundary
//!
//! Agents run the actual web/LLM research outside Concord. The engine only
//! sees their raw verdicts.

use crate::AgentError;
use async_trait::async_trait;
use concord_domain::RawVerdict;
use std::time::Duration;

/// What every agent is asked in a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchRequest {
    /// Question to resolve
    pub question: String,

    /// Resolution criteria
    pub criteria: String,

    /// Round number, starting at 1
    pub round: u32,

    /// Time allowed per attempt
    pub timeout: Duration,
}

/// Trait for research agents
///
/// Implementations must not share state with other agents: each call is an
/// independent piece of research.
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    /// Stable agent identifier
    fn id(&self) -> &str;

    /// Research the question and answer with a verdict
    async fn research(&self, request: &ResearchRequest) -> Result<RawVerdict, AgentError>;
}
