//! Result collector
//!
//! Invokes every agent concurrently, each in its own task with its own
//! timeout and retry policy, and gathers whatever settles before the round
//! deadline. A failing agent never fails the round.

use crate::{AgentError, CollectorConfig, CollectorError, ResearchAgent, ResearchRequest};
use concord_domain::{AgentFailure, RawVerdict, SourceRules, Verdict};
use futures::future::join_all;
use std::sync::Arc;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

/// Everything one round produced
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Schema-conforming verdicts, ordered by agent id
    pub verdicts: Vec<Verdict>,

    /// Agents without a usable verdict, ordered by agent id
    pub failures: Vec<AgentFailure>,
}

impl Collection {
    /// Check that at least `min_agents` verdicts arrived
    pub fn ensure_quorum(&self, min_agents: usize) -> Result<(), CollectorError> {
        if self.verdicts.len() < min_agents {
            return Err(CollectorError::InsufficientAgents {
                required: min_agents,
                actual: self.verdicts.len(),
            });
        }
        Ok(())
    }
}

/// Collects one round of verdicts
#[derive(Debug, Clone)]
pub struct ResultCollector {
    config: CollectorConfig,
    rules: SourceRules,
}

impl ResultCollector {
    /// Create a collector; `rules` fill in missing evidence categories and
    /// credibility scores
    pub fn new(config: CollectorConfig, rules: SourceRules) -> Self {
        Self { config, rules }
    }

    /// Collector configuration
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Ask every agent once (with retries) and wait for the round to settle
    ///
    /// Agents still running at the round deadline are aborted and recorded
    /// as timeouts. The result does not depend on completion order.
    pub async fn collect(
        &self,
        agents: &[Arc<dyn ResearchAgent>],
        request: ResearchRequest,
    ) -> Collection {
        let round = request.round;
        let request = Arc::new(request);
        let round_deadline = self.config.round_deadline();
        let deadline = Instant::now() + round_deadline;

        let handles: Vec<_> = agents
            .iter()
            .map(|agent| {
                let id = agent.id().to_string();
                let agent = Arc::clone(agent);
                let request = Arc::clone(&request);
                let retry = self.config.retry.clone();
                let per_attempt = self.config.agent_timeout();

                let handle = tokio::spawn(async move {
                    retry
                        .run(|attempt| {
                            let agent = Arc::clone(&agent);
                            let request = Arc::clone(&request);
                            async move {
                                debug!(agent = agent.id(), attempt = attempt + 1, "Calling agent");
                                match timeout(per_attempt, agent.research(&request)).await {
                                    Ok(result) => result,
                                    Err(_) => Err(AgentError::Timeout(per_attempt)),
                                }
                            }
                        })
                        .await
                });
                (id, handle)
            })
            .collect();

        let settled = join_all(handles.into_iter().map(|(id, mut handle)| async move {
            let result = match timeout_at(deadline, &mut handle).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => {
                    Err(AgentError::Failed(format!("agent task failed: {}", join_error)))
                }
                Err(_) => {
                    handle.abort();
                    Err(AgentError::Timeout(round_deadline))
                }
            };
            (id, result)
        }))
        .await;

        let mut collection = Collection::default();
        for (id, result) in settled {
            match result.and_then(|raw| self.parse(&id, raw)) {
                Ok(verdict) => collection.verdicts.push(verdict),
                Err(e) => {
                    warn!(
                        round,
                        agent = %id,
                        kind = %e.kind(),
                        error = %e,
                        "Agent produced no verdict"
                    );
                    collection.failures.push(AgentFailure::new(id, e.kind(), e.to_string()));
                }
            }
        }

        collection.verdicts.sort_by(|a, b| a.agent_id().cmp(b.agent_id()));
        collection
            .failures
            .sort_by(|a, b| a.agent_id.cmp(&b.agent_id).then_with(|| a.kind.cmp(&b.kind)));

        info!(
            round,
            agents = agents.len(),
            succeeded = collection.verdicts.len(),
            failed = collection.failures.len(),
            "Round collected"
        );
        collection
    }

    /// Strictly parse one agent's answer
    ///
    /// A missing agent id is taken from the handle; a different one is
    /// rejected so an agent cannot vote under another's name.
    fn parse(&self, id: &str, mut raw: RawVerdict) -> Result<Verdict, AgentError> {
        if raw.agent_id.trim().is_empty() {
            raw.agent_id = id.to_string();
        } else if raw.agent_id.trim() != id {
            return Err(AgentError::Malformed(format!(
                "verdict claims agent id '{}'",
                raw.agent_id
            )));
        }
        Verdict::from_raw(&raw, &self.rules).map_err(|e| AgentError::Malformed(e.to_string()))
    }
}
