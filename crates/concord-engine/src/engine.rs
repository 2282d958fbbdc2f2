//! Resolution engine
//!
//! Runs rounds sequentially: collect fresh verdicts, hand them to the
//! consensus state machine, and either stop or start another round. Rounds
//! never overlap and share no state beyond the audit trail.

use crate::{
    Collection, EngineConfig, EngineError, EngineMetrics, ResearchAgent, ResearchRequest, Result,
    ResultCollector,
};
use concord_archive::{archive, ArchiveReceipt, EvidenceSink, ResearchBundle, SubmissionRecord};
use concord_consensus::{ConsensusResult, Resolution, RoundDecision};
use concord_domain::{SourceRules, Verdict};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// A finished resolution
#[derive(Debug, Clone)]
pub struct ResolutionReport {
    /// Time-ordered resolution id
    pub id: Uuid,

    /// Question that was resolved
    pub question: String,

    /// Resolution criteria
    pub criteria: String,

    /// Decision with its round trail
    pub result: ConsensusResult,

    /// Verdicts received in the deciding round
    pub verdicts: Vec<Verdict>,

    /// Wall-clock time spent
    pub elapsed: Duration,
}

/// A finished resolution that was archived
#[derive(Debug, Clone)]
pub struct ArchivedResolution {
    /// The resolution
    pub report: ResolutionReport,

    /// Where the bundle went
    pub receipt: ArchiveReceipt,

    /// Record for the settlement layer
    pub submission: SubmissionRecord,
}

/// Drives questions through consensus rounds
///
/// # Examples
///
/// ```no_run
/// use concord_engine::{EngineConfig, ResearchAgent, ResolutionEngine};
/// use std::sync::Arc;
///
/// # async fn run(agents: Vec<Arc<dyn ResearchAgent>>) -> Result<(), Box<dyn std::error::Error>> {
/// let mut engine = ResolutionEngine::new(EngineConfig::default(), agents)?;
/// let report = engine.resolve("Did X happen?", "Official confirmation").await?;
/// println!("{}", report.result.summary());
/// # Ok(())
/// # }
/// ```
pub struct ResolutionEngine {
    config: EngineConfig,
    agents: Vec<Arc<dyn ResearchAgent>>,
    collector: ResultCollector,
    metrics: EngineMetrics,
}

impl ResolutionEngine {
    /// Create an engine with the standard source rules
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] if the configuration is invalid, fewer agents
    /// than `min_agents` are supplied, or two agents share an id.
    pub fn new(config: EngineConfig, agents: Vec<Arc<dyn ResearchAgent>>) -> Result<Self> {
        config.validate()?;

        if agents.len() < config.consensus.min_agents {
            return Err(EngineError::Config(format!(
                "{} agents supplied, at least {} required",
                agents.len(),
                config.consensus.min_agents
            )));
        }

        let mut ids: Vec<&str> = agents.iter().map(|a| a.id()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(EngineError::Config(format!("duplicate agent id '{}'", pair[0])));
        }

        let collector = ResultCollector::new(config.collector.clone(), SourceRules::default());
        Ok(Self {
            config,
            agents,
            collector,
            metrics: EngineMetrics::new(),
        })
    }

    /// Replace the source classification rules
    pub fn with_rules(mut self, rules: SourceRules) -> Self {
        self.collector = ResultCollector::new(self.config.collector.clone(), rules);
        self
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Metrics so far
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Resolve a question
    ///
    /// # Errors
    ///
    /// [`EngineError::Consensus`] when the final permitted round still has
    /// too few validated verdicts. A missed threshold is not an error: it
    /// returns a manual-review result.
    pub async fn resolve(&mut self, question: &str, criteria: &str) -> Result<ResolutionReport> {
        let id = Uuid::now_v7();
        let started = Instant::now();
        self.metrics.record_started();
        info!(%id, agents = self.agents.len(), "Resolution started");

        let mut resolution = Resolution::new(self.config.consensus.clone())?;

        loop {
            let round = resolution.begin_round()?;
            let request = ResearchRequest {
                question: question.to_string(),
                criteria: criteria.to_string(),
                round,
                timeout: self.config.collector.agent_timeout(),
            };

            let collection = self.collector.collect(&self.agents, request).await;
            self.metrics.record_round(&collection);
            if let Err(e) = collection.ensure_quorum(self.config.consensus.min_agents) {
                warn!(%id, round, error = %e, "Round short of agents");
                self.metrics.record_shortfall();
            }

            let Collection { verdicts, failures } = collection;
            match resolution.record_round(&verdicts, failures) {
                Ok(RoundDecision::Retry { next_round }) => {
                    info!(%id, round, next_round, "No consensus yet, starting a fresh round");
                    let pause = self.config.collector.round_pause();
                    if !pause.is_zero() {
                        tokio::time::sleep(pause).await;
                    }
                }
                Ok(RoundDecision::Resolved(result)) => {
                    let elapsed = started.elapsed();
                    self.metrics.record_resolved(&result, elapsed);
                    info!(
                        %id,
                        outcome = %result.outcome,
                        rounds = result.rounds,
                        manual_review = result.requires_manual_review,
                        "Resolution finished"
                    );
                    return Ok(ResolutionReport {
                        id,
                        question: question.to_string(),
                        criteria: criteria.to_string(),
                        result: *result,
                        verdicts,
                        elapsed,
                    });
                }
                Err(e) => {
                    self.metrics.record_failed(started.elapsed());
                    warn!(%id, error = %e, "Resolution failed");
                    return Err(e.into());
                }
            }
        }
    }

    /// Resolve a question, archive the bundle and build the submission record
    pub async fn resolve_and_archive<S: EvidenceSink>(
        &mut self,
        question: &str,
        criteria: &str,
        sink: &mut S,
    ) -> Result<ArchivedResolution> {
        let report = self.resolve(question, criteria).await?;
        let bundle = ResearchBundle::new(
            report.question.clone(),
            report.criteria.clone(),
            report.result.clone(),
            report.verdicts.clone(),
        );
        let receipt = archive(&bundle, sink)?;
        let submission = SubmissionRecord::new(&report.result, &receipt);
        Ok(ArchivedResolution {
            report,
            receipt,
            submission,
        })
    }
}
