//! Consensus resolver
//!
//! Drives one question through up to `max_rounds` collect/validate/vote
//! rounds. The caller collects fresh verdicts for every round and hands them
//! to [`Resolution::record_round`]; the resolution never re-scores verdicts
//! from an earlier round.

use crate::disagreement::analyze_disagreement;
use crate::merger::merge_evidence;
use crate::overlap::analyze_overlap;
use crate::{ConsensusError, ConsensusResult, Result, RoundRecord, RoundState, VoteTally};
use concord_domain::{AgentFailure, ConsensusConfig, Outcome, Verdict};
use concord_gatekeeper::{Screening, SourceValidator};
use tracing::{debug, info, warn};

/// What the caller should do after a round
#[derive(Debug, Clone, PartialEq)]
pub enum RoundDecision {
    /// Collect a fresh round of verdicts
    Retry {
        /// Number of the next round
        next_round: u32,
    },

    /// The resolution finished, with consensus or in manual review
    Resolved(Box<ConsensusResult>),
}

/// One question's consensus state machine
///
/// # Examples
///
/// ```
/// use concord_consensus::{Resolution, RoundState};
/// use concord_domain::ConsensusConfig;
///
/// let resolution = Resolution::new(ConsensusConfig::default()).unwrap();
/// assert_eq!(resolution.state(), RoundState::Collecting);
/// assert_eq!(resolution.next_round(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Resolution {
    config: ConsensusConfig,
    validator: SourceValidator,
    state: RoundState,
    trail: Vec<RoundRecord>,
}

impl Resolution {
    /// Start a resolution
    ///
    /// # Errors
    ///
    /// [`ConsensusError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: ConsensusConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ConsensusError::InvalidConfig(e.to_string()))?;
        let validator = SourceValidator::new(&config);
        Ok(Self {
            config,
            validator,
            state: RoundState::Collecting,
            trail: Vec::new(),
        })
    }

    /// Current state
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Configuration in force
    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Rounds recorded so far
    pub fn trail(&self) -> &[RoundRecord] {
        &self.trail
    }

    /// Number of the round to be recorded next
    pub fn next_round(&self) -> u32 {
        self.trail.len() as u32 + 1
    }

    /// Mark the start of collection for the next round
    ///
    /// # Errors
    ///
    /// [`ConsensusError::AlreadyTerminal`] once the resolution has finished.
    pub fn begin_round(&mut self) -> Result<u32> {
        if self.state.is_terminal() {
            return Err(ConsensusError::AlreadyTerminal(self.state));
        }
        self.state = RoundState::Collecting;
        Ok(self.next_round())
    }

    /// Record one round of verdicts and decide
    ///
    /// `verdicts` are the schema-conforming verdicts that arrived; `failures`
    /// are agents that timed out, errored or answered malformed output.
    ///
    /// # Errors
    ///
    /// - [`ConsensusError::AlreadyTerminal`] once the resolution has finished
    /// - [`ConsensusError::InsufficientAgents`] when the last permitted round
    ///   leaves fewer than `min_agents` validated verdicts
    pub fn record_round(
        &mut self,
        verdicts: &[Verdict],
        mut failures: Vec<AgentFailure>,
    ) -> Result<RoundDecision> {
        if self.state.is_terminal() {
            return Err(ConsensusError::AlreadyTerminal(self.state));
        }

        let round = self.next_round();
        let last_round = round >= self.config.max_rounds;
        failures.sort_by(|a, b| a.agent_id.cmp(&b.agent_id).then_with(|| a.kind.cmp(&b.kind)));

        self.state = RoundState::Validating;
        let screening = self.validator.screen(verdicts);
        let validated = screening.accepted.len();
        debug!(
            round,
            responded = verdicts.len(),
            validated,
            failed = failures.len(),
            "Round screened"
        );

        if validated < self.config.min_agents {
            warn!(
                round,
                validated,
                required = self.config.min_agents,
                "Too few validated verdicts"
            );
            self.state = if last_round { RoundState::Failed } else { RoundState::RoundRetry };
            self.push_record(round, verdicts.len(), failures, &screening, None);
            if last_round {
                return Err(ConsensusError::InsufficientAgents {
                    round,
                    required: self.config.min_agents,
                    actual: validated,
                });
            }
            return Ok(RoundDecision::Retry { next_round: round + 1 });
        }

        self.state = RoundState::Voting;
        let reference_count = self.config.reference_evidence_count;
        let Some(tally) = VoteTally::count(&screening.accepted, reference_count) else {
            return Err(ConsensusError::InsufficientAgents {
                round,
                required: self.config.min_agents,
                actual: validated,
            });
        };

        let reached = !tally.contested && self.config.meets_threshold(tally.simple_ratio);
        info!(
            round,
            majority = %tally.majority,
            simple_ratio = tally.simple_ratio,
            weighted_ratio = tally.weighted_ratio,
            contested = tally.contested,
            reached,
            "Round voted"
        );

        if !reached && !last_round {
            self.state = RoundState::RoundRetry;
            self.push_record(round, verdicts.len(), failures, &screening, Some(tally));
            return Ok(RoundDecision::Retry { next_round: round + 1 });
        }

        let overlap = analyze_overlap(&screening.accepted);
        let disagreement = (!tally.is_unanimous())
            .then(|| analyze_disagreement(&screening.accepted, self.config.max_confidence_spread));

        let (outcome, confidence, evidence) = if reached {
            let winners: Vec<&Verdict> = screening
                .accepted
                .iter()
                .copied()
                .filter(|v| v.outcome() == tally.majority)
                .collect();
            let confidence = tally.majority_group().map_or(0.0, |g| g.mean_confidence);
            (tally.majority, confidence, merge_evidence(&winners))
        } else {
            (Outcome::Undetermined, 0.0, Vec::new())
        };

        let simple_ratio = tally.simple_ratio;
        let weighted_ratio = tally.weighted_ratio;
        self.state = if reached { RoundState::ConsensusReached } else { RoundState::ManualReview };
        self.push_record(round, verdicts.len(), failures, &screening, Some(tally));

        if reached {
            info!(round, %outcome, confidence, evidence = evidence.len(), "Consensus reached");
        } else {
            warn!(round, "No consensus after final round, manual review required");
        }

        Ok(RoundDecision::Resolved(Box::new(ConsensusResult {
            outcome,
            confidence,
            simple_ratio,
            weighted_ratio,
            threshold: self.config.threshold,
            evidence,
            rounds: round,
            requires_manual_review: !reached,
            trail: self.trail.clone(),
            overlap: Some(overlap),
            disagreement,
        })))
    }

    fn push_record(
        &mut self,
        round: u32,
        responded: usize,
        failures: Vec<AgentFailure>,
        screening: &Screening<'_>,
        tally: Option<VoteTally>,
    ) {
        self.trail.push(RoundRecord {
            round,
            responded,
            failures,
            exclusions: screening.excluded.clone(),
            validated: screening
                .accepted
                .iter()
                .map(|v| v.agent_id().to_string())
                .collect(),
            tally,
            decision: self.state,
        });
    }
}
