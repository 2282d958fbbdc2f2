//! Round state machine states and the per-round audit record

use crate::VoteTally;
use concord_domain::AgentFailure;
use concord_gatekeeper::Exclusion;
use serde::Serialize;
use std::fmt;

/// Resolution state
///
/// `Collecting → Validating → Voting → {ConsensusReached, RoundRetry,
/// ManualReview}`. A shortfall in the last permitted round ends in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundState {
    /// Waiting for a round's verdicts
    Collecting,

    /// Screening verdicts
    Validating,

    /// Counting votes
    Voting,

    /// Threshold met (terminal)
    ConsensusReached,

    /// Threshold missed or too few verdicts; another round may run
    RoundRetry,

    /// Threshold missed in the last round (terminal)
    ManualReview,

    /// Too few verdicts in the last round (terminal)
    Failed,
}

impl RoundState {
    /// Whether no further rounds may be recorded
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RoundState::ConsensusReached | RoundState::ManualReview | RoundState::Failed
        )
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundState::Collecting => "COLLECTING",
            RoundState::Validating => "VALIDATING",
            RoundState::Voting => "VOTING",
            RoundState::ConsensusReached => "CONSENSUS_REACHED",
            RoundState::RoundRetry => "ROUND_RETRY",
            RoundState::ManualReview => "MANUAL_REVIEW",
            RoundState::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit entry for one completed round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRecord {
    /// Round number, starting at 1
    pub round: u32,

    /// Verdicts received (before validation)
    pub responded: usize,

    /// Agents that produced no usable verdict, ordered by id
    pub failures: Vec<AgentFailure>,

    /// Verdicts excluded by validation, ordered by id
    pub exclusions: Vec<Exclusion>,

    /// Agents whose verdicts voted, ordered by id
    pub validated: Vec<String>,

    /// Vote counts; absent when too few verdicts survived to vote
    pub tally: Option<VoteTally>,

    /// State the round ended in
    pub decision: RoundState,
}

impl RoundRecord {
    /// The round ended without a vote because too few verdicts survived
    pub fn is_shortfall(&self) -> bool {
        self.tally.is_none()
    }

    /// Simple agreement ratio, 0 without a vote
    pub fn simple_ratio(&self) -> f64 {
        self.tally.as_ref().map_or(0.0, |t| t.simple_ratio)
    }

    /// Weighted agreement ratio, 0 without a vote
    pub fn weighted_ratio(&self) -> f64 {
        self.tally.as_ref().map_or(0.0, |t| t.weighted_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RoundState::ConsensusReached.is_terminal());
        assert!(RoundState::ManualReview.is_terminal());
        assert!(RoundState::Failed.is_terminal());
        assert!(!RoundState::RoundRetry.is_terminal());
        assert!(!RoundState::Collecting.is_terminal());
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&RoundState::ManualReview).unwrap();
        assert_eq!(json, "\"MANUAL_REVIEW\"");
        assert_eq!(RoundState::RoundRetry.to_string(), "ROUND_RETRY");
    }
}
