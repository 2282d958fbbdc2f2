//! Concord Consensus
//!
//! Decides whether independently produced verdicts agree enough to be
//! trusted.
//!
//! ## Pipeline
//!
//! For each round the [`Resolution`] state machine:
//! 1. screens verdicts with the Gatekeeper (excluded verdicts go to the trail)
//! 2. weighs every validated verdict ([`weight`])
//! 3. counts votes ([`VoteTally`]); the simple ratio alone gates consensus
//! 4. on consensus, merges the winners' evidence ([`merger`])
//! 5. attaches overlap and disagreement diagnostics
//!
//! A round that misses the threshold asks the caller for a fresh round until
//! `max_rounds` is reached, after which the result goes to manual review with
//! outcome `UNDETERMINED`.
//!
//! Every step is synchronous and free of side effects apart from logging.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod disagreement;
pub mod error;
pub mod merger;
pub mod overlap;
pub mod resolver;
pub mod result;
pub mod round;
pub mod tally;
pub mod weight;

pub use disagreement::{
    analyze_disagreement, ConfidenceStats, DisagreementAnalysis, EvidenceConflict,
};
pub use error::{ConsensusError, Result};
pub use merger::{merge_evidence, MergedEvidence};
pub use overlap::{analyze_overlap, OverlapReport, PairOverlap};
pub use resolver::{Resolution, RoundDecision};
pub use result::ConsensusResult;
pub use round::{RoundRecord, RoundState};
pub use tally::{OutcomeGroup, VoteTally};
pub use weight::{source_quality, vote_weight};
