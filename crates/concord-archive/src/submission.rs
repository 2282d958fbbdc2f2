//! Submission record handed to the settlement layer

use crate::{ArchiveReceipt, ContentId};
use concord_consensus::ConsensusResult;
use concord_domain::Outcome;
use serde::{Deserialize, Serialize};

/// The tuple a submission collaborator consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Decided outcome
    pub outcome: Outcome,

    /// Decision confidence
    pub confidence: f64,

    /// Simple agreement ratio
    pub simple_ratio: f64,

    /// Merged evidence entries
    pub evidence_count: usize,

    /// Where the bundle was stored
    pub content_id: ContentId,

    /// SHA-256 of the canonical bundle
    pub content_hash: String,

    /// Automated consensus failed
    pub requires_manual_review: bool,
}

impl SubmissionRecord {
    /// Build the record for an archived result
    pub fn new(result: &ConsensusResult, receipt: &ArchiveReceipt) -> Self {
        Self {
            outcome: result.outcome,
            confidence: result.confidence,
            simple_ratio: result.simple_ratio,
            evidence_count: result.evidence_count(),
            content_id: receipt.content_id.clone(),
            content_hash: receipt.content_hash.clone(),
            requires_manual_review: result.requires_manual_review,
        }
    }
}
