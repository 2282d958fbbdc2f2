//! Final consensus result

use crate::{DisagreementAnalysis, MergedEvidence, OverlapReport, RoundRecord};
use concord_domain::Outcome;
use serde::Serialize;
use std::fmt::Write;

/// Outcome of a finished resolution
///
/// Either consensus was reached (`requires_manual_review == false`) or the
/// rounds ran out and the outcome is forced to `UNDETERMINED`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusResult {
    /// Decided outcome
    pub outcome: Outcome,

    /// Mean confidence of the majority (0 on manual review)
    pub confidence: f64,

    /// Simple agreement ratio of the deciding round
    pub simple_ratio: f64,

    /// Weighted agreement ratio of the deciding round
    pub weighted_ratio: f64,

    /// Threshold the simple ratio was held to
    pub threshold: f64,

    /// Deduplicated evidence of the winning verdicts (empty on manual review)
    pub evidence: Vec<MergedEvidence>,

    /// Rounds consumed
    pub rounds: u32,

    /// Automated consensus failed
    pub requires_manual_review: bool,

    /// Per-round audit trail
    pub trail: Vec<RoundRecord>,

    /// Evidence overlap among the last round's validated verdicts
    pub overlap: Option<OverlapReport>,

    /// Present when the last round's vote was split
    pub disagreement: Option<DisagreementAnalysis>,
}

impl ConsensusResult {
    /// Number of merged evidence entries
    pub fn evidence_count(&self) -> usize {
        self.evidence.len()
    }

    /// Human-readable summary for reviewers
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "## Consensus Result");
        let _ = writeln!(out);
        if self.requires_manual_review {
            let _ = writeln!(out, "**Status:** manual review required");
        } else {
            let _ = writeln!(out, "**Status:** consensus reached");
        }
        let _ = writeln!(out, "**Outcome:** {}", self.outcome);
        let _ = writeln!(out, "**Confidence:** {:.1}%", self.confidence * 100.0);
        let _ = writeln!(
            out,
            "**Agreement:** {:.1}% (weighted {:.1}%, threshold {:.1}%)",
            self.simple_ratio * 100.0,
            self.weighted_ratio * 100.0,
            self.threshold * 100.0
        );
        let _ = writeln!(out, "**Rounds:** {}", self.rounds);
        let _ = writeln!(out, "**Evidence:** {} unique sources", self.evidence.len());

        if let Some(overlap) = &self.overlap {
            let _ = writeln!(
                out,
                "**Overlap:** {} sources in total, {} cross-verified, mean Jaccard {:.2}",
                overlap.union_size, overlap.cross_verified, overlap.mean_jaccard
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "### Rounds");
        for record in &self.trail {
            let _ = write!(
                out,
                "- Round {}: {} ({} responded, {} validated",
                record.round,
                record.decision,
                record.responded,
                record.validated.len()
            );
            if let Some(tally) = &record.tally {
                let _ = write!(out, ", {} at {:.1}%", tally.majority, tally.simple_ratio * 100.0);
                if tally.contested {
                    let _ = write!(out, ", contested");
                }
            }
            let _ = writeln!(out, ")");
            for failure in &record.failures {
                let _ = writeln!(
                    out,
                    "  - {} failed ({}): {}",
                    failure.agent_id, failure.kind, failure.detail
                );
            }
            for exclusion in &record.exclusions {
                let reasons: Vec<String> =
                    exclusion.reasons.iter().map(ToString::to_string).collect();
                let _ = writeln!(
                    out,
                    "  - {} excluded: {}",
                    exclusion.agent_id,
                    reasons.join("; ")
                );
            }
        }

        if let Some(analysis) = &self.disagreement {
            if !analysis.factors.is_empty() || !analysis.recommendations.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "### Disagreement");
                for factor in &analysis.factors {
                    let _ = writeln!(out, "- {}", factor);
                }
                for recommendation in &analysis.recommendations {
                    let _ = writeln!(out, "- Recommendation: {}", recommendation);
                }
            }
        }

        if !self.evidence.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "### Top Sources");
            for merged in self.evidence.iter().take(5) {
                let _ = writeln!(
                    out,
                    "- [{}] {} ({:.2}, cited by {})",
                    merged.evidence.category(),
                    merged.evidence.url(),
                    merged.score(),
                    merged.cited_by.len()
                );
            }
        }

        out
    }
}
