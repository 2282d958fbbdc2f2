//! Disagreement analysis
//!
//! Explains a split vote for human reviewers: how outcomes and confidences
//! were distributed and which sources were read differently by agents that
//! reached different outcomes. Purely diagnostic.

use crate::overlap::analyze_overlap;
use concord_domain::{Outcome, Verdict};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Shared URLs reported per conflicting outcome pair
pub const MAX_CONFLICT_URLS: usize = 5;

/// Conflicting pairs above which review is suggested
const MAX_CONFLICTING_PAIRS: usize = 2;

/// Confidence below which unanimous verdicts are flagged as weak
const LOW_CONFIDENCE: f64 = 0.7;

/// Confidence statistics over validated verdicts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceStats {
    /// Lowest confidence
    pub min: f64,
    /// Highest confidence
    pub max: f64,
    /// Mean confidence
    pub mean: f64,
    /// `max - min`
    pub spread: f64,
}

impl ConfidenceStats {
    fn from_verdicts(verdicts: &[&Verdict]) -> Self {
        if verdicts.is_empty() {
            return Self { min: 0.0, max: 0.0, mean: 0.0, spread: 0.0 };
        }
        let mut confidences: Vec<f64> = verdicts.iter().map(|v| v.confidence()).collect();
        confidences.sort_by(f64::total_cmp);
        let min = confidences[0];
        let max = confidences[confidences.len() - 1];
        let mean = confidences.iter().sum::<f64>() / confidences.len() as f64;
        Self { min, max, mean, spread: max - min }
    }
}

/// The same sources cited in support of two different outcomes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceConflict {
    /// The two outcomes, in outcome order
    pub outcomes: [Outcome; 2],

    /// Shared canonical URLs (at most [`MAX_CONFLICT_URLS`])
    pub shared_urls: Vec<String>,

    /// Total shared URLs before truncation
    pub shared_count: usize,
}

/// Why the agents disagreed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisagreementAnalysis {
    /// More than one outcome received votes
    pub has_disagreement: bool,

    /// Votes per outcome
    pub distribution: BTreeMap<Outcome, usize>,

    /// Confidence statistics
    pub confidence: ConfidenceStats,

    /// Mean pairwise Jaccard within each outcome group of two or more
    pub overlap_by_outcome: BTreeMap<Outcome, f64>,

    /// Sources shared across outcome groups
    pub conflicts: Vec<EvidenceConflict>,

    /// Observed contributing factors
    pub factors: Vec<String>,

    /// Suggested next steps
    pub recommendations: Vec<String>,

    /// Whether a human should look at this even if consensus was reached
    pub review_suggested: bool,

    /// Main reason for the suggestion
    pub review_reason: Option<String>,
}

/// Analyze disagreement among validated verdicts
///
/// `max_confidence_spread` is the spread above which review is suggested.
pub fn analyze_disagreement(
    verdicts: &[&Verdict],
    max_confidence_spread: f64,
) -> DisagreementAnalysis {
    let mut by_outcome: BTreeMap<Outcome, Vec<&Verdict>> = BTreeMap::new();
    for verdict in verdicts {
        by_outcome.entry(verdict.outcome()).or_default().push(*verdict);
    }

    let distribution: BTreeMap<Outcome, usize> =
        by_outcome.iter().map(|(o, vs)| (*o, vs.len())).collect();
    let has_disagreement = distribution.len() > 1;
    let confidence = ConfidenceStats::from_verdicts(verdicts);

    let overlap_by_outcome = by_outcome
        .iter()
        .filter(|(_, vs)| vs.len() >= 2)
        .map(|(o, vs)| (*o, analyze_overlap(vs).mean_jaccard))
        .collect();

    let urls_by_outcome: Vec<(Outcome, BTreeSet<&str>)> = by_outcome
        .iter()
        .map(|(o, vs)| (*o, vs.iter().flat_map(|v| v.urls()).collect()))
        .collect();

    let mut conflicts = Vec::new();
    for (i, (first, a)) in urls_by_outcome.iter().enumerate() {
        for (second, b) in &urls_by_outcome[i + 1..] {
            let shared: Vec<&str> = a.intersection(b).copied().collect();
            if !shared.is_empty() {
                conflicts.push(EvidenceConflict {
                    outcomes: [*first, *second],
                    shared_count: shared.len(),
                    shared_urls: shared
                        .iter()
                        .take(MAX_CONFLICT_URLS)
                        .map(|u| u.to_string())
                        .collect(),
                });
            }
        }
    }

    let high_spread = confidence.spread > max_confidence_spread;
    let mut factors = Vec::new();
    if high_spread {
        factors.push("High confidence spread among agents".to_string());
    }
    if !conflicts.is_empty() {
        factors.push("Same sources interpreted differently".to_string());
    }
    if distribution.len() >= 3 {
        factors.push("Three-way split in outcomes".to_string());
    }

    let mut recommendations = Vec::new();
    if high_spread {
        recommendations.push("Consider human review due to confidence variance".to_string());
    }
    if distribution.len() > 2 {
        recommendations.push("Resolution criteria may need clarification".to_string());
    }
    if !has_disagreement && confidence.mean < LOW_CONFIDENCE {
        recommendations.push("Low overall confidence; verify with additional sources".to_string());
    }

    let review_reason = if high_spread {
        Some("High confidence variance".to_string())
    } else if conflicts.len() > MAX_CONFLICTING_PAIRS {
        Some("Significant evidence conflicts".to_string())
    } else {
        None
    };

    DisagreementAnalysis {
        has_disagreement,
        distribution,
        confidence,
        overlap_by_outcome,
        conflicts,
        factors,
        recommendations,
        review_suggested: review_reason.is_some(),
        review_reason,
    }
}
