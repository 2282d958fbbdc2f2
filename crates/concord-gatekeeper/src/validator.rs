//! Verdict validation logic

use concord_domain::{ConsensusConfig, SourceCategory, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Result of validating one verdict
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the verdict may vote
    pub status: ValidationStatus,

    /// Rejection reasons (empty when accepted)
    pub reasons: Vec<RejectionReason>,
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Verdict votes
    Accepted,

    /// Verdict is excluded from voting
    Rejected,
}

/// Reasons for excluding a verdict from voting
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// Too few evidence items
    InsufficientSources {
        /// Configured minimum
        required: usize,
        /// Evidence items cited
        actual: usize,
    },

    /// Too few distinct categories
    InsufficientCategories {
        /// Configured minimum
        required: usize,
        /// Distinct categories cited
        actual: usize,
    },

    /// A per-category minimum was not met
    CategoryMinimum {
        /// Category concerned
        category: SourceCategory,
        /// Configured minimum
        required: usize,
        /// Items cited in that category
        actual: usize,
    },

    /// The same agent id answered more than once in one round
    DuplicateAgent {
        /// Number of verdicts carrying the id
        occurrences: usize,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::InsufficientSources { required, actual } => {
                write!(f, "insufficient sources: {}/{}", actual, required)
            }
            RejectionReason::InsufficientCategories { required, actual } => {
                write!(f, "insufficient categories: {}/{}", actual, required)
            }
            RejectionReason::CategoryMinimum { category, required, actual } => {
                write!(f, "insufficient {} sources: {}/{}", category, actual, required)
            }
            RejectionReason::DuplicateAgent { occurrences } => {
                write!(f, "agent answered {} times in one round", occurrences)
            }
        }
    }
}

/// A verdict excluded from voting, kept for the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    /// Agent whose verdict was excluded
    pub agent_id: String,

    /// Every reason that applied
    pub reasons: Vec<RejectionReason>,
}

/// Outcome of screening one round of verdicts
#[derive(Debug, Clone)]
pub struct Screening<'a> {
    /// Verdicts allowed to vote, ordered by agent id
    pub accepted: Vec<&'a Verdict>,

    /// Excluded verdicts, ordered by agent id
    pub excluded: Vec<Exclusion>,
}

/// The Gatekeeper validates verdicts before they vote
#[derive(Debug, Clone)]
pub struct SourceValidator {
    min_sources: usize,
    min_categories: usize,
    category_minimums: BTreeMap<SourceCategory, usize>,
}

impl SourceValidator {
    /// Create a validator from the evidence rules in `config`
    pub fn new(config: &ConsensusConfig) -> Self {
        Self {
            min_sources: config.min_sources_per_agent,
            min_categories: config.min_categories,
            category_minimums: config.category_minimums.clone(),
        }
    }

    /// Validate a single verdict against the configured rules
    ///
    /// Every failing check is reported, not just the first.
    pub fn validate(&self, verdict: &Verdict) -> ValidationResult {
        let mut reasons = Vec::new();

        // 1. Evidence volume
        let count = verdict.evidence_count();
        if count < self.min_sources {
            reasons.push(RejectionReason::InsufficientSources {
                required: self.min_sources,
                actual: count,
            });
        }

        // 2. Category coverage
        let distinct = verdict.distinct_categories();
        if distinct < self.min_categories {
            reasons.push(RejectionReason::InsufficientCategories {
                required: self.min_categories,
                actual: distinct,
            });
        }

        // 3. Per-category minimums
        if !self.category_minimums.is_empty() {
            let counts = verdict.category_counts();
            for (category, required) in &self.category_minimums {
                let actual = counts.get(category).copied().unwrap_or(0);
                if actual < *required {
                    reasons.push(RejectionReason::CategoryMinimum {
                        category: *category,
                        required: *required,
                        actual,
                    });
                }
            }
        }

        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        ValidationResult { status, reasons }
    }

    /// Screen a whole round
    ///
    /// The result is independent of input order: agent ids that occur more
    /// than once are excluded in every occurrence, and both lists are
    /// sorted by agent id.
    pub fn screen<'a>(&self, verdicts: &'a [Verdict]) -> Screening<'a> {
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for verdict in verdicts {
            *occurrences.entry(verdict.agent_id()).or_insert(0) += 1;
        }

        let mut accepted = Vec::new();
        let mut excluded = Vec::new();

        for verdict in verdicts {
            let mut result = self.validate(verdict);
            let seen = occurrences[verdict.agent_id()];
            if seen > 1 {
                result.reasons.push(RejectionReason::DuplicateAgent { occurrences: seen });
                result.status = ValidationStatus::Rejected;
            }

            match result.status {
                ValidationStatus::Accepted => accepted.push(verdict),
                ValidationStatus::Rejected => {
                    tracing::debug!(
                        agent = verdict.agent_id(),
                        reasons = result.reasons.len(),
                        "Verdict excluded from voting"
                    );
                    excluded.push(Exclusion {
                        agent_id: verdict.agent_id().to_string(),
                        reasons: result.reasons,
                    });
                }
            }
        }

        accepted.sort_by(|a, b| a.agent_id().cmp(b.agent_id()));
        excluded.sort_by(|a, b| {
            a.agent_id
                .cmp(&b.agent_id)
                .then_with(|| a.reasons.cmp(&b.reasons))
        });

        Screening { accepted, excluded }
    }
}
