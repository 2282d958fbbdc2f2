//! Consensus configuration
//!
//! Supplied by the caller at construction; nothing in Concord reads it from
//! the environment.

use crate::{DomainError, SourceCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agreement ratios within this distance below the threshold still meet it,
/// so that a 2-of-3 vote (0.6667) satisfies a 0.67 threshold. Never applied
/// to a unanimity threshold of 1.0.
pub const THRESHOLD_TOLERANCE: f64 = 0.005;

/// Configuration for validation, voting and retry
///
/// # Examples
///
/// ```
/// use concord_domain::ConsensusConfig;
///
/// let config = ConsensusConfig::default();
/// assert_eq!(config.threshold, 0.67);
/// assert!(config.validate().is_ok());
///
/// let strict = ConsensusConfig::strict();
/// assert_eq!(strict.threshold, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Fraction of validated verdicts the majority outcome needs, in (0, 1]
    /// Default: 0.67 (two-thirds supermajority)
    pub threshold: f64,

    /// Minimum validated verdicts for a round to vote at all
    /// Default: 3
    pub min_agents: usize,

    /// Minimum evidence items per verdict
    /// Default: 50
    pub min_sources_per_agent: usize,

    /// Minimum distinct source categories per verdict
    /// Default: 3
    pub min_categories: usize,

    /// Optional per-category evidence minimums
    #[serde(default)]
    pub category_minimums: BTreeMap<SourceCategory, usize>,

    /// Rounds before falling back to manual review
    /// Default: 3
    pub max_rounds: u32,

    /// Evidence count at which the volume term of source quality saturates
    /// Default: 50
    #[serde(default = "default_reference_evidence_count")]
    pub reference_evidence_count: usize,

    /// Confidence spread above which disagreement analysis suggests review
    /// (diagnostic only, never gates the decision)
    /// Default: 0.3
    #[serde(default = "default_max_confidence_spread")]
    pub max_confidence_spread: f64,
}

fn default_reference_evidence_count() -> usize {
    50
}

fn default_max_confidence_spread() -> f64 {
    0.3
}

impl Default for ConsensusConfig {
    /// Two-thirds supermajority of at least three agents, 50 sources from
    /// three or more categories each, up to three rounds
    fn default() -> Self {
        Self {
            threshold: 0.67,
            min_agents: 3,
            min_sources_per_agent: 50,
            min_categories: 3,
            category_minimums: BTreeMap::new(),
            max_rounds: 3,
            reference_evidence_count: default_reference_evidence_count(),
            max_confidence_spread: default_max_confidence_spread(),
        }
    }
}

impl ConsensusConfig {
    /// Unanimity with full category coverage and per-category minimums
    pub fn strict() -> Self {
        let category_minimums = BTreeMap::from([
            (SourceCategory::Official, 5),
            (SourceCategory::News, 15),
            (SourceCategory::Social, 10),
            (SourceCategory::DomainSpecific, 10),
            (SourceCategory::FactCheck, 3),
        ]);
        Self {
            threshold: 1.0,
            min_agents: 3,
            min_sources_per_agent: 50,
            min_categories: SourceCategory::COUNT,
            category_minimums,
            max_rounds: 3,
            reference_evidence_count: 50,
            max_confidence_spread: 0.2,
        }
    }

    /// Two agents, light evidence requirements; for development and tests
    pub fn lenient() -> Self {
        Self {
            threshold: 0.67,
            min_agents: 2,
            min_sources_per_agent: 5,
            min_categories: 1,
            category_minimums: BTreeMap::new(),
            max_rounds: 5,
            reference_evidence_count: 20,
            max_confidence_spread: 0.4,
        }
    }

    /// Check the configuration
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidConfig`] when the threshold is outside (0, 1],
    /// fewer than two agents are required, no rounds are allowed, the
    /// reference evidence count is zero, more categories are required than
    /// exist, or the spread is not a finite non-negative number.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(DomainError::InvalidConfig(format!(
                "threshold {} must be in (0, 1]",
                self.threshold
            )));
        }
        if self.min_agents < 2 {
            return Err(DomainError::InvalidConfig(format!(
                "min_agents {} must be at least 2",
                self.min_agents
            )));
        }
        if self.max_rounds == 0 {
            return Err(DomainError::InvalidConfig("max_rounds must be greater than 0".to_string()));
        }
        if self.reference_evidence_count == 0 {
            return Err(DomainError::InvalidConfig(
                "reference_evidence_count must be greater than 0".to_string(),
            ));
        }
        if self.min_categories > SourceCategory::COUNT {
            return Err(DomainError::InvalidConfig(format!(
                "min_categories {} exceeds the {} known categories",
                self.min_categories,
                SourceCategory::COUNT
            )));
        }
        if !self.max_confidence_spread.is_finite() || self.max_confidence_spread < 0.0 {
            return Err(DomainError::InvalidConfig(format!(
                "max_confidence_spread {} must be a non-negative number",
                self.max_confidence_spread
            )));
        }
        Ok(())
    }

    /// Whether an agreement ratio meets the configured threshold
    ///
    /// A threshold of 1.0 demands unanimity exactly.
    pub fn meets_threshold(&self, ratio: f64) -> bool {
        if self.threshold >= 1.0 {
            return ratio >= 1.0;
        }
        ratio + THRESHOLD_TOLERANCE >= self.threshold
    }
}
