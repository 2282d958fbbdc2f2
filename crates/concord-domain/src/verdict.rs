//! Verdict module - one agent's independently produced answer

use crate::evidence::check_unit;
use crate::{DomainError, Evidence, Outcome, RawEvidence, SourceCategory, SourceRules};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

/// Verdict as produced by an agent on the wire
///
/// Loosely typed on purpose: this is what arrives, not what is trusted.
/// Use [`Verdict::from_raw`] to turn it into a [`Verdict`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVerdict {
    /// Agent identifier
    pub agent_id: String,

    /// Outcome wire name
    pub outcome: String,

    /// Confidence in `[0, 1]`
    pub confidence: f64,

    /// Cited evidence, in the agent's order
    #[serde(default, alias = "sources")]
    pub evidence: Vec<RawEvidence>,

    /// Wall-clock research duration in seconds
    #[serde(default, alias = "research_duration_seconds")]
    pub research_duration_secs: f64,

    /// Model that produced the verdict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Research strategy used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Free-text reasoning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// A schema-conforming verdict
///
/// Immutable once built. The evidence list keeps the agent's order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    agent_id: String,
    outcome: Outcome,
    confidence: f64,
    evidence: Vec<Evidence>,
    #[serde(rename = "research_duration_secs", serialize_with = "serialize_secs")]
    research_duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<String>,
}

impl Verdict {
    /// Create a verdict from typed parts
    pub fn new(
        agent_id: impl Into<String>,
        outcome: Outcome,
        confidence: f64,
        evidence: Vec<Evidence>,
        research_duration: Duration,
    ) -> Result<Self, DomainError> {
        let agent_id = agent_id.into();
        if agent_id.trim().is_empty() {
            return Err(DomainError::malformed(agent_id, "empty agent id"));
        }
        check_unit("confidence", confidence).map_err(|e| DomainError::malformed(&agent_id, e))?;
        Ok(Self {
            agent_id,
            outcome,
            confidence,
            evidence,
            research_duration,
            model: None,
            strategy: None,
            reasoning: None,
        })
    }

    /// Strictly parse agent output
    ///
    /// # Errors
    ///
    /// [`DomainError::MalformedVerdict`] for an empty agent id, an outcome
    /// outside the closed set, an out-of-range confidence or score, a bad
    /// URL, an unknown category, or a duration that is negative, not finite
    /// or too large to represent.
    pub fn from_raw(raw: &RawVerdict, rules: &SourceRules) -> Result<Self, DomainError> {
        let agent_id = raw.agent_id.trim();
        if agent_id.is_empty() {
            return Err(DomainError::malformed("", "empty agent id"));
        }

        let outcome = Outcome::parse(&raw.outcome).ok_or_else(|| {
            DomainError::malformed(agent_id, format!("invalid outcome '{}'", raw.outcome))
        })?;

        check_unit("confidence", raw.confidence).map_err(|e| DomainError::malformed(agent_id, e))?;

        let research_duration =
            Duration::try_from_secs_f64(raw.research_duration_secs).map_err(|_| {
                DomainError::malformed(
                    agent_id,
                    format!("invalid research duration {}", raw.research_duration_secs),
                )
            })?;

        let evidence = raw
            .evidence
            .iter()
            .map(|e| Evidence::from_raw(e, agent_id, rules))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            agent_id: agent_id.to_string(),
            outcome,
            confidence: raw.confidence,
            evidence,
            research_duration,
            model: raw.model.clone(),
            strategy: raw.strategy.clone(),
            reasoning: raw.reasoning.clone(),
        })
    }

    /// Attach model, strategy and reasoning metadata
    pub fn with_metadata(
        mut self,
        model: Option<String>,
        strategy: Option<String>,
        reasoning: Option<String>,
    ) -> Self {
        self.model = model;
        self.strategy = strategy;
        self.reasoning = reasoning;
        self
    }

    /// Agent identifier
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Outcome
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Confidence in `[0, 1]`
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Cited evidence in the agent's order
    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    /// Research duration
    pub fn research_duration(&self) -> Duration {
        self.research_duration
    }

    /// Model name, if reported
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Strategy name, if reported
    pub fn strategy(&self) -> Option<&str> {
        self.strategy.as_deref()
    }

    /// Reasoning text, if reported
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// Number of cited evidence items (duplicates included)
    pub fn evidence_count(&self) -> usize {
        self.evidence.len()
    }

    /// Evidence count per category
    pub fn category_counts(&self) -> BTreeMap<SourceCategory, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.evidence {
            *counts.entry(e.category()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of distinct categories cited
    pub fn distinct_categories(&self) -> usize {
        self.evidence
            .iter()
            .map(Evidence::category)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Set of canonical URLs cited
    pub fn urls(&self) -> BTreeSet<&str> {
        self.evidence.iter().map(Evidence::url).collect()
    }
}

/// How an agent call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No answer within the per-agent timeout or the round deadline
    Timeout,

    /// The agent reported an error
    Error,

    /// The agent answered, but not in the verdict schema
    Malformed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Error => "error",
            FailureKind::Malformed => "malformed",
        };
        f.write_str(name)
    }
}

/// Record of one agent call that produced no usable verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFailure {
    /// Agent identifier
    pub agent_id: String,

    /// Failure category
    pub kind: FailureKind,

    /// Human-readable detail
    pub detail: String,
}

impl AgentFailure {
    /// Create a failure record
    pub fn new(agent_id: impl Into<String>, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            kind,
            detail: detail.into(),
        }
    }

    /// Failure record for a verdict rejected by [`Verdict::from_raw`]
    pub fn malformed(agent_id: impl Into<String>, error: &DomainError) -> Self {
        Self::new(agent_id, FailureKind::Malformed, error.to_string())
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
