//! Metrics collected across resolutions

use crate::Collection;
use concord_consensus::ConsensusResult;
use concord_domain::FailureKind;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counters for one engine instance
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Resolutions started
    pub resolutions_started: usize,

    /// Resolutions that reached consensus
    pub consensus_reached: usize,

    /// Resolutions that ended in manual review
    pub manual_review: usize,

    /// Resolutions that ended in an error
    pub failed: usize,

    /// Rounds collected
    pub rounds_run: usize,

    /// Rounds where fewer verdicts arrived than the minimum
    pub quorum_shortfalls: usize,

    /// Verdicts received
    pub verdicts_received: usize,

    /// Agent failures per kind
    pub agent_failures: BTreeMap<FailureKind, usize>,

    /// Total resolution time in milliseconds
    pub total_runtime_ms: u64,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a resolution
    pub fn record_started(&mut self) {
        self.resolutions_started += 1;
    }

    /// Record a collected round
    pub fn record_round(&mut self, collection: &Collection) {
        self.rounds_run += 1;
        self.verdicts_received += collection.verdicts.len();
        for failure in &collection.failures {
            *self.agent_failures.entry(failure.kind).or_insert(0) += 1;
        }
    }

    /// Record a round that fell short of the minimum agent count
    pub fn record_shortfall(&mut self) {
        self.quorum_shortfalls += 1;
    }

    /// Record a finished resolution
    pub fn record_resolved(&mut self, result: &ConsensusResult, elapsed: Duration) {
        if result.requires_manual_review {
            self.manual_review += 1;
        } else {
            self.consensus_reached += 1;
        }
        self.total_runtime_ms += elapsed.as_millis() as u64;
    }

    /// Record a resolution that ended in an error
    pub fn record_failed(&mut self, elapsed: Duration) {
        self.failed += 1;
        self.total_runtime_ms += elapsed.as_millis() as u64;
    }

    /// Get total agent failures across all kinds
    pub fn total_agent_failures(&self) -> usize {
        self.agent_failures.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Engine Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Resolutions: {}", self.resolutions_started),
            format!("  Consensus reached: {}", self.consensus_reached),
            format!("  Manual review: {}", self.manual_review),
            format!("  Failed: {}", self.failed),
            format!("Rounds run: {}", self.rounds_run),
            format!("Quorum shortfalls: {}", self.quorum_shortfalls),
            format!("Verdicts received: {}", self.verdicts_received),
            format!("Total runtime: {}ms", self.total_runtime_ms),
        ];

        if !self.agent_failures.is_empty() {
            lines.push(String::new());
            lines.push("Agent failures:".to_string());
            for (kind, count) in &self.agent_failures {
                lines.push(format!("  {}: {}", kind, count));
            }
            lines.push(format!("  Total: {}", self.total_agent_failures()));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::AgentFailure;

    #[test]
    fn test_metrics_creation() {
        let metrics = EngineMetrics::new();
        assert_eq!(metrics.resolutions_started, 0);
        assert_eq!(metrics.total_agent_failures(), 0);
    }

    #[test]
    fn test_record_round_counts_failures() {
        let mut metrics = EngineMetrics::new();
        let collection = Collection {
            verdicts: Vec::new(),
            failures: vec![
                AgentFailure::new("a", FailureKind::Timeout, "slow"),
                AgentFailure::new("b", FailureKind::Timeout, "slow"),
                AgentFailure::new("c", FailureKind::Malformed, "bad"),
            ],
        };
        metrics.record_round(&collection);
        metrics.record_round(&Collection::default());

        assert_eq!(metrics.rounds_run, 2);
        assert_eq!(metrics.agent_failures[&FailureKind::Timeout], 2);
        assert_eq!(metrics.total_agent_failures(), 3);
    }

    #[test]
    fn test_summary_and_reset() {
        let mut metrics = EngineMetrics::new();
        metrics.record_started();
        metrics.record_failed(Duration::from_millis(40));
        metrics.record_round(&Collection {
            verdicts: Vec::new(),
            failures: vec![AgentFailure::new("a", FailureKind::Error, "boom")],
        });

        let summary = metrics.summary();
        assert!(summary.contains("Failed: 1"));
        assert!(summary.contains("error: 1"));
        assert!(summary.contains("Total runtime: 40ms"));

        metrics.reset();
        assert_eq!(metrics.failed, 0);
        assert!(metrics.agent_failures.is_empty());
    }
}
