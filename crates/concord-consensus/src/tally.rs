//! Vote tally for one round
//!
//! Groups validated verdicts by outcome and computes the simple and weighted
//! agreement ratios. The majority is the group with the most votes; weight
//! only breaks ties between equally sized groups.

use crate::weight::vote_weight;
use concord_domain::{Outcome, Verdict};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Verdicts sharing one outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeGroup {
    /// Outcome voted for
    pub outcome: Outcome,

    /// Voting agents, ordered by id
    pub agents: Vec<String>,

    /// Summed vote weight
    pub weight: f64,

    /// Mean confidence of the group's verdicts
    pub mean_confidence: f64,
}

impl OutcomeGroup {
    /// Number of votes
    pub fn count(&self) -> usize {
        self.agents.len()
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.count()
            .cmp(&other.count())
            .then_with(|| self.weight.total_cmp(&other.weight))
    }
}

/// Result of counting one round's votes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteTally {
    /// One entry per outcome that received votes, in outcome order
    pub groups: Vec<OutcomeGroup>,

    /// Outcome with the most votes (weight breaks ties)
    pub majority: Outcome,

    /// Majority votes / all validated votes
    pub simple_ratio: f64,

    /// Majority weight / total weight (0 when the total is 0)
    pub weighted_ratio: f64,

    /// Sum of every voter's weight
    pub total_weight: f64,

    /// The top groups tie on both count and weight
    pub contested: bool,
}

impl VoteTally {
    /// Count votes
    ///
    /// Input order is irrelevant: verdicts are ordered by agent id before any
    /// arithmetic. Returns `None` when there are no verdicts.
    pub fn count(verdicts: &[&Verdict], reference_count: usize) -> Option<Self> {
        let mut ordered = verdicts.to_vec();
        ordered.sort_by(|a, b| a.agent_id().cmp(b.agent_id()));

        let mut buckets: BTreeMap<Outcome, (Vec<String>, f64, f64)> = BTreeMap::new();
        let mut total_weight = 0.0;
        for verdict in &ordered {
            let weight = vote_weight(verdict, reference_count);
            total_weight += weight;
            let bucket = buckets
                .entry(verdict.outcome())
                .or_insert_with(|| (Vec::new(), 0.0, 0.0));
            bucket.0.push(verdict.agent_id().to_string());
            bucket.1 += weight;
            bucket.2 += verdict.confidence();
        }

        let groups: Vec<OutcomeGroup> = buckets
            .into_iter()
            .map(|(outcome, (agents, weight, confidence_sum))| OutcomeGroup {
                mean_confidence: confidence_sum / agents.len() as f64,
                outcome,
                agents,
                weight,
            })
            .collect();

        let (first, rest) = groups.split_first()?;
        let mut best = first;
        let mut contested = false;
        for group in rest {
            match group.rank(best) {
                Ordering::Greater => {
                    best = group;
                    contested = false;
                }
                Ordering::Equal => contested = true,
                Ordering::Less => {}
            }
        }

        let simple_ratio = best.count() as f64 / ordered.len() as f64;
        let weighted_ratio = if total_weight > 0.0 {
            (best.weight / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let majority = best.outcome;

        Some(Self {
            groups,
            majority,
            simple_ratio,
            weighted_ratio,
            total_weight,
            contested,
        })
    }

    /// Number of validated votes counted
    pub fn voters(&self) -> usize {
        self.groups.iter().map(OutcomeGroup::count).sum()
    }

    /// The group holding the majority outcome
    pub fn majority_group(&self) -> Option<&OutcomeGroup> {
        self.group(self.majority)
    }

    /// The group for `outcome`, if anyone voted for it
    pub fn group(&self, outcome: Outcome) -> Option<&OutcomeGroup> {
        self.groups.iter().find(|g| g.outcome == outcome)
    }

    /// Every validated verdict agreed
    pub fn is_unanimous(&self) -> bool {
        self.groups.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::{Evidence, SourceCategory};
    use std::time::Duration;

    fn verdict(id: &str, outcome: Outcome, confidence: f64, sources: usize) -> Verdict {
        let evidence = (0..sources)
            .map(|i| {
                Evidence::new(
                    &format!("https://{}.example.org/{}", id, i),
                    "t",
                    SourceCategory::ALL[i % 3],
                    0.8,
                    0.8,
                )
                .unwrap()
            })
            .collect();
        Verdict::new(id, outcome, confidence, evidence, Duration::ZERO).unwrap()
    }

    #[test]
    fn test_empty_tally() {
        assert!(VoteTally::count(&[], 50).is_none());
    }

    #[test]
    fn test_supermajority_ratios() {
        let a = verdict("a", Outcome::Yes, 0.85, 52);
        let b = verdict("b", Outcome::Yes, 0.82, 48);
        let c = verdict("c", Outcome::No, 0.65, 51);
        let tally = VoteTally::count(&[&c, &a, &b], 50).unwrap();

        assert_eq!(tally.majority, Outcome::Yes);
        assert!((tally.simple_ratio - 2.0 / 3.0).abs() < 1e-12);
        assert!(tally.weighted_ratio > tally.simple_ratio);
        assert!(!tally.contested);
        assert_eq!(tally.voters(), 3);
        assert_eq!(tally.majority_group().unwrap().agents, vec!["a", "b"]);
        assert!((tally.majority_group().unwrap().mean_confidence - 0.835).abs() < 1e-12);
    }

    #[test]
    fn test_weight_breaks_count_tie() {
        let a = verdict("a", Outcome::Yes, 0.9, 50);
        let b = verdict("b", Outcome::No, 0.4, 50);
        let tally = VoteTally::count(&[&a, &b], 50).unwrap();

        assert_eq!(tally.majority, Outcome::Yes);
        assert!(!tally.contested);
        assert_eq!(tally.simple_ratio, 0.5);
    }

    #[test]
    fn test_exact_tie_is_contested() {
        let a = verdict("a", Outcome::Yes, 0.7, 50);
        let b = verdict("b", Outcome::No, 0.7, 50);
        let tally = VoteTally::count(&[&b, &a], 50).unwrap();

        assert!(tally.contested);
        assert_eq!(tally.majority, Outcome::Yes);
    }

    #[test]
    fn test_count_beats_weight() {
        // One confident NO cannot override two lukewarm YES votes
        let a = verdict("a", Outcome::Yes, 0.3, 10);
        let b = verdict("b", Outcome::Yes, 0.3, 10);
        let c = verdict("c", Outcome::No, 1.0, 60);
        let tally = VoteTally::count(&[&a, &b, &c], 50).unwrap();

        assert_eq!(tally.majority, Outcome::Yes);
        assert!(tally.weighted_ratio < 0.5);
    }

    #[test]
    fn test_zero_weight_ratio() {
        let a = verdict("a", Outcome::Yes, 0.0, 5);
        let b = verdict("b", Outcome::Yes, 0.0, 5);
        let tally = VoteTally::count(&[&a, &b], 50).unwrap();

        assert_eq!(tally.weighted_ratio, 0.0);
        assert_eq!(tally.simple_ratio, 1.0);
        assert!(tally.is_unanimous());
    }
}
