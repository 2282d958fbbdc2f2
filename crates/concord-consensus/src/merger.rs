//! Evidence merging and deduplication
//!
//! Merges the winning verdicts' evidence into one list keyed by canonical
//! URL. Each surviving entry records every agent that cited it.

use concord_domain::{Evidence, Verdict};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// One deduplicated evidence entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedEvidence {
    /// Best-scoring copy of the evidence
    #[serde(flatten)]
    pub evidence: Evidence,

    /// Agents that cited this URL
    pub cited_by: BTreeSet<String>,
}

impl MergedEvidence {
    /// `relevance × credibility` of the kept copy
    pub fn score(&self) -> f64 {
        self.evidence.score()
    }
}

/// Merge evidence from `verdicts`
///
/// Duplicates (same canonical URL) keep the copy with the higher
/// `relevance × credibility` and union their `cited_by` sets. The output is
/// sorted by descending score, then URL, and does not depend on input order.
pub fn merge_evidence(verdicts: &[&Verdict]) -> Vec<MergedEvidence> {
    let mut by_url: BTreeMap<&str, MergedEvidence> = BTreeMap::new();

    for verdict in verdicts {
        for evidence in verdict.evidence() {
            match by_url.get_mut(evidence.url()) {
                Some(entry) => {
                    if preference(evidence, &entry.evidence) == Ordering::Greater {
                        entry.evidence = evidence.clone();
                    }
                    entry.cited_by.insert(verdict.agent_id().to_string());
                }
                None => {
                    by_url.insert(
                        evidence.url(),
                        MergedEvidence {
                            evidence: evidence.clone(),
                            cited_by: BTreeSet::from([verdict.agent_id().to_string()]),
                        },
                    );
                }
            }
        }
    }

    let mut merged: Vec<MergedEvidence> = by_url.into_values().collect();
    merged.sort_by(|a, b| {
        b.score()
            .total_cmp(&a.score())
            .then_with(|| a.evidence.url().cmp(b.evidence.url()))
    });

    tracing::debug!(
        verdicts = verdicts.len(),
        merged = merged.len(),
        "Merged evidence"
    );
    merged
}

/// Total order between two copies of the same URL
///
/// Score decides; the remaining fields only settle exact score ties so the
/// kept copy never depends on which agent was seen first.
fn preference(a: &Evidence, b: &Evidence) -> Ordering {
    a.score()
        .total_cmp(&b.score())
        .then_with(|| a.credibility().total_cmp(&b.credibility()))
        .then_with(|| a.relevance().total_cmp(&b.relevance()))
        .then_with(|| b.category().cmp(&a.category()))
        .then_with(|| b.title().cmp(a.title()))
        .then_with(|| a.snippet().cmp(&b.snippet()))
        .then_with(|| a.published().cmp(&b.published()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::{Outcome, SourceCategory};
    use proptest::prelude::*;
    use std::time::Duration;

    fn ev(url: &str, relevance: f64, credibility: f64) -> Evidence {
        Evidence::new(url, "title", SourceCategory::News, relevance, credibility).unwrap()
    }

    fn verdict(id: &str, evidence: Vec<Evidence>) -> Verdict {
        Verdict::new(id, Outcome::Yes, 0.8, evidence, Duration::ZERO).unwrap()
    }

    #[test]
    fn test_duplicates_keep_best_and_union_citations() {
        let a = verdict(
            "a",
            vec![ev("https://x.com/1", 0.5, 0.5), ev("https://x.com/2", 0.9, 0.9)],
        );
        let b = verdict("b", vec![ev("https://X.com/1?utm_source=t", 0.9, 0.8)]);

        let merged = merge_evidence(&[&a, &b]);
        assert_eq!(merged.len(), 2);

        assert_eq!(merged[0].evidence.url(), "https://x.com/2");
        assert_eq!(merged[1].evidence.url(), "https://x.com/1");
        assert!((merged[1].score() - 0.72).abs() < 1e-12);
        assert_eq!(
            merged[1].cited_by.iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_equal_scores_sorted_by_url() {
        let a = verdict("a", vec![ev("https://b.com/", 0.5, 0.5), ev("https://a.com/", 0.5, 0.5)]);
        let merged = merge_evidence(&[&a]);
        assert_eq!(merged[0].evidence.url(), "https://a.com/");
    }

    #[test]
    fn test_same_agent_citing_twice() {
        let a = verdict(
            "a",
            vec![ev("https://x.com/1", 0.5, 0.5), ev("https://x.com/1", 0.6, 0.5)],
        );
        let merged = merge_evidence(&[&a]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].cited_by.len(), 1);
        assert_eq!(merged[0].evidence.relevance(), 0.6);
    }

    #[test]
    fn test_serialized_shape() {
        let a = verdict("a", vec![ev("https://x.com/1", 0.5, 0.5)]);
        let json = serde_json::to_value(merge_evidence(&[&a])).unwrap();
        assert_eq!(json[0]["url"], "https://x.com/1");
        assert_eq!(json[0]["cited_by"][0], "a");
    }

    fn arb_lists() -> impl Strategy<Value = Vec<Vec<(u8, u8, u8)>>> {
        prop::collection::vec(prop::collection::vec((0u8..12, 0u8..=10, 0u8..=10), 0..8), 1..5)
    }

    fn build(lists: &[Vec<(u8, u8, u8)>]) -> Vec<Verdict> {
        lists
            .iter()
            .enumerate()
            .map(|(i, items)| {
                let evidence = items
                    .iter()
                    .map(|(u, r, c)| {
                        ev(
                            &format!("https://site{}.com/", u),
                            *r as f64 / 10.0,
                            *c as f64 / 10.0,
                        )
                    })
                    .collect();
                verdict(&format!("agent-{}", i), evidence)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn merge_is_order_independent_and_idempotent(lists in arb_lists(), seed in any::<u64>()) {
            let verdicts = build(&lists);
            let forward: Vec<&Verdict> = verdicts.iter().collect();
            let mut shuffled = forward.clone();
            let len = shuffled.len();
            for i in 0..len {
                let j = (seed.wrapping_add(i as u64 * 7919) % len as u64) as usize;
                shuffled.swap(i, j);
            }

            let first = merge_evidence(&forward);
            let again = merge_evidence(&forward);
            let reordered = merge_evidence(&shuffled);
            prop_assert_eq!(&first, &again);
            prop_assert_eq!(&first, &reordered);

            let urls: BTreeSet<&str> = first.iter().map(|m| m.evidence.url()).collect();
            prop_assert_eq!(urls.len(), first.len());
        }
    }
}
