//! Evidence overlap analysis
//!
//! Diagnostic only: pairwise Jaccard similarity of the agents' canonical URL
//! sets. Never consulted by the vote.

use concord_domain::Verdict;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Similarity between two agents' evidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairOverlap {
    /// First agent (lower id)
    pub first: String,

    /// Second agent
    pub second: String,

    /// `|A ∩ B| / |A ∪ B|`, 0 when both are empty
    pub jaccard: f64,

    /// URLs cited by both
    pub shared: usize,
}

/// Overlap across all validated agents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapReport {
    /// Every unordered pair, ordered by agent ids
    pub pairs: Vec<PairOverlap>,

    /// Mean of the pairwise Jaccard values (0 with fewer than two agents)
    pub mean_jaccard: f64,

    /// Unique URLs across all agents
    pub union_size: usize,

    /// URLs cited by at least two agents
    pub cross_verified: usize,
}

/// Jaccard similarity of two sets
pub fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Analyze evidence overlap between `verdicts`
pub fn analyze_overlap(verdicts: &[&Verdict]) -> OverlapReport {
    let mut ordered = verdicts.to_vec();
    ordered.sort_by(|a, b| a.agent_id().cmp(b.agent_id()));
    let sets: Vec<(&str, BTreeSet<&str>)> =
        ordered.iter().map(|v| (v.agent_id(), v.urls())).collect();

    let mut pairs = Vec::new();
    for (i, (first, a)) in sets.iter().enumerate() {
        for (second, b) in &sets[i + 1..] {
            pairs.push(PairOverlap {
                first: first.to_string(),
                second: second.to_string(),
                jaccard: jaccard(a, b),
                shared: a.intersection(b).count(),
            });
        }
    }

    let mean_jaccard = if pairs.is_empty() {
        0.0
    } else {
        pairs.iter().map(|p| p.jaccard).sum::<f64>() / pairs.len() as f64
    };

    let mut citations: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, urls) in &sets {
        for url in urls {
            *citations.entry(*url).or_insert(0) += 1;
        }
    }

    OverlapReport {
        pairs,
        mean_jaccard,
        union_size: citations.len(),
        cross_verified: citations.values().filter(|&&n| n >= 2).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::{Evidence, Outcome, SourceCategory};
    use std::time::Duration;

    fn verdict(id: &str, urls: &[&str]) -> Verdict {
        let evidence = urls
            .iter()
            .map(|u| Evidence::new(u, "t", SourceCategory::News, 0.5, 0.5).unwrap())
            .collect();
        Verdict::new(id, Outcome::Yes, 0.5, evidence, Duration::ZERO).unwrap()
    }

    #[test]
    fn test_pairwise_jaccard() {
        let a = verdict("a", &["https://1.com/", "https://2.com/"]);
        let b = verdict("b", &["https://2.com/", "https://3.com/"]);
        let c = verdict("c", &[]);

        let report = analyze_overlap(&[&c, &b, &a]);
        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.pairs[0].first, "a");
        assert_eq!(report.pairs[0].second, "b");
        assert!((report.pairs[0].jaccard - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.pairs[0].shared, 1);
        assert_eq!(report.pairs[1].jaccard, 0.0);
        assert_eq!(report.union_size, 3);
        assert_eq!(report.cross_verified, 1);
    }

    #[test]
    fn test_single_agent() {
        let a = verdict("a", &["https://1.com/"]);
        let report = analyze_overlap(&[&a]);
        assert!(report.pairs.is_empty());
        assert_eq!(report.mean_jaccard, 0.0);
        assert_eq!(report.union_size, 1);
    }

    #[test]
    fn test_empty_sets() {
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }
}
