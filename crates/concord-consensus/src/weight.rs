//! Vote weight computation
//!
//! `weight = confidence × source_quality`, where source quality blends
//! average credibility, category diversity and evidence volume. Pure and
//! deterministic; used only by the vote tally.

use concord_domain::{Evidence, SourceCategory, Verdict};
use std::collections::BTreeSet;

/// Share of source quality from average credibility
pub const CREDIBILITY_WEIGHT: f64 = 0.4;

/// Share of source quality from category diversity
pub const DIVERSITY_WEIGHT: f64 = 0.3;

/// Share of source quality from evidence volume
pub const VOLUME_WEIGHT: f64 = 0.3;

/// Quality of an evidence list in `[0, 1]`
///
/// `reference_count` is the evidence count at which the volume term
/// saturates. An empty list has quality 0.
///
/// # Examples
///
/// ```
/// use concord_consensus::weight::source_quality;
///
/// assert_eq!(source_quality(&[], 50), 0.0);
/// ```
pub fn source_quality(evidence: &[Evidence], reference_count: usize) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }

    let count = evidence.len() as f64;
    let avg_credibility = evidence.iter().map(Evidence::credibility).sum::<f64>() / count;

    let distinct = evidence
        .iter()
        .map(Evidence::category)
        .collect::<BTreeSet<_>>()
        .len();
    let diversity = distinct as f64 / SourceCategory::COUNT as f64;

    let volume = if reference_count == 0 {
        1.0
    } else {
        (count / reference_count as f64).min(1.0)
    };

    let quality = CREDIBILITY_WEIGHT * avg_credibility
        + DIVERSITY_WEIGHT * diversity
        + VOLUME_WEIGHT * volume;
    quality.clamp(0.0, 1.0)
}

/// Voting weight of a verdict in `[0, 1]`
pub fn vote_weight(verdict: &Verdict, reference_count: usize) -> f64 {
    verdict.confidence() * source_quality(verdict.evidence(), reference_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::Outcome;
    use proptest::prelude::*;
    use std::time::Duration;

    fn evidence(n: usize, categories: &[SourceCategory], credibility: f64) -> Vec<Evidence> {
        (0..n)
            .map(|i| {
                Evidence::new(
                    &format!("https://example.com/{}", i),
                    "t",
                    categories[i % categories.len()],
                    0.8,
                    credibility,
                )
                .unwrap()
            })
            .collect()
    }

    const THREE: [SourceCategory; 3] = [
        SourceCategory::Official,
        SourceCategory::News,
        SourceCategory::FactCheck,
    ];

    #[test]
    fn test_quality_formula() {
        // 0.4 × 0.9 + 0.3 × 3/5 + 0.3 × 1.0
        let q = source_quality(&evidence(50, &THREE, 0.9), 50);
        assert!((q - 0.84).abs() < 1e-9);
    }

    #[test]
    fn test_volume_saturates() {
        let at = source_quality(&evidence(50, &THREE, 0.9), 50);
        let above = source_quality(&evidence(120, &THREE, 0.9), 50);
        assert!((at - above).abs() < 1e-9);

        let half = source_quality(&evidence(25, &THREE, 0.9), 50);
        assert!((at - half - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_weight_scales_with_confidence() {
        let v = Verdict::new("a", Outcome::Yes, 0.5, evidence(50, &THREE, 0.9), Duration::ZERO)
            .unwrap();
        assert!((vote_weight(&v, 50) - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_zero_reference_count() {
        let q = source_quality(&evidence(1, &[SourceCategory::News], 1.0), 0);
        assert!((q - (0.4 + 0.3 / 5.0 + 0.3)).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn weight_in_unit_interval(
            n in 0usize..120,
            cats in 1usize..=5,
            credibility in 0.0f64..=1.0,
            confidence in 0.0f64..=1.0,
            reference in 0usize..100,
        ) {
            let ev = if n == 0 {
                Vec::new()
            } else {
                evidence(n, &SourceCategory::ALL[..cats], credibility)
            };
            let v = Verdict::new("p", Outcome::No, confidence, ev, Duration::ZERO).unwrap();
            let w = vote_weight(&v, reference);
            prop_assert!((0.0..=1.0).contains(&w));
        }
    }
}
