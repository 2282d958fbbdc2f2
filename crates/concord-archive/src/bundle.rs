//! Research bundles: the archived record of one resolution

use crate::{
    canonical_hash, content_hash, to_canonical_json, ArchiveError, ContentId, EvidenceSink, Result,
};
use concord_consensus::ConsensusResult;
use concord_domain::Verdict;
use serde::{Deserialize, Serialize};

/// Bundle format version
pub const BUNDLE_VERSION: &str = "1.0.0";

/// Everything needed to audit one resolution after the fact
#[derive(Debug, Clone, Serialize)]
pub struct ResearchBundle {
    /// Bundle format version
    pub version: String,

    /// Question that was resolved
    pub question: String,

    /// Resolution criteria given to the agents
    pub criteria: String,

    /// Decision with its full round trail
    pub result: ConsensusResult,

    /// Verdicts received in the deciding round, ordered by agent id
    pub verdicts: Vec<Verdict>,

    /// Summary counts
    pub stats: BundleStats,
}

/// Summary counts stored with a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleStats {
    /// Verdicts received in the deciding round
    pub total_agents: usize,

    /// Verdicts that voted in the deciding round
    pub valid_agents: usize,

    /// Evidence items cited across all received verdicts
    pub total_sources: usize,

    /// Entries in the merged evidence list
    pub unique_sources: usize,
}

impl ResearchBundle {
    /// Assemble a bundle
    pub fn new(
        question: impl Into<String>,
        criteria: impl Into<String>,
        result: ConsensusResult,
        mut verdicts: Vec<Verdict>,
    ) -> Self {
        verdicts.sort_by(|a, b| a.agent_id().cmp(b.agent_id()));
        let stats = BundleStats {
            total_agents: verdicts.len(),
            valid_agents: result.trail.last().map_or(0, |r| r.validated.len()),
            total_sources: verdicts.iter().map(Verdict::evidence_count).sum(),
            unique_sources: result.evidence.len(),
        };
        Self {
            version: BUNDLE_VERSION.to_string(),
            question: question.into(),
            criteria: criteria.into(),
            result,
            verdicts,
            stats,
        }
    }

    /// Canonical bytes of this bundle
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        to_canonical_json(self)
    }
}

/// Where and how a bundle was stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReceipt {
    /// Sink identifier
    pub content_id: ContentId,

    /// SHA-256 of the canonical bytes
    pub content_hash: String,

    /// Stored size in bytes
    pub size: usize,
}

/// Canonicalize `bundle`, hash it and store it in `sink`
pub fn archive<S: EvidenceSink>(bundle: &ResearchBundle, sink: &mut S) -> Result<ArchiveReceipt> {
    let (bytes, hash) = canonical_hash(bundle)?;
    let content_id = sink
        .store(&bytes)
        .map_err(|e| ArchiveError::Sink(e.to_string()))?;

    tracing::info!(
        content_id = %content_id,
        hash = %hash,
        size = bytes.len(),
        "Archived research bundle"
    );

    Ok(ArchiveReceipt {
        content_id,
        content_hash: hash,
        size: bytes.len(),
    })
}

/// Check stored bytes against an expected content hash
///
/// Bytes exactly as archived match directly. Otherwise they are
/// re-canonicalized, so a bundle that was pretty-printed after archiving
/// still verifies.
///
/// # Errors
///
/// [`ArchiveError::Serialization`] if the bytes are not JSON.
pub fn verify_bundle(bytes: &[u8], expected_hash: &str) -> Result<bool> {
    let expected_hash = expected_hash.trim();
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if content_hash(bytes).eq_ignore_ascii_case(expected_hash) {
        return Ok(true);
    }
    let canonical = to_canonical_json(&value)?;
    Ok(content_hash(&canonical).eq_ignore_ascii_case(expected_hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;
    use concord_consensus::{Resolution, RoundDecision};
    use concord_domain::{ConsensusConfig, Evidence, Outcome, SourceCategory};
    use std::time::Duration;

    fn verdict(id: &str) -> Verdict {
        let evidence = (0..5)
            .map(|i| {
                Evidence::new(
                    &format!("https://news{}.example.com/story", i),
                    "Story",
                    SourceCategory::News,
                    0.9,
                    0.8,
                )
                .unwrap()
            })
            .collect();
        Verdict::new(id, Outcome::Yes, 0.9, evidence, Duration::from_secs(3)).unwrap()
    }

    fn bundle() -> ResearchBundle {
        let verdicts = vec![verdict("b"), verdict("a")];
        let mut resolution = Resolution::new(ConsensusConfig::lenient()).unwrap();
        let result = match resolution.record_round(&verdicts, Vec::new()).unwrap() {
            RoundDecision::Resolved(result) => *result,
            other => panic!("Expected resolution, got {:?}", other),
        };
        ResearchBundle::new("Did it happen?", "Official confirmation", result, verdicts)
    }

    #[test]
    fn test_bundle_stats() {
        let bundle = bundle();
        assert_eq!(bundle.verdicts[0].agent_id(), "a");
        assert_eq!(
            bundle.stats,
            BundleStats {
                total_agents: 2,
                valid_agents: 2,
                total_sources: 10,
                unique_sources: 5,
            }
        );
    }

    #[test]
    fn test_archive_and_verify() {
        let bundle = bundle();
        let mut sink = MemorySink::new();
        let receipt = archive(&bundle, &mut sink).unwrap();

        let stored = sink.load(&receipt.content_id).unwrap().unwrap();
        assert_eq!(stored.len(), receipt.size);
        assert!(verify_bundle(&stored, &receipt.content_hash).unwrap());

        // Whitespace and key order do not matter, content does
        let value: serde_json::Value = serde_json::from_slice(&stored).unwrap();
        let pretty = serde_json::to_vec_pretty(&value).unwrap();
        assert!(verify_bundle(&pretty, &receipt.content_hash).unwrap());

        let tampered = String::from_utf8(stored).unwrap().replace("Did it happen?", "Did it not?");
        assert!(!verify_bundle(tampered.as_bytes(), &receipt.content_hash).unwrap());
    }

    fn uneven_verdict(id: &str, seed: f64) -> Verdict {
        let categories = [
            SourceCategory::Official,
            SourceCategory::News,
            SourceCategory::FactCheck,
        ];
        let evidence = (0..7)
            .map(|i| {
                let x = (seed * 7.31 + i as f64 * 0.137).fract();
                Evidence::new(
                    &format!("https://{}.example.com/{}", id, i),
                    "Story",
                    categories[i % 3],
                    x,
                    (x * 1.618).fract(),
                )
                .unwrap()
            })
            .collect();
        let confidence = (seed * 3.7).fract();
        let duration = Duration::from_secs_f64(seed * 11.3);
        Verdict::new(id, Outcome::No, confidence, evidence, duration).unwrap()
    }

    #[test]
    fn test_verify_with_computed_scores() {
        for n in 1..=20 {
            let seed = n as f64 / 21.0 + 0.0123;
            let verdicts = vec![
                uneven_verdict("a", seed),
                uneven_verdict("b", seed * 1.37),
                uneven_verdict("c", seed * 0.71),
            ];
            let mut resolution = Resolution::new(ConsensusConfig::lenient()).unwrap();
            let result = match resolution.record_round(&verdicts, Vec::new()).unwrap() {
                RoundDecision::Resolved(result) => *result,
                other => panic!("Expected resolution, got {:?}", other),
            };
            let bundle = ResearchBundle::new("q", "c", result, verdicts);

            let mut sink = MemorySink::new();
            let receipt = archive(&bundle, &mut sink).unwrap();
            let stored = sink.load(&receipt.content_id).unwrap().unwrap();
            assert!(verify_bundle(&stored, &receipt.content_hash).unwrap(), "bundle {} failed", n);

            let value: serde_json::Value = serde_json::from_slice(&stored).unwrap();
            let pretty = serde_json::to_vec_pretty(&value).unwrap();
            assert!(
                verify_bundle(&pretty, &receipt.content_hash).unwrap(),
                "pretty bundle {} failed",
                n
            );
        }
    }

    #[test]
    fn test_archive_is_deterministic() {
        let first = archive(&bundle(), &mut MemorySink::new()).unwrap();
        let second = archive(&bundle(), &mut MemorySink::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_rejects_non_json() {
        assert!(matches!(
            verify_bundle(b"not json", "00"),
            Err(ArchiveError::Serialization(_))
        ));
    }
}
