//! Evidence module - a single cited source supporting a verdict

use crate::{canonicalize_url, DomainError, SourceCategory, SourceRules};
use serde::{Deserialize, Serialize};

/// Relevance assumed when an agent does not report one
pub const DEFAULT_RELEVANCE: f64 = 0.8;

/// One cited source, as produced by an agent on the wire
///
/// Every field except the URL is optional here; [`Evidence::from_raw`]
/// decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvidence {
    /// URL as cited
    pub url: String,

    /// Source title
    #[serde(default)]
    pub title: String,

    /// Category wire name, classified from the URL when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Relevance in `[0, 1]`
    #[serde(default, alias = "relevance", skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,

    /// Credibility in `[0, 1]`, scored from the URL when absent
    #[serde(default, alias = "credibility", skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<f64>,

    /// Cited text excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Publication date as reported by the source
    #[serde(default, alias = "date", skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

/// A validated, canonicalized piece of evidence
///
/// Fields are private: once built, evidence is never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    url: String,
    title: String,
    category: SourceCategory,
    relevance: f64,
    credibility: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    published: Option<String>,
}

impl Evidence {
    /// Create evidence from already-typed parts
    ///
    /// The URL is canonicalized; scores must be finite and in `[0, 1]`.
    pub fn new(
        url: &str,
        title: impl Into<String>,
        category: SourceCategory,
        relevance: f64,
        credibility: f64,
    ) -> Result<Self, DomainError> {
        let url = canonicalize_url(url)?;
        check_unit("relevance", relevance)
            .and_then(|_| check_unit("credibility", credibility))
            .map_err(DomainError::InvalidScore)?;
        Ok(Self {
            url,
            title: title.into(),
            category,
            relevance,
            credibility,
            snippet: None,
            published: None,
        })
    }

    /// Attach the cited text excerpt
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Attach the publication date
    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = Some(published.into());
        self
    }

    /// Build evidence from agent output
    ///
    /// Missing category and credibility are filled in from `rules`; a present
    /// but unrecognised category is rejected.
    pub fn from_raw(
        raw: &RawEvidence,
        agent_id: &str,
        rules: &SourceRules,
    ) -> Result<Self, DomainError> {
        let url = canonicalize_url(&raw.url)
            .map_err(|e| DomainError::malformed(agent_id, e.to_string()))?;

        let category = match raw.category.as_deref() {
            Some(name) => SourceCategory::parse(name).ok_or_else(|| {
                DomainError::malformed(agent_id, format!("unknown source category '{}'", name))
            })?,
            None => rules.category.classify(&url),
        };

        let relevance = raw.relevance_score.unwrap_or(DEFAULT_RELEVANCE);
        let credibility = match raw.credibility_score {
            Some(score) => score,
            None => rules.credibility.score(&url),
        };
        check_unit("relevance", relevance)
            .and_then(|_| check_unit("credibility", credibility))
            .map_err(|e| DomainError::malformed(agent_id, format!("{} for {}", e, url)))?;

        Ok(Self {
            url,
            title: raw.title.trim().to_string(),
            category,
            relevance,
            credibility,
            snippet: raw.snippet.clone().filter(|s| !s.is_empty()),
            published: raw.published.clone().filter(|s| !s.is_empty()),
        })
    }

    /// Canonical URL (the deduplication key)
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Source title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Source category
    pub fn category(&self) -> SourceCategory {
        self.category
    }

    /// Relevance in `[0, 1]`
    pub fn relevance(&self) -> f64 {
        self.relevance
    }

    /// Credibility in `[0, 1]`
    pub fn credibility(&self) -> f64 {
        self.credibility
    }

    /// Cited text excerpt, if any
    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    /// Publication date, if any
    pub fn published(&self) -> Option<&str> {
        self.published.as_deref()
    }

    /// Ranking score: `relevance × credibility`
    pub fn score(&self) -> f64 {
        self.relevance * self.credibility
    }
}

pub(crate) fn check_unit(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} {} outside [0, 1]", name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(url: &str) -> RawEvidence {
        RawEvidence {
            url: url.to_string(),
            title: " Title ".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_canonicalizes_url() {
        let url = "https://Reuters.com/a?utm_source=x";
        let e = Evidence::new(url, "t", SourceCategory::News, 0.9, 0.95).unwrap();
        assert_eq!(e.url(), "https://reuters.com/a");
        assert!((e.score() - 0.855).abs() < 1e-12);
    }

    #[test]
    fn test_new_rejects_out_of_range_scores() {
        assert!(Evidence::new("https://a.com/", "t", SourceCategory::News, 1.2, 0.5).is_err());
        assert!(Evidence::new("https://a.com/", "t", SourceCategory::News, 0.5, f64::NAN).is_err());
    }

    #[test]
    fn test_from_raw_fills_defaults_from_rules() {
        let rules = SourceRules::default();
        let e = Evidence::from_raw(&raw("https://www.sec.gov/x"), "agent-1", &rules).unwrap();
        assert_eq!(e.category(), SourceCategory::Official);
        assert_eq!(e.credibility(), 0.95);
        assert_eq!(e.relevance(), DEFAULT_RELEVANCE);
        assert_eq!(e.title(), "Title");
    }

    #[test]
    fn test_from_raw_rejects_unknown_category() {
        let mut r = raw("https://example.com/");
        r.category = Some("blog".to_string());
        let err = Evidence::from_raw(&r, "agent-1", &SourceRules::default()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MalformedVerdict { ref agent_id, .. } if agent_id == "agent-1"
        ));
    }

    #[test]
    fn test_from_raw_rejects_bad_url_and_scores() {
        let rules = SourceRules::default();
        assert!(Evidence::from_raw(&raw("nope"), "a", &rules).is_err());

        let mut r = raw("https://example.com/");
        r.relevance_score = Some(-0.1);
        assert!(Evidence::from_raw(&r, "a", &rules).is_err());
    }

    #[test]
    fn test_raw_accepts_aliases() {
        let r: RawEvidence = serde_json::from_str(
            r#"{"url":"https://a.com/","relevance":0.5,"credibility":0.6,"date":"2025-01-01"}"#,
        )
        .unwrap();
        assert_eq!(r.relevance_score, Some(0.5));
        assert_eq!(r.credibility_score, Some(0.6));
        assert_eq!(r.published.as_deref(), Some("2025-01-01"));
    }
}
