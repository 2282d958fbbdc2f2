//! Data-driven URL classification tables
//!
//! Evidence that arrives without a category or credibility score is scored
//! by an ordered rule table: the first predicate that matches wins, and an
//! explicit default covers everything else. The tables are plain data so
//! they can be reviewed, serialized, or swapped without touching the
//! consensus logic.

use crate::SourceCategory;
use serde::{Deserialize, Serialize};
use url::Url;

/// Predicate over the host and path of a canonical URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UrlPredicate {
    /// Host equals the value or ends with `.` + value (label boundary)
    HostSuffix(String),

    /// Host contains the value anywhere
    HostContains(String),

    /// Path (lower-cased) contains the value
    PathContains(String),
}

impl UrlPredicate {
    /// Evaluate the predicate against a lower-case host and path
    pub fn matches(&self, host: &str, path: &str) -> bool {
        match self {
            UrlPredicate::HostSuffix(suffix) => {
                host == suffix
                    || (host.len() > suffix.len()
                        && host.ends_with(suffix.as_str())
                        && host.as_bytes()[host.len() - suffix.len() - 1] == b'.')
            }
            UrlPredicate::HostContains(needle) => host.contains(needle.as_str()),
            UrlPredicate::PathContains(needle) => path.contains(needle.as_str()),
        }
    }
}

/// Split a URL into (host, lower-cased path); unparsable URLs yield empty parts
fn url_parts(url: &str) -> (String, String) {
    match Url::parse(url) {
        Ok(parsed) => (
            parsed.host_str().unwrap_or_default().to_ascii_lowercase(),
            parsed.path().to_ascii_lowercase(),
        ),
        Err(_) => (String::new(), String::new()),
    }
}

/// Ordered `predicate → category` table with an explicit default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    /// Rules evaluated in order; first match wins
    pub rules: Vec<(UrlPredicate, SourceCategory)>,

    /// Category when no rule matches
    pub default: SourceCategory,
}

impl CategoryRules {
    /// Classify a URL
    pub fn classify(&self, url: &str) -> SourceCategory {
        let (host, path) = url_parts(url);
        self.rules
            .iter()
            .find(|(predicate, _)| predicate.matches(&host, &path))
            .map(|(_, category)| *category)
            .unwrap_or(self.default)
    }

    /// Standard table used by the research agents
    pub fn standard() -> Self {
        use SourceCategory::*;
        use UrlPredicate::*;

        let mut rules = Vec::new();
        for suffix in ["gov", "edu", "mil", "gov.uk", "europa.eu", "un.org", "who.int"] {
            rules.push((HostSuffix(suffix.to_string()), Official));
        }
        rules.push((HostContains(".gov.".to_string()), Official));
        for fragment in ["newsroom", "press", "investor", "corporate"] {
            rules.push((PathContains(fragment.to_string()), Official));
        }
        for domain in [
            "reuters.com", "apnews.com", "bbc.com", "bbc.co.uk", "bloomberg.com", "cnn.com",
            "nytimes.com", "wsj.com", "theguardian.com", "washingtonpost.com", "forbes.com",
            "ft.com", "economist.com", "usatoday.com", "nbcnews.com", "cbsnews.com",
            "abcnews.go.com", "foxnews.com", "politico.com", "axios.com", "thehill.com",
            "npr.org", "pbs.org",
        ] {
            rules.push((HostSuffix(domain.to_string()), News));
        }
        for domain in [
            "twitter.com", "x.com", "reddit.com", "facebook.com", "linkedin.com",
            "youtube.com", "instagram.com", "tiktok.com", "threads.net",
        ] {
            rules.push((HostSuffix(domain.to_string()), Social));
        }
        rules.push((HostContains("mastodon".to_string()), Social));
        for domain in [
            "snopes.com", "politifact.com", "factcheck.org", "fullfact.org",
            "leadstories.com", "checkyourfact.com",
        ] {
            rules.push((HostSuffix(domain.to_string()), FactCheck));
        }

        Self {
            rules,
            default: DomainSpecific,
        }
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Ordered `predicate → credibility` table with an explicit default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityRules {
    /// Rules evaluated in order; first match wins
    pub rules: Vec<(UrlPredicate, f64)>,

    /// Score when no rule matches
    pub default: f64,
}

impl CredibilityRules {
    /// Score a URL in `[0, 1]`
    pub fn score(&self, url: &str) -> f64 {
        let (host, path) = url_parts(url);
        self.rules
            .iter()
            .find(|(predicate, _)| predicate.matches(&host, &path))
            .map(|(_, score)| *score)
            .unwrap_or(self.default)
            .clamp(0.0, 1.0)
    }

    /// Standard table used by the research agents
    pub fn standard() -> Self {
        use UrlPredicate::*;

        let mut rules = Vec::new();
        for domain in [
            "gov", "edu", "reuters.com", "apnews.com", "bbc.com", "bloomberg.com", "wsj.com",
            "ft.com", "economist.com",
        ] {
            rules.push((HostSuffix(domain.to_string()), 0.95));
        }
        rules.push((HostContains(".gov.".to_string()), 0.95));
        for domain in [
            "nytimes.com", "washingtonpost.com", "theguardian.com", "cnn.com", "forbes.com",
            "politico.com", "npr.org",
        ] {
            rules.push((HostSuffix(domain.to_string()), 0.85));
        }
        for domain in ["twitter.com", "x.com", "reddit.com", "youtube.com"] {
            rules.push((HostSuffix(domain.to_string()), 0.70));
        }

        Self {
            rules,
            default: 0.75,
        }
    }
}

impl Default for CredibilityRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Both classification tables, passed together to verdict parsing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRules {
    /// Category table
    pub category: CategoryRules,

    /// Credibility table
    pub credibility: CredibilityRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_suffix_respects_label_boundary() {
        let rule = UrlPredicate::HostSuffix("x.com".to_string());
        assert!(rule.matches("x.com", "/"));
        assert!(rule.matches("mobile.x.com", "/"));
        assert!(!rule.matches("max.com", "/"));
    }

    #[test]
    fn test_standard_categories() {
        let rules = CategoryRules::standard();
        assert_eq!(rules.classify("https://www.sec.gov/filing"), SourceCategory::Official);
        assert_eq!(rules.classify("https://www.reuters.com/world/x"), SourceCategory::News);
        assert_eq!(rules.classify("https://twitter.com/user/status/1"), SourceCategory::Social);
        assert_eq!(
            rules.classify("https://www.snopes.com/fact-check/x"),
            SourceCategory::FactCheck
        );
        assert_eq!(rules.classify("https://coindesk.com/markets"), SourceCategory::DomainSpecific);
    }

    #[test]
    fn test_first_match_wins() {
        // Press room path on a news domain matches the earlier OFFICIAL rule
        let rules = CategoryRules::standard();
        assert_eq!(rules.classify("https://bbc.com/press/release"), SourceCategory::Official);
    }

    #[test]
    fn test_unparsable_falls_back_to_default() {
        let rules = CategoryRules::standard();
        assert_eq!(rules.classify("::::"), SourceCategory::DomainSpecific);
        let scores = CredibilityRules::standard();
        assert_eq!(scores.score("::::"), 0.75);
    }

    #[test]
    fn test_standard_credibility() {
        let scores = CredibilityRules::standard();
        assert_eq!(scores.score("https://data.census.gov/table"), 0.95);
        assert_eq!(scores.score("https://www.nytimes.com/a"), 0.85);
        assert_eq!(scores.score("https://reddit.com/r/x"), 0.70);
        assert_eq!(scores.score("https://example.org/"), 0.75);
    }

    #[test]
    fn test_custom_table() {
        let rules = CategoryRules {
            rules: vec![(
                UrlPredicate::HostSuffix("example.org".to_string()),
                SourceCategory::FactCheck,
            )],
            default: SourceCategory::Social,
        };
        assert_eq!(rules.classify("https://a.example.org/"), SourceCategory::FactCheck);
        assert_eq!(rules.classify("https://other.net/"), SourceCategory::Social);
    }
}
