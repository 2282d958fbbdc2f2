//! Source categories for cited evidence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a cited source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceCategory {
    /// Government, regulator, or company press material
    Official,

    /// Wire services and major news outlets
    News,

    /// Social platforms
    Social,

    /// Industry or subject-specific sites
    DomainSpecific,

    /// Fact-checking organisations
    FactCheck,
}

impl SourceCategory {
    /// All categories in report order
    pub const ALL: [SourceCategory; 5] = [
        SourceCategory::Official,
        SourceCategory::News,
        SourceCategory::Social,
        SourceCategory::DomainSpecific,
        SourceCategory::FactCheck,
    ];

    /// Total number of categories (denominator of category diversity)
    pub const COUNT: usize = Self::ALL.len();

    /// Get the wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Official => "OFFICIAL",
            SourceCategory::News => "NEWS",
            SourceCategory::Social => "SOCIAL",
            SourceCategory::DomainSpecific => "DOMAIN_SPECIFIC",
            SourceCategory::FactCheck => "FACT_CHECK",
        }
    }

    /// Parse a category from its wire name (ASCII case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFFICIAL" => Some(SourceCategory::Official),
            "NEWS" => Some(SourceCategory::News),
            "SOCIAL" => Some(SourceCategory::Social),
            "DOMAIN_SPECIFIC" => Some(SourceCategory::DomainSpecific),
            "FACT_CHECK" => Some(SourceCategory::FactCheck),
            _ => None,
        }
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source category: {}", s))
    }
}
