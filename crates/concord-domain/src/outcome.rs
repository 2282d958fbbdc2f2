//! Outcome module - the closed answer set for a resolution question

use serde::{Deserialize, Serialize};
use std::fmt;

/// Answer an agent (or the consensus) gives to "did event X occur?"
///
/// Ordering is declaration order and is only used to keep maps and reports
/// deterministic; it carries no preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The event occurred
    Yes,

    /// The event did not occur
    No,

    /// The evidence does not settle the question
    Undetermined,
}

impl Outcome {
    /// All outcomes in report order
    pub const ALL: [Outcome; 3] = [Outcome::Yes, Outcome::No, Outcome::Undetermined];

    /// Get the wire name of the outcome
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Yes => "YES",
            Outcome::No => "NO",
            Outcome::Undetermined => "UNDETERMINED",
        }
    }

    /// Parse an outcome from its wire name (ASCII case-insensitive)
    ///
    /// Anything outside the closed set, including the legacy `INVALID`
    /// marker, is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" => Some(Outcome::Yes),
            "NO" => Some(Outcome::No),
            "UNDETERMINED" => Some(Outcome::Undetermined),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid outcome: {}", s))
    }
}
