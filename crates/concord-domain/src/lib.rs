//! Concord Domain Layer
//!
//! Core value types shared by every Concord crate. Nothing in here performs I/O
//! or reads ambient configuration; callers hand a [`ConsensusConfig`] to the
//! components that need it.
//!
//! ## Key Concepts
//!
//! - **Verdict**: one agent's outcome, confidence and cited evidence
//! - **Evidence**: a single cited source, keyed by its canonical URL
//! - **Outcome**: the closed set `YES | NO | UNDETERMINED`
//! - **Rule tables**: data-driven URL classification (category, credibility)
//!
//! Agent output arrives as a loosely typed [`RawVerdict`] and is turned into a
//! [`Verdict`] by strict parsing. Anything that does not fit the schema is a
//! [`DomainError::MalformedVerdict`], never a silently defaulted value.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod category;
pub mod config;
pub mod error;
pub mod evidence;
pub mod outcome;
pub mod rules;
pub mod verdict;

// Re-exports for convenience
pub use canonical::canonicalize_url;
pub use category::SourceCategory;
pub use config::{ConsensusConfig, THRESHOLD_TOLERANCE};
pub use error::DomainError;
pub use evidence::{Evidence, RawEvidence};
pub use outcome::Outcome;
pub use rules::{CategoryRules, CredibilityRules, SourceRules, UrlPredicate};
pub use verdict::{AgentFailure, FailureKind, RawVerdict, Verdict};
