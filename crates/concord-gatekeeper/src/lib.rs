//! Concord Gatekeeper
//!
//! Screens verdicts against the evidence rules before they may vote.
//!
//! The Gatekeeper checks, per verdict:
//! - Evidence count against `min_sources_per_agent`
//! - Distinct categories against `min_categories`
//! - Optional per-category minimums
//!
//! and, per round, that no agent id appears twice. A verdict failing any
//! check is excluded from voting but kept, with every reason, for the
//! round's audit trail.
//!
//! # Examples
//!
//! ```
//! use concord_domain::ConsensusConfig;
//! use concord_gatekeeper::SourceValidator;
//!
//! let validator = SourceValidator::new(&ConsensusConfig::default());
//! let screening = validator.screen(&[]);
//! assert!(screening.accepted.is_empty());
//! ```

#![warn(missing_docs)]

mod validator;

pub use validator::{
    Exclusion, RejectionReason, Screening, SourceValidator, ValidationResult, ValidationStatus,
};
