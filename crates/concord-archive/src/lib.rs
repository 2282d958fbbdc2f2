//! Concord Archive
//!
//! Turns a finished resolution into a canonical, hashable research bundle,
//! stores it through an [`EvidenceSink`] and produces the
//! [`SubmissionRecord`] for the settlement layer.
//!
//! The hash covers the canonical serialization only, so anyone holding the
//! bundle can recompute it with [`verify_bundle`].

#![warn(missing_docs)]

pub mod bundle;
pub mod canonical;
pub mod error;
pub mod sink;
pub mod submission;

pub use bundle::{
    archive, verify_bundle, ArchiveReceipt, BundleStats, ResearchBundle, BUNDLE_VERSION,
};
pub use canonical::{canonical_hash, content_hash, to_canonical_json};
pub use error::{ArchiveError, Result};
pub use sink::{ContentId, DirectorySink, EvidenceSink, MemorySink};
pub use submission::SubmissionRecord;
