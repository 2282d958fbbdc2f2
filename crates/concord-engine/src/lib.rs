//! Concord Engine
//!
//! Asynchronous shell around the consensus core: invokes research agents
//! concurrently, retries transient failures, runs rounds until the
//! [`Resolution`](concord_consensus::Resolution) state machine finishes, and
//! optionally archives the result.
//!
//! ## Key Concepts
//!
//! - **ResearchAgent**: external collaborator producing raw verdicts
//! - **ResultCollector**: one round of concurrent, failure-isolated calls
//! - **RetryPolicy**: exponential backoff at the agent boundary
//! - **ResolutionEngine**: sequential round driver

#![warn(missing_docs)]

pub mod agent;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod retry;

pub use agent::{ResearchAgent, ResearchRequest};
pub use collector::{Collection, ResultCollector};
pub use config::{CollectorConfig, EngineConfig};
pub use engine::{ArchivedResolution, ResolutionEngine, ResolutionReport};
pub use error::{AgentError, CollectorError, EngineError, Result};
pub use metrics::EngineMetrics;
pub use retry::RetryPolicy;
