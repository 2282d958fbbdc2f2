//! Engine configuration
//!
//! Loaded from TOML by the binary and passed in explicitly; the engine never
//! reads the environment.

use crate::{EngineError, Result, RetryPolicy};
use concord_domain::ConsensusConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration for collecting one round of verdicts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Time allowed for one attempt of one agent (milliseconds)
    /// Default: 300000 (5 minutes)
    pub agent_timeout_ms: u64,

    /// Deadline for the whole round (milliseconds)
    /// Default: 900000 (15 minutes)
    pub round_deadline_ms: u64,

    /// Pause between rounds (milliseconds)
    /// Default: 0
    #[serde(default)]
    pub round_pause_ms: u64,

    /// Retry policy for individual agent calls
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            agent_timeout_ms: 300_000,
            round_deadline_ms: 900_000,
            round_pause_ms: 0,
            retry: RetryPolicy::default(),
        }
    }
}

impl CollectorConfig {
    /// Per-attempt agent timeout
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }

    /// Round deadline
    pub fn round_deadline(&self) -> Duration {
        Duration::from_millis(self.round_deadline_ms)
    }

    /// Pause between rounds
    pub fn round_pause(&self) -> Duration {
        Duration::from_millis(self.round_pause_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.agent_timeout_ms == 0 {
            return Err("agent_timeout_ms must be greater than 0".to_string());
        }
        if self.round_deadline_ms == 0 {
            return Err("round_deadline_ms must be greater than 0".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be greater than 0".to_string());
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err("retry.base_delay_ms cannot exceed retry.max_delay_ms".to_string());
        }
        Ok(())
    }
}

/// Complete engine configuration
///
/// # Examples
///
/// ```
/// use concord_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// let toml = config.to_toml().unwrap();
/// assert_eq!(EngineConfig::from_toml(&toml).unwrap(), config);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Validation, voting and round limits
    #[serde(default)]
    pub consensus: ConsensusConfig,

    /// Agent invocation
    #[serde(default)]
    pub collector: CollectorConfig,
}

impl EngineConfig {
    /// Unanimity with full source coverage
    pub fn strict() -> Self {
        Self {
            consensus: ConsensusConfig::strict(),
            collector: CollectorConfig::default(),
        }
    }

    /// Light requirements and short timeouts, for development
    pub fn lenient() -> Self {
        Self {
            consensus: ConsensusConfig::lenient(),
            collector: CollectorConfig {
                agent_timeout_ms: 60_000,
                round_deadline_ms: 180_000,
                round_pause_ms: 0,
                retry: RetryPolicy {
                    max_attempts: 2,
                    base_delay_ms: 500,
                    max_delay_ms: 5_000,
                },
            },
        }
    }

    /// Preset by name: `default`, `strict` or `lenient`
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            "lenient" => Some(Self::lenient()),
            _ => None,
        }
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<()> {
        self.consensus
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        self.collector.validate().map_err(EngineError::Config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| EngineError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
