//! Replay of recorded agent verdicts.
//!
//! A recording holds, for each round, the raw verdicts the agents returned.
//! Replaying it through the engine reproduces the decision offline.

use crate::error::{CliError, Result};
use async_trait::async_trait;
use concord_domain::RawVerdict;
use concord_engine::{AgentError, ResearchAgent, ResearchRequest};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Recorded agent output for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Question that was researched
    pub question: String,

    /// Resolution criteria
    #[serde(default)]
    pub criteria: String,

    /// Raw verdicts per round, first round first
    pub rounds: Vec<Vec<RawVerdict>>,
}

impl Recording {
    /// Load a recording from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a recording from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let recording: Self = serde_json::from_str(json)?;
        recording.validate()?;
        Ok(recording)
    }

    fn validate(&self) -> Result<()> {
        if self.rounds.is_empty() {
            return Err(CliError::InvalidInput("recording has no rounds".to_string()));
        }
        for (index, round) in self.rounds.iter().enumerate() {
            let mut seen = BTreeSet::new();
            for verdict in round {
                let id = verdict.agent_id.trim();
                if id.is_empty() {
                    return Err(CliError::InvalidInput(format!(
                        "round {} has a verdict without agent_id",
                        index + 1
                    )));
                }
                if !seen.insert(id) {
                    return Err(CliError::InvalidInput(format!(
                        "round {} has two verdicts from '{}'",
                        index + 1,
                        id
                    )));
                }
            }
        }
        Ok(())
    }

    /// One replay agent per agent id seen in any round.
    pub fn agents(&self) -> Vec<Arc<dyn ResearchAgent>> {
        let mut by_agent: BTreeMap<String, Vec<Option<RawVerdict>>> = BTreeMap::new();
        for (index, round) in self.rounds.iter().enumerate() {
            for verdict in round {
                let answers = by_agent
                    .entry(verdict.agent_id.trim().to_string())
                    .or_insert_with(|| vec![None; self.rounds.len()]);
                answers[index] = Some(verdict.clone());
            }
        }

        by_agent
            .into_iter()
            .map(|(id, answers)| Arc::new(ReplayAgent { id, answers }) as Arc<dyn ResearchAgent>)
            .collect()
    }
}

/// Agent that answers each round with its recorded verdict.
#[derive(Debug, Clone)]
pub struct ReplayAgent {
    id: String,
    answers: Vec<Option<RawVerdict>>,
}

#[async_trait]
impl ResearchAgent for ReplayAgent {
    fn id(&self) -> &str {
        &self.id
    }

    async fn research(
        &self,
        request: &ResearchRequest,
    ) -> std::result::Result<RawVerdict, AgentError> {
        let index = (request.round as usize).saturating_sub(1);
        self.answers
            .get(index)
            .cloned()
            .flatten()
            .ok_or_else(|| {
                AgentError::Failed(format!("no recorded verdict for round {}", request.round))
            })
    }
}
