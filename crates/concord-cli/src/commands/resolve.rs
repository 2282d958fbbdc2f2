//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::replay::Recording;
use concord_archive::{DirectorySink, SubmissionRecord};
use concord_consensus::ConsensusResult;
use concord_engine::{EngineConfig, ResolutionEngine, RetryPolicy};
use std::path::Path;
use tracing::info;

/// Execute the resolve command.
pub async fn execute_resolve(args: ResolveArgs, formatter: &Formatter) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.preset.as_deref())?;
    let recording = Recording::load(&args.recording)?;

    let (result, submission) = replay(&recording, config, args.archive_dir.as_deref()).await?;

    println!("{}", formatter.format_result(&result)?);
    if let Some(submission) = &submission {
        if formatter.is_structured() {
            println!("{}", formatter.format_submission(submission)?);
        } else {
            println!("{}", formatter.success("Research bundle archived"));
            println!("{}", formatter.format_submission(submission)?);
        }
    }
    if args.summary && !formatter.is_structured() {
        println!("{}", result.summary());
    }
    if result.requires_manual_review && !formatter.is_structured() {
        println!("{}", formatter.warning("Consensus not reached; route to manual review"));
    }

    Ok(())
}

/// Engine configuration from a file, a preset name, or the default.
pub fn load_config(path: Option<&Path>, preset: Option<&str>) -> Result<EngineConfig> {
    match (path, preset) {
        (Some(path), _) => Ok(EngineConfig::load(path)?),
        (None, Some(name)) => EngineConfig::preset(name)
            .ok_or_else(|| CliError::Config(format!("unknown preset '{}'", name))),
        (None, None) => Ok(EngineConfig::default()),
    }
}

/// Run a recording through the engine, archiving when a directory is given.
pub async fn replay(
    recording: &Recording,
    mut config: EngineConfig,
    archive_dir: Option<&Path>,
) -> Result<(ConsensusResult, Option<SubmissionRecord>)> {
    // Recorded answers never change between attempts
    config.collector.retry = RetryPolicy::none();
    if recording.rounds.len() < config.consensus.max_rounds as usize {
        info!(
            recorded = recording.rounds.len(),
            max_rounds = config.consensus.max_rounds,
            "Recording has fewer rounds than allowed; later rounds will see failures"
        );
    }

    let mut engine = ResolutionEngine::new(config, recording.agents())?;

    match archive_dir {
        Some(dir) => {
            let mut sink = DirectorySink::new(dir)?;
            let archived = engine
                .resolve_and_archive(&recording.question, &recording.criteria, &mut sink)
                .await?;
            Ok((archived.report.result, Some(archived.submission)))
        }
        None => {
            let report = engine.resolve(&recording.question, &recording.criteria).await?;
            Ok((report.result, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_archive::verify_bundle;
    use concord_domain::Outcome;
    use concord_engine::EngineError;
    use serde_json::json;

    fn verdict(agent: &str, outcome: &str) -> serde_json::Value {
        let sources: Vec<_> = (0..6)
            .map(|i| {
                json!({"url": format!("https://www.reuters.com/story-{}", i), "title": "Story"})
            })
            .collect();
        json!({"agent_id": agent, "outcome": outcome, "confidence": 0.8, "sources": sources})
    }

    fn recording(rounds: Vec<Vec<serde_json::Value>>) -> Recording {
        let value = json!({
            "question": "Did it happen?",
            "criteria": "Reuters report",
            "rounds": rounds,
        });
        Recording::from_json(&value.to_string()).unwrap()
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None, None).unwrap(), EngineConfig::default());
        assert_eq!(load_config(None, Some("lenient")).unwrap(), EngineConfig::lenient());
        assert!(matches!(load_config(None, Some("nope")), Err(CliError::Config(_))));
    }

    #[tokio::test]
    async fn test_replay_reaches_consensus_and_archives() {
        let recording = recording(vec![vec![
            verdict("a", "YES"),
            verdict("b", "YES"),
            verdict("c", "YES"),
        ]]);
        let dir = tempfile::tempdir().unwrap();

        let (result, submission) = replay(&recording, EngineConfig::lenient(), Some(dir.path()))
            .await
            .unwrap();
        assert_eq!(result.outcome, Outcome::Yes);
        assert!(!result.requires_manual_review);
        assert_eq!(result.evidence_count(), 6);

        let submission = submission.unwrap();
        let path = dir.path().join(format!("{}.json", submission.content_hash));
        let bytes = std::fs::read(path).unwrap();
        assert!(verify_bundle(&bytes, &submission.content_hash).unwrap());
    }

    #[tokio::test]
    async fn test_replay_uses_later_rounds() {
        let recording = recording(vec![
            vec![verdict("a", "YES"), verdict("b", "NO"), verdict("c", "UNDETERMINED")],
            vec![verdict("a", "NO"), verdict("b", "NO"), verdict("c", "NO")],
        ]);

        let (result, submission) = replay(&recording, EngineConfig::lenient(), None).await.unwrap();
        assert_eq!(result.outcome, Outcome::No);
        assert_eq!(result.rounds, 2);
        assert!(submission.is_none());
    }

    #[tokio::test]
    async fn test_replay_with_too_few_agents() {
        let recording = recording(vec![vec![verdict("a", "YES")]]);
        let result = replay(&recording, EngineConfig::lenient(), None).await;
        assert!(matches!(result, Err(CliError::Engine(EngineError::Config(_)))));
    }
}
