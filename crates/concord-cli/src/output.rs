//! Output formatting for the CLI.

use crate::cli::OutputFormat;
use crate::error::Result;
use concord_archive::SubmissionRecord;
use concord_consensus::ConsensusResult;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Evidence rows shown in table mode
const TOP_EVIDENCE: usize = 10;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a consensus result.
    pub fn format_result(&self, result: &ConsensusResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => Ok(self.format_result_table(result)),
            OutputFormat::Quiet => Ok(result.outcome.to_string()),
        }
    }

    fn format_result_table(&self, result: &ConsensusResult) -> String {
        let status = if result.requires_manual_review {
            self.colorize("MANUAL REVIEW", "yellow")
        } else {
            self.colorize("CONSENSUS", "green")
        };

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Status".to_string(), status]);
        builder.push_record(["Outcome".to_string(), result.outcome.to_string()]);
        builder.push_record(["Confidence".to_string(), percent(result.confidence)]);
        builder.push_record(["Agreement".to_string(), percent(result.simple_ratio)]);
        builder.push_record(["Weighted".to_string(), percent(result.weighted_ratio)]);
        builder.push_record(["Threshold".to_string(), percent(result.threshold)]);
        builder.push_record(["Rounds".to_string(), result.rounds.to_string()]);
        builder.push_record(["Evidence".to_string(), result.evidence_count().to_string()]);
        let mut sections = vec![styled(builder)];

        if !result.trail.is_empty() {
            let mut rounds = Builder::default();
            rounds.push_record([
                "Round",
                "Responded",
                "Failed",
                "Excluded",
                "Validated",
                "Agreement",
                "Decision",
            ]);
            for record in &result.trail {
                rounds.push_record([
                    record.round.to_string(),
                    record.responded.to_string(),
                    record.failures.len().to_string(),
                    record.exclusions.len().to_string(),
                    record.validated.len().to_string(),
                    percent(record.simple_ratio()),
                    record.decision.to_string(),
                ]);
            }
            sections.push(styled(rounds));
        }

        if !result.evidence.is_empty() {
            let mut evidence = Builder::default();
            evidence.push_record(["Score", "Category", "Cited by", "URL"]);
            for merged in result.evidence.iter().take(TOP_EVIDENCE) {
                evidence.push_record([
                    format!("{:.3}", merged.score()),
                    merged.evidence.category().to_string(),
                    merged.cited_by.len().to_string(),
                    merged.evidence.url().to_string(),
                ]);
            }
            sections.push(styled(evidence));
        }

        sections.join("\n")
    }

    /// Format the record handed to the settlement layer.
    pub fn format_submission(&self, submission: &SubmissionRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(submission)?),
            OutputFormat::Quiet => Ok(submission.content_hash.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Content ID".to_string(), submission.content_id.to_string()]);
                builder.push_record(["Content hash".to_string(), submission.content_hash.clone()]);
                builder.push_record(["Outcome".to_string(), submission.outcome.to_string()]);
                builder.push_record([
                    "Manual review".to_string(),
                    submission.requires_manual_review.to_string(),
                ]);
                Ok(styled(builder))
            }
        }
    }

    /// Whether only machine-readable output should be printed.
    pub fn is_structured(&self) -> bool {
        self.format != OutputFormat::Table
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_domain::Outcome;

    fn manual_review() -> ConsensusResult {
        ConsensusResult {
            outcome: Outcome::Undetermined,
            confidence: 0.0,
            simple_ratio: 0.5,
            weighted_ratio: 0.48,
            threshold: 0.67,
            evidence: Vec::new(),
            rounds: 3,
            requires_manual_review: true,
            trail: Vec::new(),
            overlap: None,
            disagreement: None,
        }
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_result(&manual_review()).unwrap();
        assert!(output.contains("MANUAL REVIEW"));
        assert!(output.contains("UNDETERMINED"));
        assert!(output.contains("50.0%"));
        assert!(!output.contains("Decision"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_result(&manual_review()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["outcome"], "UNDETERMINED");
        assert_eq!(value["requires_manual_review"], true);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_result(&manual_review()).unwrap();
        assert_eq!(output, "UNDETERMINED");
        assert!(formatter.is_structured());
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
