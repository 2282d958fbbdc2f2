//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use concord_archive::verify_bundle;
use std::fs;

/// Execute the verify command.
pub async fn execute_verify(args: VerifyArgs, formatter: &Formatter) -> Result<()> {
    let bytes = fs::read(&args.bundle)?;
    if !verify_bundle(&bytes, args.hash.trim())? {
        return Err(CliError::VerificationFailed);
    }

    if formatter.is_structured() {
        println!("{}", args.hash.trim());
    } else {
        let message = format!("{} matches its content hash", args.bundle.display());
        println!("{}", formatter.success(&message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use concord_archive::canonical_hash;

    #[tokio::test]
    async fn test_verify_match_and_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let value = serde_json::json!({"question": "q", "outcome": "YES"});
        let (bytes, hash) = canonical_hash(&value).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let ok = VerifyArgs {
            bundle: path.clone(),
            hash,
        };
        execute_verify(ok, &formatter).await.unwrap();

        let bad = VerifyArgs {
            bundle: path,
            hash: "0".repeat(64),
        };
        let result = execute_verify(bad, &formatter).await;
        assert!(matches!(result, Err(CliError::VerificationFailed)));
    }
}
