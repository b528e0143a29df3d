//! # Submit Subcommand
//!
//! Runs the submission packager against the configured responses directory.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use cprobe_submit::ProbeSubmission;

/// Arguments for the `cprobe submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {}

/// Execute the submit subcommand.
///
/// Returns exit code: 0 when archive and report were written, 1 otherwise.
pub fn run_submit(_args: &SubmitArgs, config_path: &Path) -> Result<u8> {
    let config = crate::load_config(config_path)?;
    let mut submission = ProbeSubmission::new(&config);
    Ok(if submission.submit() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn study() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("probe_config.yaml"),
            "directories:\n  responses: responses\n  submissions: submissions\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn submit_succeeds_with_responses() {
        let dir = study();
        let config = dir.path().join("probe_config.yaml");
        std::fs::create_dir_all(dir.path().join("responses")).unwrap();
        std::fs::write(dir.path().join("responses/a.md"), "# A").unwrap();

        assert_eq!(run_submit(&SubmitArgs {}, &config).unwrap(), 0);
        let written: Vec<_> = std::fs::read_dir(dir.path().join("submissions"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(written.len(), 2);
        assert!(written.iter().any(|n| n.ends_with(".zip")));
        assert!(written.iter().any(|n| n.ends_with(".pdf")));
    }

    #[test]
    fn submit_without_responses_exits_one() {
        let dir = study();
        let config = dir.path().join("probe_config.yaml");
        assert_eq!(run_submit(&SubmitArgs {}, &config).unwrap(), 1);
    }

    #[test]
    fn missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_submit(&SubmitArgs {}, &dir.path().join("nope.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load configuration"));
    }
}
