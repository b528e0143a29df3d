//! # CLI Workflow Tests
//!
//! Drives a whole study round trip through the subcommand handlers:
//! record responses, submit, then verify the archive against its checksum.
//! One test runs the built binary to check exit codes at the process
//! boundary.

use std::path::{Path, PathBuf};
use std::process::Command;

use cprobe_cli::respond::{run_respond, RespondArgs};
use cprobe_cli::submit::{run_submit, SubmitArgs};
use cprobe_cli::verify::{run_verify, VerifyArgs};
use cprobe_core::sha256_file;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn study() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("probe_config.yaml");
    std::fs::write(
        &config,
        "directories:\n  responses: responses\n  submissions: submissions\nsubmission_settings:\n  metadata:\n    research_project: Developer Workflows\n",
    )
    .unwrap();
    (dir, config)
}

fn submissions(dir: &Path, extension: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir.join("submissions"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == extension))
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Respond, submit, verify
// ---------------------------------------------------------------------------

#[test]
fn respond_submit_verify_round_trip() {
    let (dir, config) = study();

    for (probe_type, response) in [("daily", "Shipped the parser."), ("environment", "Loud office.")] {
        let args = RespondArgs {
            probe_type: probe_type.into(),
            prompt: "Tell us about it".into(),
            response: response.into(),
        };
        assert_eq!(run_respond(&args, &config).unwrap(), 0);
    }

    assert_eq!(run_submit(&SubmitArgs {}, &config).unwrap(), 0);

    let archives = submissions(dir.path(), "zip");
    assert_eq!(archives.len(), 1);
    assert_eq!(submissions(dir.path(), "pdf").len(), 1);

    let meta = cprobe_submit::read_metadata(&archives[0]).unwrap();
    assert_eq!(meta.num_responses, 2);

    let checksum = sha256_file(&archives[0]).unwrap().to_hex();
    let args = VerifyArgs {
        archive: archives[0].clone(),
        checksum: Some(checksum),
    };
    assert_eq!(run_verify(&args).unwrap(), 0);
}

// ---------------------------------------------------------------------------
// 2. Process exit codes
// ---------------------------------------------------------------------------

#[test]
fn binary_exit_codes() {
    let (dir, config) = study();
    let bin = env!("CARGO_BIN_EXE_cprobe");

    // No responses yet: submit reports failure.
    let status = Command::new(bin)
        .args(["--config"])
        .arg(&config)
        .arg("submit")
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    // Unloadable configuration is an operational error.
    let status = Command::new(bin)
        .args(["--config"])
        .arg(dir.path().join("missing.yaml"))
        .arg("config")
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let output = Command::new(bin)
        .args(["--config"])
        .arg(&config)
        .arg("config")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("responses:"));
}
