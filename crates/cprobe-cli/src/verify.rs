//! # Verify Subcommand
//!
//! Recomputes a submission archive's SHA-256 and, given the checksum from
//! the report, checks that the archive is unchanged.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use cprobe_core::{sha256_file, FileDigest};
use cprobe_submit::{read_metadata, verify_archive};

/// Arguments for the `cprobe verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the submission archive.
    #[arg(value_name = "ZIP")]
    pub archive: PathBuf,

    /// Expected SHA-256 hex digest.
    #[arg(long)]
    pub checksum: Option<String>,
}

/// Execute the verify subcommand.
///
/// Returns exit code: 0 when no checksum was given or it matches, 1 on
/// mismatch.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    if !args.archive.is_file() {
        bail!("archive not found: {}", args.archive.display());
    }

    match read_metadata(&args.archive) {
        Ok(meta) => {
            println!("Submission ID: {}", meta.submission_id);
            println!("Responses: {}", meta.num_responses);
        }
        Err(e) => tracing::warn!(error = %e, "archive has no readable metadata"),
    }

    let Some(expected) = args.checksum.as_deref() else {
        let digest = sha256_file(&args.archive)
            .with_context(|| format!("failed to read archive: {}", args.archive.display()))?;
        println!("SHA-256: {digest}");
        return Ok(0);
    };

    let Some(expected) = FileDigest::from_hex(expected.trim()) else {
        bail!("invalid checksum: expected 64 hex characters, got {expected:?}");
    };

    if verify_archive(&args.archive, &expected)? {
        println!("OK: checksum matches");
        Ok(0)
    } else {
        let actual = sha256_file(&args.archive)
            .with_context(|| format!("failed to read archive: {}", args.archive.display()))?;
        println!("FAIL: checksum mismatch");
        println!("  Expected: {expected}");
        println!("  Actual:   {actual}");
        Ok(1)
    }
}
