//! # cprobe-cli: Command-Line Interface for the Cultural Probe Toolkit
//!
//! ## Subcommands
//!
//! - `cprobe submit`: Package responses into an archive and PDF report.
//! - `cprobe verify`: Print or check a submission archive's checksum.
//! - `cprobe respond`: Record a response document.
//! - `cprobe probe`: Print a random probe prompt.
//! - `cprobe clean`: Prune old submissions.
//! - `cprobe protect` / `cprobe unprotect`: File protection.
//! - `cprobe config`: Show the resolved configuration.
//!
//! ```bash
//! cprobe --config study/probe_config.yaml submit
//! cprobe verify submissions/probe_submission_20260115_093000.zip --checksum 3f2a...
//! ```
//!
//! ## Crate Policy
//!
//! - Handlers return an exit code; operational errors propagate as
//!   `anyhow::Error` and are logged once by `main`.
//! - Domain logic lives in `cprobe-core` and `cprobe-submit`.

pub mod config;
pub mod housekeeping;
pub mod probe;
pub mod protect;
pub mod respond;
pub mod submit;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use cprobe_core::ProbeConfig;

/// Load the probe configuration, attaching the path to any error.
pub fn load_config(path: &Path) -> Result<ProbeConfig> {
    ProbeConfig::load(path).with_context(|| format!("failed to load configuration: {}", path.display()))
}
