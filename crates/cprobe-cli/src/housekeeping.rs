//! # Clean Subcommand
//!
//! Deletes archives and reports older than a cutoff from the submissions
//! directory.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use cprobe_core::clean_old_submissions;
use cprobe_core::housekeeping::DEFAULT_MAX_AGE_DAYS;

/// Arguments for the `cprobe clean` subcommand.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Remove files last modified more than this many days ago.
    #[arg(long, default_value_t = DEFAULT_MAX_AGE_DAYS)]
    pub max_age_days: u64,
}

/// Execute the clean subcommand.
pub fn run_clean(args: &CleanArgs, config_path: &Path) -> Result<u8> {
    let config = crate::load_config(config_path)?;
    let dir = config.submissions_dir();
    let removed = clean_old_submissions(&dir, args.max_age_days)
        .with_context(|| format!("failed to clean {}", dir.display()))?;
    for path in &removed {
        println!("  - {}", path.display());
    }
    println!(
        "OK: removed {} file(s) older than {} days from {}",
        removed.len(),
        args.max_age_days,
        dir.display()
    );
    Ok(0)
}
