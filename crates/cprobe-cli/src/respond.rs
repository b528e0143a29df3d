//! # Respond Subcommand
//!
//! Stores a participant's answer as a markdown response document in the
//! configured responses directory. When file protection has made that
//! directory read-only, write access is restored only while the file is
//! written.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use cprobe_core::{store_response, ProtectionManager};

/// Arguments for the `cprobe respond` subcommand.
#[derive(Args, Debug)]
pub struct RespondArgs {
    /// Probe type, e.g. "daily" or "environment".
    #[arg(long = "type", value_name = "TYPE")]
    pub probe_type: String,

    /// The prompt being answered.
    #[arg(long)]
    pub prompt: String,

    /// The response text (markdown).
    #[arg(long)]
    pub response: String,
}

/// Execute the respond subcommand.
pub fn run_respond(args: &RespondArgs, config_path: &Path) -> Result<u8> {
    let config = crate::load_config(config_path)?;
    let dir = config.responses_dir();
    let manager = ProtectionManager::from_config(&config);

    let read_only = std::fs::metadata(&dir)
        .map(|m| m.permissions().readonly())
        .unwrap_or(false);
    let _guard = if manager.enabled() && read_only {
        Some(manager.temporarily_unprotect(&dir)?)
    } else {
        None
    };

    let path = store_response(&dir, &args.probe_type, &args.prompt, &args.response, &Local::now())
        .with_context(|| format!("failed to store response in {}", dir.display()))?;
    println!("OK: stored response: {}", path.display());
    Ok(0)
}
