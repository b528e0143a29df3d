//! # Protect and Unprotect Subcommands
//!
//! Applies the `security.file_protection` settings: `protect` makes the
//! configured paths (or one given path) read-only, honouring the
//! exclusion patterns; `unprotect` restores owner write access.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;

use cprobe_core::ProtectionManager;

/// Arguments for the `cprobe protect` subcommand.
#[derive(Args, Debug)]
pub struct ProtectArgs {
    /// Protect this path instead of the configured ones.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Arguments for the `cprobe unprotect` subcommand.
#[derive(Args, Debug)]
pub struct UnprotectArgs {
    /// File or directory to make writable again.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Execute the protect subcommand.
///
/// Returns exit code 1 if any path could not be protected.
pub fn run_protect(args: &ProtectArgs, config_path: &Path) -> Result<u8> {
    let config = crate::load_config(config_path)?;
    let manager = ProtectionManager::from_config(&config);

    let ok = match &args.path {
        Some(path) => {
            if !path.exists() {
                bail!("path not found: {}", path.display());
            }
            manager.protect(path)
        }
        None => {
            if !manager.enabled() {
                println!("OK: file protection is disabled in configuration");
                return Ok(0);
            }
            manager.protect_configured_paths()
        }
    };

    if ok {
        println!("OK: protection applied");
        Ok(0)
    } else {
        println!("FAIL: some paths could not be protected");
        Ok(1)
    }
}

/// Execute the unprotect subcommand.
pub fn run_unprotect(args: &UnprotectArgs, config_path: &Path) -> Result<u8> {
    let config = crate::load_config(config_path)?;
    let manager = ProtectionManager::from_config(&config);
    if !args.path.exists() {
        bail!("path not found: {}", args.path.display());
    }
    if manager.unprotect_path(&args.path) {
        println!("OK: write access restored: {}", args.path.display());
        Ok(0)
    } else {
        println!("FAIL: could not restore write access: {}", args.path.display());
        Ok(1)
    }
}
