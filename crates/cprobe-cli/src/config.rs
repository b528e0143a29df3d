//! # Config Subcommand
//!
//! Shows where the configuration was loaded from and the absolute
//! directories it resolves to, or dumps the whole document as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the `cprobe config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the full configuration as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs, config_path: &Path) -> Result<u8> {
    let config = crate::load_config(config_path)?;

    if args.json {
        let json = serde_json::to_string_pretty(config.raw()).context("failed to serialize configuration")?;
        println!("{json}");
        return Ok(0);
    }

    println!("Config: {}", config.path().display());
    println!("Directories:");
    for (name, dir) in config.directories() {
        println!("  {name}: {}", dir.display());
    }

    let settings = config.submission_settings();
    println!("Submission:");
    println!("  checksum: {}", settings.security.generate_checksum);
    println!("  qr code: {}", settings.submission_format.generate_qr);
    println!("  system info: {}", settings.submission_format.include_system_info);
    println!("  cover page: {}", settings.pdf_settings.include_cover_page);
    println!(
        "  watermark: {}",
        settings.pdf_settings.watermark_text().unwrap_or("none")
    );
    if let Some(email) = &settings.receiver_email {
        println!("  receiver: {email}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_config_in_both_forms() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("probe_config.yaml");
        std::fs::write(&config, "directories:\n  responses: responses\n").unwrap();

        assert_eq!(run_config(&ConfigArgs { json: false }, &config).unwrap(), 0);
        assert_eq!(run_config(&ConfigArgs { json: true }, &config).unwrap(), 0);
    }

    #[test]
    fn missing_directories_section_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("probe_config.yaml");
        std::fs::write(&config, "submission_settings: {}\n").unwrap();
        let err = run_config(&ConfigArgs { json: false }, &config).unwrap_err();
        assert!(format!("{err:#}").contains("directories"));
    }
}
