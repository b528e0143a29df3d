//! # cprobe CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cprobe_cli::config::{run_config, ConfigArgs};
use cprobe_cli::housekeeping::{run_clean, CleanArgs};
use cprobe_cli::probe::{run_probe, ProbeArgs};
use cprobe_cli::protect::{run_protect, run_unprotect, ProtectArgs, UnprotectArgs};
use cprobe_cli::respond::{run_respond, RespondArgs};
use cprobe_cli::submit::{run_submit, SubmitArgs};
use cprobe_cli::verify::{run_verify, VerifyArgs};

/// Cultural probe toolkit.
///
/// Records probe responses, packages them into a checksummed archive and a
/// PDF report for the research team, and verifies submitted archives.
#[derive(Parser, Debug)]
#[command(name = "cprobe", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the probe configuration file.
    #[arg(long, global = true, default_value = cprobe_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Package all responses into an archive and a PDF report.
    Submit(SubmitArgs),

    /// Print or check the SHA-256 checksum of a submission archive.
    Verify(VerifyArgs),

    /// Record a response to a probe.
    Respond(RespondArgs),

    /// Print a random probe prompt.
    Probe(ProbeArgs),

    /// Remove old files from the submissions directory.
    Clean(CleanArgs),

    /// Make configured paths (or one path) read-only.
    Protect(ProtectArgs),

    /// Restore write access to a path.
    Unprotect(UnprotectArgs),

    /// Show the resolved configuration.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(config = %cli.config.display(), "cprobe starting");

    let result = match cli.command {
        Commands::Submit(args) => run_submit(&args, &cli.config),
        Commands::Verify(args) => run_verify(&args),
        Commands::Respond(args) => run_respond(&args, &cli.config),
        Commands::Probe(args) => run_probe(&args, &cli.config),
        Commands::Clean(args) => run_clean(&args, &cli.config),
        Commands::Protect(args) => run_protect(&args, &cli.config),
        Commands::Unprotect(args) => run_unprotect(&args, &cli.config),
        Commands::Config(args) => run_config(&args, &cli.config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
