//! # Probe Subcommand
//!
//! Prints a random prompt from the configured `probe_types`, either as
//! plain text or in the `# @probe:<type> <prompt>` comment form used to
//! embed probes in source files.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use cprobe_core::catalog::COMMIT_PROBE_TYPE;
use cprobe_core::ProbeCatalog;

/// Arguments for the `cprobe probe` subcommand.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Probe type to draw from. Lists the configured types when omitted.
    #[arg(value_name = "TYPE")]
    pub probe_type: Option<String>,

    /// Print the prompt as a probe comment.
    #[arg(long, conflicts_with = "commit")]
    pub comment: bool,

    /// Draw a prompt suited to a commit message.
    #[arg(long)]
    pub commit: bool,
}

/// Execute the probe subcommand.
///
/// Returns exit code 1 when the requested type has no prompts.
pub fn run_probe(args: &ProbeArgs, config_path: &Path) -> Result<u8> {
    let config = crate::load_config(config_path)?;
    let catalog = ProbeCatalog::from_config(&config);
    let mut rng = rand::thread_rng();
    Ok(print_probe(&catalog, args, &mut rng))
}

fn print_probe<R: rand::Rng + ?Sized>(catalog: &ProbeCatalog, args: &ProbeArgs, rng: &mut R) -> u8 {
    if args.commit {
        return match catalog.commit_probe(rng) {
            Some(prompt) => {
                println!("{prompt}");
                0
            }
            None => {
                println!("FAIL: no prompts configured for probe type '{COMMIT_PROBE_TYPE}'");
                1
            }
        };
    }

    let Some(probe_type) = args.probe_type.as_deref() else {
        for name in catalog.type_names() {
            println!("{name} ({} prompts)", catalog.templates(name).len());
        }
        return 0;
    };

    let line = if args.comment {
        catalog.probe_comment(probe_type, rng)
    } else {
        catalog.random_probe(probe_type, rng).map(str::to_string)
    };
    match line {
        Some(line) => {
            println!("{line}");
            0
        }
        None => {
            println!("FAIL: no prompts configured for probe type '{probe_type}'");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("probe_config.yaml");
        std::fs::write(
            &path,
            "directories:\n  responses: responses\nprobe_types:\n  daily:\n    templates:\n      - How did today go?\n  workflow:\n    templates:\n      - What slowed you down?\n",
        )
        .unwrap();
        path
    }

    fn args(probe_type: Option<&str>, comment: bool, commit: bool) -> ProbeArgs {
        ProbeArgs {
            probe_type: probe_type.map(str::to_string),
            comment,
            commit,
        }
    }

    #[test]
    fn known_and_unknown_types() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = crate::load_config(&config(&dir)).unwrap();
        let catalog = ProbeCatalog::from_config(&cfg);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(print_probe(&catalog, &args(Some("daily"), false, false), &mut rng), 0);
        assert_eq!(print_probe(&catalog, &args(Some("daily"), true, false), &mut rng), 0);
        assert_eq!(print_probe(&catalog, &args(Some("missing"), false, false), &mut rng), 1);
        assert_eq!(print_probe(&catalog, &args(None, false, true), &mut rng), 0);
        assert_eq!(print_probe(&catalog, &args(None, false, false), &mut rng), 0);
    }

    #[test]
    fn run_probe_loads_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run_probe(&args(Some("daily"), false, false), &config(&dir)).unwrap(), 0);
    }
}
