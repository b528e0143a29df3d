//! # Probe Catalog
//!
//! Prompt templates grouped by probe type, read from the `probe_types`
//! section of the configuration:
//!
//! ```yaml
//! probe_types:
//!   environment:
//!     templates:
//!       - "How does your current development environment affect your productivity?"
//!   workflow:
//!     templates:
//!       - "What made you structure this commit the way you did?"
//! ```

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ProbeConfig;

/// Probe type whose prompts are offered when writing commit messages.
pub const COMMIT_PROBE_TYPE: &str = "workflow";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeType {
    #[serde(default)]
    pub templates: Vec<String>,
}

/// All configured probe types and their prompt templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeCatalog {
    types: BTreeMap<String, ProbeType>,
}

impl ProbeCatalog {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            types: config.get_setting(&["probe_types"], BTreeMap::new()),
        }
    }

    pub fn new(types: BTreeMap<String, ProbeType>) -> Self {
        Self { types }
    }

    /// Configured probe type names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn templates(&self, probe_type: &str) -> &[String] {
        self.types
            .get(probe_type)
            .map(|t| t.templates.as_slice())
            .unwrap_or(&[])
    }

    /// A random prompt of the given type, or `None` for an unknown type or
    /// a type without templates.
    pub fn random_probe<R: Rng + ?Sized>(&self, probe_type: &str, rng: &mut R) -> Option<&str> {
        self.templates(probe_type).choose(rng).map(String::as_str)
    }

    /// A random prompt formatted as a code comment: `# @probe:<type> <prompt>`.
    pub fn probe_comment<R: Rng + ?Sized>(&self, probe_type: &str, rng: &mut R) -> Option<String> {
        self.random_probe(probe_type, rng)
            .map(|prompt| format!("# @probe:{probe_type} {prompt}"))
    }

    /// A random prompt for commit messages.
    pub fn commit_probe<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.random_probe(COMMIT_PROBE_TYPE, rng)
    }
}
