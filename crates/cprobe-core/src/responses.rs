//! # Response Documents
//!
//! A response document is a markdown file holding a participant's answer
//! to one probe. The packager treats them as opaque text; the only
//! structural assumption is the `.md` extension.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::housekeeping::sanitize_filename;
use crate::identity::iso8601;

/// Extension identifying response documents.
pub const RESPONSE_EXTENSION: &str = "md";

/// A markdown response file found in the responses directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResponseDocument {
    /// Bare filename, used as the archive entry name and report heading.
    pub name: String,
    /// Absolute path on disk.
    pub path: PathBuf,
}

impl ResponseDocument {
    pub fn read_to_string(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

/// List the `.md` regular files directly inside `dir`, sorted by name.
///
/// Subdirectories are not searched and hidden dot-files are skipped. An
/// empty result is not an error here; callers decide whether it is fatal.
pub fn collect_responses(dir: &Path) -> std::io::Result<Vec<ResponseDocument>> {
    let mut docs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping response with non UTF-8 name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let is_markdown = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == RESPONSE_EXTENSION);
        if !is_markdown || !entry.file_type()?.is_file() {
            continue;
        }
        docs.push(ResponseDocument {
            name: name.to_string(),
            path: path.clone(),
        });
    }
    docs.sort();
    Ok(docs)
}

/// Render a response document body.
pub fn render_response(probe_type: &str, prompt: &str, response: &str, at: &DateTime<Local>) -> String {
    let timestamp = iso8601(at);
    format!(
        "# Probe Response\n\n## Type\n{probe_type}\n\n## Prompt\n{prompt}\n\n## Response\n{response}\n\n## Timestamp\n{timestamp}\n"
    )
}

/// Write a new response document into `dir` and return its path.
///
/// The file is named `<type>_<timestamp>.md`, sanitised for the filesystem.
pub fn store_response(
    dir: &Path,
    probe_type: &str,
    prompt: &str,
    response: &str,
    at: &DateTime<Local>,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let file_name = sanitize_filename(&format!(
        "{probe_type}_{}.{RESPONSE_EXTENSION}",
        iso8601(at)
    ));
    let path = dir.join(file_name);
    std::fs::write(&path, render_response(probe_type, prompt, response, at))?;
    tracing::info!(path = %path.display(), probe_type, "stored probe response");
    Ok(path)
}
