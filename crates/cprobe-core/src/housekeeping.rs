//! # Housekeeping
//!
//! Filename sanitising for participant-supplied names, and pruning of old
//! submission files by age.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Characters replaced by `_` in sanitised filenames.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum filename length in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

/// Default retention for `clean_old_submissions`.
pub const DEFAULT_MAX_AGE_DAYS: u64 = 30;

/// Replace filesystem-hostile characters and cap the length at
/// [`MAX_FILENAME_LEN`] bytes, keeping the extension intact.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect();

    if cleaned.len() <= MAX_FILENAME_LEN {
        return cleaned;
    }

    let (stem, ext) = match cleaned.rfind('.') {
        Some(dot) if dot > 0 && cleaned.len() - dot < MAX_FILENAME_LEN => {
            cleaned.split_at(dot)
        }
        _ => (cleaned.as_str(), ""),
    };
    let budget = MAX_FILENAME_LEN - ext.len();
    let mut cut = budget.min(stem.len());
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &stem[..cut], ext)
}

/// Delete regular files directly inside `directory` whose modification time
/// is older than `max_age_days`.
///
/// Returns the removed paths. Files that cannot be inspected or removed are
/// logged and skipped.
pub fn clean_old_submissions(directory: &Path, max_age_days: u64) -> std::io::Result<Vec<PathBuf>> {
    let max_age = Duration::from_secs(max_age_days * 24 * 60 * 60);
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    clean_older_than(directory, cutoff)
}

pub(crate) fn clean_older_than(directory: &Path, cutoff: SystemTime) -> std::io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %directory.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        let modified = match entry.metadata().and_then(|m| {
            if m.is_file() {
                m.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(t)) => t,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read modification time");
                continue;
            }
        };

        if modified < cutoff {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "removed old submission file");
                    removed.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove old submission file");
                }
            }
        }
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j.md"), "a_b_c_d_e_f_g_h_i_j.md");
        assert_eq!(sanitize_filename("workflow_2026-01-15.md"), "workflow_2026-01-15.md");
    }

    #[test]
    fn truncates_long_names_keeping_extension() {
        let long = format!("{}.md", "x".repeat(400));
        let out = sanitize_filename(&long);
        assert_eq!(out.len(), MAX_FILENAME_LEN);
        assert!(out.ends_with(".md"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = format!("{}.md", "é".repeat(200));
        let out = sanitize_filename(&long);
        assert!(out.len() <= MAX_FILENAME_LEN);
        assert!(out.ends_with(".md"));
    }

    #[test]
    fn clean_removes_only_files_older_than_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("probe_submission_20200101_000000.zip");
        std::fs::write(&old, b"old").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        // Every existing file is older than a cutoff in the future.
        let future = SystemTime::now() + Duration::from_secs(60);
        let removed = clean_older_than(dir.path(), future).unwrap();
        assert_eq!(removed, vec![old.clone()]);
        assert!(!old.exists());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn clean_keeps_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("probe_submission_20260115_093000.pdf");
        std::fs::write(&fresh, b"fresh").unwrap();

        let removed = clean_old_submissions(dir.path(), DEFAULT_MAX_AGE_DAYS).unwrap();
        assert!(removed.is_empty());
        assert!(fresh.exists());
    }

    #[test]
    fn clean_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(clean_old_submissions(&dir.path().join("gone"), 1).is_err());
    }

    proptest! {
        #[test]
        fn sanitized_names_are_safe(name in "\\PC{0,400}") {
            let out = sanitize_filename(&name);
            prop_assert!(out.len() <= MAX_FILENAME_LEN);
            prop_assert!(!out.chars().any(|c| UNSAFE_CHARS.contains(&c)));
        }
    }
}
