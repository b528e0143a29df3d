//! # File Protection
//!
//! Best-effort helpers that mark study files read-only so participants do
//! not edit example code by accident, plus a scoped guard for editing a
//! protected path.
//!
//! Every toggle reports success as a `bool` and logs failures instead of
//! propagating them. Only acquiring an [`UnprotectGuard`] is fallible,
//! because code inside the scope assumes it can write.
//!
//! Configuration lives under `security.file_protection`:
//!
//! ```yaml
//! security:
//!   file_protection:
//!     enabled: true
//!     protected_paths: ["02_your_task/examples"]
//!     exclude_from_protection: ["*.md", ".git"]
//! ```

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::config::ProbeConfig;
use crate::error::ProtectionError;

/// Remove write permission for user, group, and others.
pub fn make_readonly(path: &Path) -> bool {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot make read-only");
            return false;
        }
    };
    let mut perms = metadata.permissions();
    set_writable(&mut perms, false);
    match std::fs::set_permissions(path, perms) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "made read-only");
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to make read-only");
            false
        }
    }
}

/// Add write permission for the owning user.
pub fn make_writable(path: &Path) -> bool {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot make writable");
            return false;
        }
    };
    let mut perms = metadata.permissions();
    set_writable(&mut perms, true);
    match std::fs::set_permissions(path, perms) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "made writable");
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to make writable");
            false
        }
    }
}

#[cfg(unix)]
fn set_writable(perms: &mut std::fs::Permissions, writable: bool) {
    use std::os::unix::fs::PermissionsExt;
    let mode = perms.mode();
    let mode = if writable { mode | 0o200 } else { mode & !0o222 };
    perms.set_mode(mode);
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn set_writable(perms: &mut std::fs::Permissions, writable: bool) {
    perms.set_readonly(!writable);
}

/// Recursively make `directory` and everything below it read-only.
///
/// Entries whose name matches one of the `exclude` glob patterns are
/// skipped together with everything below them. The directory itself is
/// protected last so its children stay reachable while walking.
pub fn protect_directory(directory: &Path, exclude: &[String]) -> bool {
    if !directory.is_dir() {
        tracing::error!(path = %directory.display(), "not a directory");
        return false;
    }
    let patterns = compile_patterns(exclude);
    let mut items = Vec::new();
    walk(directory, &patterns, &mut items);

    let mut success = true;
    // Deepest entries first, so no directory loses write access before its
    // children have been handled.
    for item in items.iter().rev() {
        success &= make_readonly(item);
    }
    success &= make_readonly(directory);
    success
}

/// Recursively restore owner write access to `directory` and its contents.
pub fn unprotect_directory(directory: &Path) -> bool {
    if !directory.is_dir() {
        tracing::error!(path = %directory.display(), "not a directory");
        return false;
    }
    // The directory must become writable before its entries can change.
    let mut success = make_writable(directory);
    let mut items = Vec::new();
    walk(directory, &[], &mut items);
    for item in &items {
        success &= make_writable(item);
    }
    success
}

fn compile_patterns(exclude: &[String]) -> Vec<NameMatcher> {
    exclude
        .iter()
        .map(|p| match Pattern::new(p) {
            Ok(pattern) => NameMatcher::Glob(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "invalid exclusion pattern; matching literally");
                NameMatcher::Exact(p.clone())
            }
        })
        .collect()
}

enum NameMatcher {
    Glob(Pattern),
    Exact(String),
}

impl NameMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Glob(p) => p.matches(name),
            Self::Exact(s) => s == name,
        }
    }
}

fn is_excluded(path: &Path, patterns: &[NameMatcher]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    patterns.iter().any(|p| p.matches(name))
}

/// Pre-order walk collecting every entry below `dir`.
fn walk(dir: &Path, patterns: &[NameMatcher], acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory during protection walk");
            return;
        }
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();
    for path in paths {
        if is_excluded(&path, patterns) {
            tracing::info!(path = %path.display(), "skipping excluded item");
            continue;
        }
        let is_dir = path.is_dir();
        acc.push(path.clone());
        if is_dir {
            walk(&path, patterns, acc);
        }
    }
}

/// Applies the `security.file_protection` settings of a configuration.
#[derive(Debug, Clone)]
pub struct ProtectionManager {
    base_dir: PathBuf,
    enabled: bool,
    protected_paths: Vec<String>,
    exclude: Vec<String>,
}

impl ProtectionManager {
    pub fn from_config(config: &ProbeConfig) -> Self {
        let key = |leaf: &'static str| ["security", "file_protection", leaf];
        Self {
            base_dir: config.base_dir().to_path_buf(),
            enabled: config.get_setting(&key("enabled"), false),
            protected_paths: config.get_setting(&key("protected_paths"), Vec::new()),
            exclude: config.get_setting(&key("exclude_from_protection"), Vec::new()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether `path`'s file name matches an exclusion pattern.
    pub fn should_exclude(&self, path: &Path) -> bool {
        is_excluded(path, &compile_patterns(&self.exclude))
    }

    /// Protect every configured path. A disabled configuration is a no-op
    /// success; missing paths are logged and skipped.
    pub fn protect_configured_paths(&self) -> bool {
        if !self.enabled {
            tracing::info!("file protection is disabled in configuration");
            return true;
        }
        let mut success = true;
        for rel in &self.protected_paths {
            let full = self.base_dir.join(rel);
            if !full.exists() {
                tracing::warn!(path = %full.display(), "protected path does not exist");
                continue;
            }
            if !self.protect(&full) {
                tracing::error!(path = %full.display(), "failed to protect path");
                success = false;
            }
        }
        success
    }

    /// Protect one file or directory using the configured exclusions.
    pub fn protect(&self, path: &Path) -> bool {
        if path.is_dir() {
            protect_directory(path, &self.exclude)
        } else {
            make_readonly(path)
        }
    }

    /// Restore write access to one file or directory.
    pub fn unprotect_path(&self, path: &Path) -> bool {
        if !path.exists() {
            tracing::error!(path = %path.display(), "path does not exist");
            return false;
        }
        if path.is_dir() {
            unprotect_directory(path)
        } else {
            make_writable(path)
        }
    }

    /// Unprotect `path` for the lifetime of the returned guard.
    ///
    /// Protection is restored when the guard drops, including during
    /// unwinding and on early returns.
    pub fn temporarily_unprotect(&self, path: impl Into<PathBuf>) -> Result<UnprotectGuard<'_>, ProtectionError> {
        let path = path.into();
        if !path.exists() {
            return Err(ProtectionError::NotFound(path));
        }
        if !self.unprotect_path(&path) {
            return Err(ProtectionError::UnprotectFailed(path));
        }
        Ok(UnprotectGuard {
            manager: self,
            path,
        })
    }
}

/// Scoped write access to a protected path. Re-protects on drop.
#[derive(Debug)]
#[must_use = "protection is restored as soon as the guard is dropped"]
pub struct UnprotectGuard<'a> {
    manager: &'a ProtectionManager,
    path: PathBuf,
}

impl UnprotectGuard<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UnprotectGuard<'_> {
    fn drop(&mut self) {
        if !self.manager.protect(&self.path) {
            tracing::warn!(path = %self.path.display(), "failed to restore protection");
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &Path) -> u32 {
        std::fs::metadata(path).unwrap().permissions().mode()
    }

    fn is_readonly(path: &Path) -> bool {
        mode(path) & 0o222 == 0
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let examples = dir.path().join("examples");
        std::fs::create_dir_all(examples.join("beginner")).unwrap();
        std::fs::write(examples.join("beginner").join("todo_app.py"), "print()").unwrap();
        std::fs::write(examples.join("notes.md"), "# notes").unwrap();
        std::fs::create_dir_all(examples.join(".git")).unwrap();
        std::fs::write(examples.join(".git").join("HEAD"), "ref").unwrap();
        dir
    }

    #[test]
    fn readonly_and_writable_toggle_bits() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.py");
        std::fs::write(&file, "x").unwrap();

        assert!(make_readonly(&file));
        assert!(is_readonly(&file));
        assert!(make_writable(&file));
        assert_eq!(mode(&file) & 0o200, 0o200);
    }

    #[test]
    fn toggles_fail_on_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!make_readonly(&dir.path().join("gone")));
        assert!(!make_writable(&dir.path().join("gone")));
    }

    #[test]
    fn protect_directory_honours_exclusions() {
        let dir = fixture();
        let examples = dir.path().join("examples");

        assert!(protect_directory(&examples, &["*.md".into(), ".git".into()]));
        assert!(is_readonly(&examples));
        assert!(is_readonly(&examples.join("beginner").join("todo_app.py")));
        assert!(!is_readonly(&examples.join("notes.md")));
        assert!(!is_readonly(&examples.join(".git").join("HEAD")));

        assert!(unprotect_directory(&examples));
        assert!(!is_readonly(&examples.join("beginner").join("todo_app.py")));
        assert!(!is_readonly(&examples));
    }

    #[test]
    fn protect_directory_rejects_files() {
        let dir = fixture();
        let file = dir.path().join("examples").join("notes.md");
        assert!(!protect_directory(&file, &[]));
        assert!(!unprotect_directory(&file));
    }

    fn manager(dir: &Path, enabled: bool) -> ProtectionManager {
        let path = dir.join("probe_config.yaml");
        std::fs::write(
            &path,
            format!(
                "directories: {{}}\nsecurity:\n  file_protection:\n    enabled: {enabled}\n    protected_paths: [examples, missing]\n    exclude_from_protection: [\"*.md\"]\n"
            ),
        )
        .unwrap();
        ProtectionManager::from_config(&ProbeConfig::load(&path).unwrap())
    }

    #[test]
    fn manager_protects_configured_paths() {
        let dir = fixture();
        let mgr = manager(dir.path(), true);

        assert!(mgr.protect_configured_paths());
        let script = dir.path().join("examples").join("beginner").join("todo_app.py");
        assert!(is_readonly(&script));
        assert!(!is_readonly(&dir.path().join("examples").join("notes.md")));
        assert!(mgr.should_exclude(Path::new("answer.md")));

        assert!(mgr.unprotect_path(&dir.path().join("examples")));
    }

    #[test]
    fn disabled_manager_is_noop() {
        let dir = fixture();
        let mgr = manager(dir.path(), false);
        assert!(mgr.protect_configured_paths());
        assert!(!is_readonly(&dir.path().join("examples")));
    }

    #[test]
    fn guard_restores_protection_on_drop() {
        let dir = fixture();
        let mgr = manager(dir.path(), true);
        let script = dir.path().join("examples").join("beginner").join("todo_app.py");
        assert!(mgr.protect(&script));

        {
            let guard = mgr.temporarily_unprotect(&script).unwrap();
            assert!(!is_readonly(guard.path()));
        }
        assert!(is_readonly(&script));
    }

    #[test]
    fn guard_restores_protection_on_early_error() {
        let dir = fixture();
        let mgr = manager(dir.path(), true);
        let examples = dir.path().join("examples");
        assert!(mgr.protect(&examples));

        let edit = || -> Result<(), String> {
            let _guard = mgr.temporarily_unprotect(&examples).map_err(|e| e.to_string())?;
            Err("edit failed".into())
        };
        assert!(edit().is_err());
        assert!(is_readonly(&examples.join("beginner")));

        assert!(mgr.unprotect_path(&examples));
    }

    #[test]
    fn guard_acquire_fails_for_missing_path() {
        let dir = fixture();
        let mgr = manager(dir.path(), true);
        let err = mgr.temporarily_unprotect(dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, ProtectionError::NotFound(_)));
    }
}
