//! # Probe Configuration
//!
//! Loads the YAML configuration that describes the study's directory layout,
//! submission toggles, study metadata, and email template.
//!
//! ## Path Resolution
//!
//! Every entry under `directories` is resolved against the directory that
//! contains the configuration file. A config at `/a/b/probe_config.yaml`
//! with `responses: resp` always yields `/a/b/resp`, whatever the process
//! working directory happens to be. Each resolved directory is created if
//! it does not exist yet.
//!
//! Only the directories in [`WRITE_TARGETS`] must be writable. Any other
//! directory may have been made read-only by file protection; that is
//! logged and accepted so `cprobe unprotect` can still undo it.
//!
//! ## Caching
//!
//! The parsed configuration is owned by whoever loaded it. Callers that
//! keep a `ProbeConfig` around for a long time can ask whether it is older
//! than a time window ([`ProbeConfig::is_stale`]) and refresh it
//! explicitly. [`ProbeConfig::reload`] always goes back to disk and
//! re-validates.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ConfigError;
use crate::settings::SubmissionSettings;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "probe_config.yaml";

/// Window after which a loaded configuration is considered stale.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Top-level sections that must be present in every configuration.
pub const REQUIRED_SECTIONS: &[&str] = &["directories"];

/// Configured directories the toolkit writes into without lifting file
/// protection first. Loading fails if one of them is read-only.
pub const WRITE_TARGETS: &[&str] = &["submissions"];

/// Email body used when the configuration does not provide `email_template`.
pub const DEFAULT_EMAIL_TEMPLATE: &str = "Subject: Cultural Probe Submission {submission_id}

Dear research team,

please find attached my probe responses.

Submission ID: {submission_id}
Submitted: {timestamp}
Number of responses: {num_responses}
Archive checksum (SHA-256): {checksum}

Best regards,
{participant_name}
";

/// A loaded, validated probe configuration with resolved directories.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    path: PathBuf,
    base_dir: PathBuf,
    raw: Value,
    directories: BTreeMap<String, PathBuf>,
    loaded_at: Instant,
}

impl ProbeConfig {
    /// Load and validate the configuration at `path`, creating every
    /// configured directory that does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = absolutize(path.as_ref());
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let raw = read_and_validate(&path)?;
        let directories = resolve_directories(&raw, &base_dir)?;
        ensure_directories(&directories)?;

        tracing::debug!(
            config = %path.display(),
            directories = directories.len(),
            "loaded probe configuration"
        );

        Ok(Self {
            path,
            base_dir,
            raw,
            directories,
            loaded_at: Instant::now(),
        })
    }

    /// Re-read the configuration from disk, re-validate it, and re-resolve
    /// its directories. On error the previous state is kept.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let raw = read_and_validate(&self.path)?;
        let directories = resolve_directories(&raw, &self.base_dir)?;
        ensure_directories(&directories)?;

        self.raw = raw;
        self.directories = directories;
        self.loaded_at = Instant::now();
        tracing::info!(config = %self.path.display(), "reloaded probe configuration");
        Ok(())
    }

    /// Whether this configuration was read from disk more than `ttl` ago.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() > ttl
    }

    /// Reload only if the configuration is older than `ttl`.
    ///
    /// Returns `true` when a reload happened.
    pub fn refresh_if_stale(&mut self, ttl: Duration) -> Result<bool, ConfigError> {
        if !self.is_stale(ttl) {
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }

    /// Absolute path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the configuration file. All relative paths in
    /// the configuration are interpreted against it.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The full parsed configuration.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Every resolved directory, keyed by logical name.
    pub fn directories(&self) -> &BTreeMap<String, PathBuf> {
        &self.directories
    }

    /// Resolved path of a configured directory.
    pub fn dir(&self, name: &str) -> Option<&Path> {
        self.directories.get(name).map(PathBuf::as_path)
    }

    /// Directory holding participants' markdown response documents.
    ///
    /// Falls back to `<base>/.probe_responses` when not configured.
    pub fn responses_dir(&self) -> PathBuf {
        self.dir_or("responses", ".probe_responses")
    }

    /// Directory receiving archives and reports.
    pub fn submissions_dir(&self) -> PathBuf {
        self.dir_or("submissions", "submissions")
    }

    /// Directory holding probe prompt templates and example material.
    pub fn templates_dir(&self) -> PathBuf {
        self.dir_or("templates", "templates")
    }

    fn dir_or(&self, name: &str, fallback: &str) -> PathBuf {
        self.dir(name)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.join(fallback))
    }

    /// The raw node at `keys`, if every key along the path exists.
    pub fn setting(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().try_fold(&self.raw, |node, key| node.get(*key))
    }

    /// Typed lookup of a nested setting.
    ///
    /// Returns `default` when any key along the path is missing or the
    /// value does not have the requested type. Never fails.
    pub fn get_setting<T: DeserializeOwned>(&self, keys: &[&str], default: T) -> T {
        match self.setting(keys) {
            Some(node) => serde_json::from_value(node.clone()).unwrap_or(default),
            None => default,
        }
    }

    /// Typed view of `submission_settings`.
    ///
    /// Each value is read on its own: a missing or mistyped entry takes its
    /// default and leaves its siblings untouched.
    pub fn submission_settings(&self) -> SubmissionSettings {
        self.setting(&["submission_settings"])
            .map(SubmissionSettings::from_value)
            .unwrap_or_default()
    }

    /// The configured email template, or [`DEFAULT_EMAIL_TEMPLATE`].
    pub fn email_template(&self) -> String {
        self.get_setting(&["email_template"], DEFAULT_EMAIL_TEMPLATE.to_string())
    }
}

fn read_and_validate(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(map) = raw.as_object() else {
        return Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        });
    };

    let missing: Vec<String> = REQUIRED_SECTIONS
        .iter()
        .filter(|section| !map.contains_key(**section))
        .map(|section| section.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingSections(missing));
    }

    Ok(raw)
}

fn resolve_directories(
    raw: &Value,
    base_dir: &Path,
) -> Result<BTreeMap<String, PathBuf>, ConfigError> {
    let mut resolved = BTreeMap::new();
    let Some(entries) = raw.get("directories").and_then(Value::as_object) else {
        // `directories: ~` or a scalar: present, but nothing to resolve.
        return Ok(resolved);
    };

    for (name, value) in entries {
        let rel = value
            .as_str()
            .ok_or_else(|| ConfigError::InvalidDirectory { name: name.clone() })?;
        resolved.insert(name.clone(), normalize(&base_dir.join(rel)));
    }
    Ok(resolved)
}

fn ensure_directories(directories: &BTreeMap<String, PathBuf>) -> Result<(), ConfigError> {
    for (name, dir) in directories {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Directory {
            path: dir.clone(),
            source,
        })?;
        let writable = std::fs::metadata(dir)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false);
        if !writable {
            if WRITE_TARGETS.contains(&name.as_str()) {
                return Err(ConfigError::NotWritable(dir.clone()));
            }
            tracing::warn!(name = %name, dir = %dir.display(), "directory is read-only");
        }
        tracing::trace!(name = %name, dir = %dir.display(), "directory ready");
    }
    Ok(())
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => path.to_path_buf(),
    }
}

/// Lexically remove `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
