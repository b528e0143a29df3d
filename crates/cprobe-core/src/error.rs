//! # Error Types
//!
//! Configuration loading is the only place the toolkit treats failure as a
//! structured, typed condition. Everything else either propagates an I/O
//! error or is best effort and logs.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while loading or validating a probe configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Absolute path of the configuration file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Absolute path of the configuration file.
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed, but its top level is not a mapping.
    #[error("config {path} must be a mapping at the top level")]
    NotAMapping {
        /// Absolute path of the configuration file.
        path: PathBuf,
    },

    /// One or more required top-level sections are absent.
    #[error("missing required sections: {}", .0.join(", "))]
    MissingSections(Vec<String>),

    /// A `directories` entry is not a string path.
    #[error("directories.{name} must be a path string")]
    InvalidDirectory {
        /// Logical directory name.
        name: String,
    },

    /// A configured directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    Directory {
        /// Resolved directory path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured directory exists but is read-only.
    #[error("directory {0} is not writable")]
    NotWritable(PathBuf),
}

/// Error raised when a scoped unprotect cannot acquire write access.
#[derive(Error, Debug)]
pub enum ProtectionError {
    /// The target does not exist.
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    /// Write permissions could not be restored on the target.
    #[error("failed to unprotect path: {0}")]
    UnprotectFailed(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_lists_every_name() {
        let err = ConfigError::MissingSections(vec!["directories".into(), "security".into()]);
        assert_eq!(
            err.to_string(),
            "missing required sections: directories, security"
        );
    }

    #[test]
    fn not_writable_names_the_directory() {
        let err = ConfigError::NotWritable(PathBuf::from("/srv/probes/out"));
        assert!(err.to_string().contains("/srv/probes/out"));
    }

    #[test]
    fn protection_error_display() {
        let err = ProtectionError::UnprotectFailed(PathBuf::from("notes.md"));
        assert_eq!(err.to_string(), "failed to unprotect path: notes.md");
    }
}
