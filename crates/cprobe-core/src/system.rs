//! # System Snapshot
//!
//! Optional environment facts embedded in a submission's metadata so the
//! research team can tell which platform a participant worked on.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::identity::iso8601;

/// Operating system and runtime facts captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system family, e.g. `linux`, `macos`, `windows`.
    pub os: String,
    /// Kernel or OS release string; `unknown` when unavailable.
    pub os_version: String,
    /// CPU architecture, e.g. `x86_64`, `aarch64`.
    pub machine: String,
    /// Version of the toolkit that produced the submission.
    pub runtime_version: String,
    /// When the snapshot was taken (ISO-8601, local time).
    pub timestamp: String,
}

impl SystemInfo {
    pub fn capture() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            os_version: os_version(),
            machine: std::env::consts::ARCH.to_string(),
            runtime_version: format!("cprobe {}", env!("CARGO_PKG_VERSION")),
            timestamp: iso8601(&Local::now()),
        }
    }
}

#[cfg(target_os = "linux")]
fn os_version() -> String {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(not(target_os = "linux"))]
fn os_version() -> String {
    "unknown".to_string()
}
