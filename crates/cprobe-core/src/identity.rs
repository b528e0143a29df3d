//! # Submission Identity
//!
//! A submission is identified by the local wall-clock second at which it
//! was started, formatted `YYYYMMDD_HHMMSS`. Two runs within the same
//! second share an identifier; that collision is accepted.
//!
//! The same captured instant feeds every other timestamp of the run (the
//! metadata document, the report table, the email template), so all of
//! them agree with each other and with the identifier.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Format of the identifier portion of archive and report file names.
pub const SUBMISSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Human-readable timestamp used in the report and email template.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp-derived submission identifier, e.g. `20260115_093000`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Derive an identifier from a local instant (second resolution).
    pub fn from_datetime(at: &DateTime<Local>) -> Self {
        Self(at.format(SUBMISSION_ID_FORMAT).to_string())
    }

    /// Parse and validate an identifier string.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, SUBMISSION_ID_FORMAT)
            .ok()
            .map(|_| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `probe_submission_<id>.zip`
    pub fn archive_file_name(&self) -> String {
        format!("probe_submission_{}.zip", self.0)
    }

    /// `probe_submission_<id>.pdf`
    pub fn report_file_name(&self) -> String {
        format!("probe_submission_{}.pdf", self.0)
    }

    /// The local instant this identifier denotes, if it maps to one.
    pub fn to_datetime(&self) -> Option<DateTime<Local>> {
        let naive = NaiveDateTime::parse_from_str(&self.0, SUBMISSION_ID_FORMAT).ok()?;
        Local.from_local_datetime(&naive).earliest()
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ISO-8601 local timestamp with microseconds, e.g. `2026-01-15T09:30:00.123456`.
pub fn iso8601(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// `YYYY-MM-DD HH:MM:SS`
pub fn display(at: &DateTime<Local>) -> String {
    at.format(DISPLAY_FORMAT).to_string()
}
