//! # Probe Submission Packager
//!
//! Turns the response documents of one study participant into a submission:
//! a ZIP archive (responses plus metadata), an optional SHA-256 checksum of
//! that archive, and a PDF report to review and email.
//!
//! ```text
//! responses/*.md ──► probe_submission_<id>.zip ──► sha256 ──► probe_submission_<id>.pdf
//! ```
//!
//! A [`ProbeSubmission`] captures one instant at construction. The
//! identifier, the metadata timestamp, the report table and the email
//! template all derive from it.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use cprobe_core::identity::{display, iso8601};
use cprobe_core::{
    collect_responses, sha256_file, FileDigest, PerformanceMonitor, ProbeConfig, ResponseDocument,
    SubmissionId, SubmissionSettings, SystemInfo,
};

use crate::archive::write_archive;
use crate::error::SubmitError;
use crate::metadata::SubmissionMetadata;
use crate::report::{write_report, ReportContent};
use crate::template::EmailFields;

/// Result of the archive step.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveOutcome {
    pub path: PathBuf,
    /// The bundled response documents, sorted by name.
    pub responses: Vec<ResponseDocument>,
    pub checksum: Option<FileDigest>,
}

/// One submission run against a loaded configuration.
#[derive(Debug)]
pub struct ProbeSubmission<'a> {
    config: &'a ProbeConfig,
    settings: SubmissionSettings,
    created_at: DateTime<Local>,
    submission_id: SubmissionId,
    checksum: Option<FileDigest>,
}

impl<'a> ProbeSubmission<'a> {
    pub fn new(config: &'a ProbeConfig) -> Self {
        Self::at(config, Local::now())
    }

    /// A submission stamped with `created_at` instead of the current time.
    pub fn at(config: &'a ProbeConfig, created_at: DateTime<Local>) -> Self {
        Self {
            config,
            settings: config.submission_settings(),
            submission_id: SubmissionId::from_datetime(&created_at),
            created_at,
            checksum: None,
        }
    }

    pub fn submission_id(&self) -> &SubmissionId {
        &self.submission_id
    }

    pub fn created_at(&self) -> &DateTime<Local> {
        &self.created_at
    }

    pub fn settings(&self) -> &SubmissionSettings {
        &self.settings
    }

    /// Digest of the archive, once the archive step has run with
    /// checksums enabled.
    pub fn checksum(&self) -> Option<&FileDigest> {
        self.checksum.as_ref()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.submissions_dir()
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_dir().join(self.submission_id.archive_file_name())
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir().join(self.submission_id.report_file_name())
    }

    fn metadata(&self, responses: &[ResponseDocument]) -> SubmissionMetadata {
        SubmissionMetadata {
            submission_id: self.submission_id.to_string(),
            timestamp: iso8601(&self.created_at),
            num_responses: responses.len(),
            response_files: responses.iter().map(|r| r.name.clone()).collect(),
            system_info: self
                .settings
                .submission_format
                .include_system_info
                .then(SystemInfo::capture),
            config: self.config.raw().clone(),
        }
    }

    /// Bundle every response document and the metadata into the archive.
    pub fn create_archive(&mut self) -> Result<ArchiveOutcome, SubmitError> {
        let responses_dir = self.config.responses_dir();
        let responses = match collect_responses(&responses_dir) {
            Ok(found) => found,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(SubmitError::io(&responses_dir)(e)),
        };
        if responses.is_empty() {
            return Err(SubmitError::NoResponses(responses_dir));
        }

        let output_dir = self.output_dir();
        std::fs::create_dir_all(&output_dir).map_err(SubmitError::io(&output_dir))?;

        let path = self.archive_path();
        write_archive(&path, &responses, &self.metadata(&responses))?;

        self.checksum = if self.settings.security.generate_checksum {
            Some(sha256_file(&path).map_err(SubmitError::io(&path))?)
        } else {
            None
        };

        tracing::info!(
            submission_id = %self.submission_id,
            path = %path.display(),
            responses = responses.len(),
            "archive created"
        );
        Ok(ArchiveOutcome {
            path,
            responses,
            checksum: self.checksum,
        })
    }

    /// The email template with this submission's values filled in.
    pub fn email_body(&self, num_responses: usize) -> Result<String, SubmitError> {
        let fields = EmailFields {
            submission_id: self.submission_id.to_string(),
            timestamp: display(&self.created_at),
            num_responses,
            checksum: self.checksum.as_ref().map(FileDigest::to_hex),
            participant_name: self.settings.participant_placeholder.clone(),
        };
        Ok(fields.render(&self.config.email_template())?)
    }

    /// Write the PDF report for an archive produced by this submission.
    pub fn create_report(&self, archive: &ArchiveOutcome) -> Result<PathBuf, SubmitError> {
        let email = self.email_body(archive.responses.len())?;
        let timestamp = display(&self.created_at);
        let path = self.report_path();
        let content = ReportContent {
            settings: &self.settings,
            submission_id: &self.submission_id,
            timestamp: &timestamp,
            responses: &archive.responses,
            checksum: self.checksum.as_ref(),
            email: &email,
        };
        let pages = write_report(&path, &content)?;
        tracing::info!(
            submission_id = %self.submission_id,
            path = %path.display(),
            pages,
            "report created"
        );
        Ok(path)
    }

    /// Run the archive and report steps, printing progress and next steps.
    ///
    /// Returns `false` after printing and logging the first error. An
    /// archive written before a failing report step is left in place.
    pub fn submit(&mut self) -> bool {
        println!("Preparing submission {}", self.submission_id);
        let monitor = PerformanceMonitor::new();

        let archive = match monitor.measure("create_archive", || self.create_archive()) {
            Ok(archive) => archive,
            Err(e) => return self.fail(&e),
        };
        println!("OK: archive created: {}", archive.path.display());
        for response in &archive.responses {
            println!("  + {}", response.name);
        }
        if let Some(checksum) = &archive.checksum {
            println!("  checksum: {checksum}");
        }

        let report = match monitor.measure("create_report", || self.create_report(&archive)) {
            Ok(report) => report,
            Err(e) => return self.fail(&e),
        };
        println!("OK: report created: {}", report.display());

        let recipient = self
            .settings
            .receiver_email
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or("the research team");
        println!();
        println!("Next steps:");
        println!("  1. Review the PDF report: {}", report.display());
        println!("  2. Email the PDF report to {recipient}");
        println!("  3. Keep the ZIP archive as your copy: {}", archive.path.display());
        true
    }

    fn fail(&self, error: &SubmitError) -> bool {
        println!("FAIL: {error}");
        tracing::error!(submission_id = %self.submission_id, error = %error, "submission failed");
        false
    }
}
