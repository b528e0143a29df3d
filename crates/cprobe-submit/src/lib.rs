//! # cprobe-submit: Submission Packaging
//!
//! Packages a participant's cultural probe responses for return to the
//! research team:
//!
//! - [`archive`]: the ZIP container and its verification.
//! - [`metadata`]: the `submission_metadata.json` document.
//! - [`template`]: email template substitution.
//! - [`markdown`], [`pdf`], [`qr`], [`report`]: the PDF report.
//! - [`packager`]: [`ProbeSubmission`], which runs the steps in order.
//!
//! ## Crate Policy
//!
//! - Depends only on `cprobe-core` internally.
//! - Errors are [`SubmitError`]; only [`ProbeSubmission::submit`] prints.

pub mod archive;
pub mod error;
pub mod markdown;
pub mod metadata;
pub mod packager;
pub mod pdf;
pub mod qr;
pub mod report;
pub mod template;

pub use archive::{read_metadata, verify_archive};
pub use error::SubmitError;
pub use metadata::{SubmissionMetadata, METADATA_FILE_NAME};
pub use packager::{ArchiveOutcome, ProbeSubmission};
pub use template::TemplateError;
