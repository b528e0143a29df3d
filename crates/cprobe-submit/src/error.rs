//! Errors raised while packaging a submission.

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum SubmitError {
    /// The responses directory holds no `.md` documents.
    #[error("no probe responses found in {}", .0.display())]
    NoResponses(PathBuf),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ZIP container could not be written or read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The metadata document could not be serialized or parsed.
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("email template error: {0}")]
    Template(#[from] TemplateError),

    /// The verification payload does not fit in a QR code.
    #[error("qr code error: {0}")]
    Qr(String),

    /// The PDF report could not be assembled or written.
    #[error("pdf error: {0}")]
    Pdf(String),
}

impl SubmitError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
