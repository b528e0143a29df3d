//! QR verification codes for the report cover page.

use qrcode::{Color, QrCode};

use crate::error::SubmitError;
use crate::template::NOT_AVAILABLE;

/// The text encoded on the cover page: `ID:<id>\nChecksum:<hex|N/A>`.
pub fn verification_payload(submission_id: &str, checksum: Option<&str>) -> String {
    format!(
        "ID:{submission_id}\nChecksum:{}",
        checksum.unwrap_or(NOT_AVAILABLE)
    )
}

/// A square grid of dark and light modules, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(data: &str) -> Result<Self, SubmitError> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| SubmitError::Qr(e.to_string()))?;
        let width = code.width();
        let dark = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        Ok(Self { width, dark })
    }

    /// Modules per side, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }
}
