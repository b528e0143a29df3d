//! # Submission Report
//!
//! The PDF handed to participants for review before they email their
//! submission. Layout, top to bottom:
//!
//! 1. Cover page (optional): project title, institution, a facts table,
//!    a QR verification code (optional) and the data handling notice.
//! 2. "Probe Responses": each response document under its file name,
//!    rendered from markdown.
//! 3. Footer: contact line and the rendered email template in monospace.
//!
//! A configured watermark is drawn diagonally behind every page.
//!
//! The report uses the standard Type1 fonts, so characters outside WinAnsi
//! print as `?`. The archive keeps the original text; a warning names each
//! affected response.

use std::path::Path;

use cprobe_core::{FileDigest, ResponseDocument, SubmissionId, SubmissionSettings};

use crate::error::SubmitError;
use crate::markdown::{to_rich_text, BlockKind, RichBlock, SpanStyle};
use crate::pdf::{unmappable_chars, Font, PdfLayout, Run, TextStyle};
use crate::qr::{verification_payload, QrMatrix};

const TITLE_SIZE: f32 = 24.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const CODE_SIZE: f32 = 9.0;
const QR_SIZE: f32 = 144.0;
const TABLE_LABEL_WIDTH: f32 = 144.0;
const LIST_INDENT: f32 = 18.0;

/// Everything the report shows for one submission.
pub struct ReportContent<'a> {
    pub settings: &'a SubmissionSettings,
    pub submission_id: &'a SubmissionId,
    /// Human-readable run timestamp.
    pub timestamp: &'a str,
    pub responses: &'a [ResponseDocument],
    pub checksum: Option<&'a FileDigest>,
    /// The rendered email template.
    pub email: &'a str,
}

/// Lay out and write the report. Returns the number of pages.
pub fn write_report(path: &Path, content: &ReportContent<'_>) -> Result<usize, SubmitError> {
    let settings = content.settings;
    let mut layout = PdfLayout::new(
        format!("{} - {}", settings.metadata.research_project, content.submission_id),
        settings.pdf_settings.watermark_text(),
    );

    if settings.pdf_settings.include_cover_page {
        cover_page(&mut layout, content)?;
    }

    layout.text("Probe Responses", Font::Bold, TextStyle::new(HEADING_SIZE));
    layout.space(18.0);
    for response in content.responses {
        let markdown = response
            .read_to_string()
            .map_err(SubmitError::io(&response.path))?;
        let replaced = unmappable_chars(&markdown);
        if replaced > 0 {
            tracing::warn!(
                response = %response.name,
                replaced,
                "characters outside WinAnsi print as '?' in the report; the archive keeps the original"
            );
        }
        layout.text(&response.name, Font::Bold, TextStyle::new(HEADING_SIZE));
        layout.space(7.0);
        for block in to_rich_text(&markdown) {
            render_block(&mut layout, &block);
        }
        layout.space(36.0);
    }

    layout.space(72.0);
    layout.text(
        &format!("Contact: {}", settings.metadata.contact_info),
        Font::Regular,
        TextStyle::new(BODY_SIZE).centered().gray(0.5),
    );
    layout.space(36.0);
    layout.text("Email Template:", Font::Bold, TextStyle::new(HEADING_SIZE));
    layout.space(7.0);
    layout.preformatted(content.email, TextStyle::new(CODE_SIZE));

    let pages = layout.save(path)?;
    tracing::debug!(path = %path.display(), pages, "report written");
    Ok(pages)
}

fn cover_page(layout: &mut PdfLayout, content: &ReportContent<'_>) -> Result<(), SubmitError> {
    let settings = content.settings;
    layout.text(
        &settings.metadata.research_project,
        Font::Bold,
        TextStyle::new(TITLE_SIZE).centered(),
    );
    layout.space(36.0);
    if !settings.metadata.institution.is_empty() {
        layout.text(
            &settings.metadata.institution,
            Font::Bold,
            TextStyle::new(HEADING_SIZE).centered(),
        );
        layout.space(18.0);
    }

    let mut rows = vec![
        ("Submission ID".to_string(), content.submission_id.to_string()),
        ("Timestamp".to_string(), content.timestamp.to_string()),
        ("Number of Responses".to_string(), content.responses.len().to_string()),
    ];
    if let Some(checksum) = content.checksum {
        rows.push(("Checksum".to_string(), checksum.to_hex()));
    }
    layout.table(&rows, BODY_SIZE, TABLE_LABEL_WIDTH);

    if settings.submission_format.generate_qr {
        let checksum = content.checksum.map(FileDigest::to_hex);
        let payload = verification_payload(content.submission_id.as_str(), checksum.as_deref());
        layout.space(36.0);
        layout.qr(&QrMatrix::encode(&payload)?, QR_SIZE);
    }

    layout.space(72.0);
    layout.text(
        &settings.metadata.data_handling_notice,
        Font::Regular,
        TextStyle::new(BODY_SIZE),
    );
    layout.page_break();
    Ok(())
}

fn span_font(style: SpanStyle) -> Font {
    match style {
        SpanStyle::Regular => Font::Regular,
        SpanStyle::Bold => Font::Bold,
        SpanStyle::Italic => Font::Italic,
        SpanStyle::BoldItalic => Font::BoldItalic,
        SpanStyle::Code => Font::Mono,
    }
}

fn runs(block: &RichBlock) -> Vec<Run> {
    block
        .spans
        .iter()
        .map(|s| Run::new(s.text.as_str(), span_font(s.style)))
        .collect()
}

fn render_block(layout: &mut PdfLayout, block: &RichBlock) {
    match &block.kind {
        BlockKind::Heading(level) => {
            let size = match level {
                1 => 16.0,
                2 => 14.0,
                3 => 12.0,
                _ => 11.0,
            };
            let bold: Vec<Run> = block
                .spans
                .iter()
                .map(|s| Run::new(s.text.as_str(), Font::Bold))
                .collect();
            layout.space(6.0);
            layout.paragraph(&bold, TextStyle::new(size));
            layout.space(4.0);
        }
        BlockKind::Paragraph => {
            layout.paragraph(&runs(block), TextStyle::new(BODY_SIZE));
            layout.space(6.0);
        }
        BlockKind::ListItem { marker, depth } => {
            let mut item = vec![Run::new(format!("{marker} "), Font::Regular)];
            item.extend(runs(block));
            let indent = LIST_INDENT * (*depth as f32 + 1.0);
            layout.paragraph(&item, TextStyle::new(BODY_SIZE).indented(indent));
            layout.space(2.0);
        }
        BlockKind::CodeBlock => {
            layout.preformatted(&block.plain_text(), TextStyle::new(CODE_SIZE).indented(LIST_INDENT));
            layout.space(6.0);
        }
        BlockKind::Rule => layout.rule(),
    }
}
