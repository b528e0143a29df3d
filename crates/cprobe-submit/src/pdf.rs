//! # PDF Page Layout
//!
//! A small flow layout on top of `lopdf`: content is appended top to bottom
//! on US Letter pages with 72 pt margins, and a new page starts whenever
//! the next line, table row or image does not fit. Text uses the standard
//! Type 1 fonts (Helvetica family and Courier) with WinAnsi encoding, so no
//! font program is embedded.
//!
//! Glyph advance widths come from the Helvetica metrics for printable
//! ASCII. Characters outside that range are measured with an average width,
//! which only affects where lines break.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::SubmitError;
use crate::qr::QrMatrix;

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;

/// Line height as a multiple of font size.
const LEADING: f32 = 1.2;
/// Modules of light border around a QR code.
const QR_QUIET_ZONE: usize = 4;
const WATERMARK_SIZE: f32 = 60.0;
const WATERMARK_ALPHA: f32 = 0.3;
const TABLE_PADDING: f32 = 6.0;

/// Helvetica advance widths for ' ' through '~', in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333, // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' .. 'z'
    334, 260, 334, 584, // '{' .. '~'
];
const DEFAULT_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Mono,
}

impl Font {
    const ALL: [Font; 5] = [Font::Regular, Font::Bold, Font::Italic, Font::BoldItalic, Font::Mono];

    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Italic => "F3",
            Font::BoldItalic => "F4",
            Font::Mono => "F5",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Italic => "Helvetica-Oblique",
            Font::BoldItalic => "Helvetica-BoldOblique",
            Font::Mono => "Courier",
        }
    }

    fn char_width(self, c: char) -> f32 {
        if self == Font::Mono {
            return 600.0;
        }
        let base = match c {
            ' '..='~' => HELVETICA_WIDTHS[c as usize - 0x20],
            _ => DEFAULT_WIDTH,
        };
        // Bold faces run about 6% wider.
        match self {
            Font::Bold | Font::BoldItalic => f32::from(base) * 1.06,
            _ => f32::from(base),
        }
    }

    /// Advance width of `text` at `size` points.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c)).sum::<f32>() * size / 1000.0
    }
}

/// Encode text for a WinAnsi simple font. Unmappable characters become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

/// Number of characters in `text` that [`win_ansi`] cannot represent.
pub fn unmappable_chars(text: &str) -> usize {
    text.chars()
        .filter(|c| *c != '\n' && *c != '\r' && win_ansi_byte(*c).is_none())
        .count()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
        '\t' => b' ',
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        _ => return None,
    };
    Some(byte)
}

/// Text in a single font.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub font: Font,
}

impl Run {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub align: Align,
    /// Left indent in points.
    pub indent: f32,
    /// Fill gray level, 0 is black.
    pub gray: f32,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            align: Align::Left,
            indent: 0.0,
            gray: 0.0,
        }
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn gray(mut self, gray: f32) -> Self {
        self.gray = gray;
        self
    }
}

#[derive(Default)]
struct LineBuilder {
    runs: Vec<Run>,
    width: f32,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push(&mut self, text: &str, font: Font, width: f32) {
        match self.runs.last_mut() {
            Some(last) if last.font == font => last.text.push_str(text),
            _ => self.runs.push(Run::new(text, font)),
        }
        self.width += width;
    }

    fn take(&mut self) -> Vec<Run> {
        let mut runs = std::mem::take(&mut self.runs);
        self.width = 0.0;
        while let Some(last) = runs.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
            if last.text.is_empty() {
                runs.pop();
            } else {
                break;
            }
        }
        runs
    }
}

enum Token<'a> {
    Word(&'a str),
    Space(&'a str),
    Newline,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if c == '\n' || in_space.is_some_and(|s| s != space) {
            if i > start {
                tokens.push(if in_space == Some(true) {
                    Token::Space(&text[start..i])
                } else {
                    Token::Word(&text[start..i])
                });
            }
            start = i;
        }
        if c == '\n' {
            tokens.push(Token::Newline);
            start = i + 1;
            in_space = None;
        } else {
            in_space = Some(space);
        }
    }
    if start < text.len() {
        tokens.push(if in_space == Some(true) {
            Token::Space(&text[start..])
        } else {
            Token::Word(&text[start..])
        });
    }
    tokens
}

/// Break styled runs into lines no wider than `max_width`.
///
/// Lines break at whitespace; a word wider than a whole line is split
/// between characters. `\n` forces a break. Leading spaces on wrapped lines
/// and trailing spaces on every line are dropped.
pub fn wrap_runs(runs: &[Run], size: f32, max_width: f32) -> Vec<Vec<Run>> {
    let mut lines = Vec::new();
    let mut line = LineBuilder::default();

    for run in runs {
        for token in tokenize(&run.text) {
            match token {
                Token::Newline => lines.push(line.take()),
                Token::Space(s) => {
                    if !line.is_empty() {
                        line.push(s, run.font, run.font.text_width(s, size));
                    }
                }
                Token::Word(word) => {
                    let width = run.font.text_width(word, size);
                    if line.width + width > max_width && !line.is_empty() {
                        lines.push(line.take());
                    }
                    if width <= max_width {
                        line.push(word, run.font, width);
                        continue;
                    }
                    let mut buf = [0u8; 4];
                    for c in word.chars() {
                        let cw = run.font.char_width(c) * size / 1000.0;
                        if line.width + cw > max_width && !line.is_empty() {
                            lines.push(line.take());
                        }
                        line.push(c.encode_utf8(&mut buf), run.font, cw);
                    }
                }
            }
        }
    }
    if !line.is_empty() {
        lines.push(line.take());
    }
    lines
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

/// Flowing page layout that renders into a `lopdf` document.
pub struct PdfLayout {
    title: String,
    watermark: Option<String>,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PdfLayout {
    pub fn new(title: impl Into<String>, watermark: Option<&str>) -> Self {
        Self {
            title: title.into(),
            watermark: watermark.map(str::to_string),
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    /// Pages laid out so far, counting the current one.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless the current one is still empty.
    pub fn page_break(&mut self) {
        if !self.ops.is_empty() {
            self.new_page();
        }
    }

    /// Make sure `height` points fit below the cursor. An item taller than
    /// a whole page is placed at the top of a fresh page and overflows.
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN && !self.ops.is_empty() {
            self.new_page();
        }
    }

    /// Vertical gap. Space that runs past the bottom margin is not carried
    /// onto the next page.
    pub fn space(&mut self, height: f32) {
        self.y -= height;
        if self.y < MARGIN {
            if self.ops.is_empty() {
                self.y = PAGE_HEIGHT - MARGIN;
            } else {
                self.new_page();
            }
        }
    }

    pub fn text(&mut self, text: &str, font: Font, style: TextStyle) {
        self.paragraph(&[Run::new(text, font)], style);
    }

    /// Wrap and place styled runs.
    pub fn paragraph(&mut self, runs: &[Run], style: TextStyle) {
        let available = self.content_width() - style.indent;
        let line_height = style.size * LEADING;
        for line in wrap_runs(runs, style.size, available) {
            self.reserve(line_height);
            let width: f32 = line.iter().map(|r| r.font.text_width(&r.text, style.size)).sum();
            let offset = match style.align {
                Align::Left => 0.0,
                Align::Center => ((available - width) / 2.0).max(0.0),
            };
            let baseline = self.y - style.size;
            self.emit_line(&line, MARGIN + style.indent + offset, baseline, style);
            self.y -= line_height;
        }
    }

    /// Monospaced text with line breaks and leading whitespace preserved.
    pub fn preformatted(&mut self, text: &str, style: TextStyle) {
        let available = self.content_width() - style.indent;
        let per_line = ((available / Font::Mono.text_width("M", style.size)) as usize).max(1);
        let line_height = style.size * LEADING;
        for raw in text.split('\n') {
            let chars: Vec<char> = raw.trim_end_matches('\r').chars().collect();
            let chunks: Vec<String> = if chars.is_empty() {
                vec![String::new()]
            } else {
                chars.chunks(per_line).map(|c| c.iter().collect()).collect()
            };
            for chunk in chunks {
                self.reserve(line_height);
                let baseline = self.y - style.size;
                self.emit_line(&[Run::new(chunk, Font::Mono)], MARGIN + style.indent, baseline, style);
                self.y -= line_height;
            }
        }
    }

    /// A thin horizontal line across the content width.
    pub fn rule(&mut self) {
        self.reserve(12.0);
        self.y -= 6.0;
        self.ops.extend([
            op("q", vec![]),
            op("G", vec![real(0.6)]),
            op("w", vec![real(0.5)]),
            op("m", vec![real(MARGIN), real(self.y)]),
            op("l", vec![real(PAGE_WIDTH - MARGIN), real(self.y)]),
            op("S", vec![]),
            op("Q", vec![]),
        ]);
        self.y -= 6.0;
    }

    /// Two-column table with a shaded, bold label column and a grid.
    pub fn table(&mut self, rows: &[(String, String)], size: f32, label_width: f32) {
        let total_width = self.content_width();
        let value_width = total_width - label_width;
        let line_height = size * LEADING;
        let style = TextStyle::new(size);

        for (label, value) in rows {
            let label_lines = wrap_runs(
                &[Run::new(label.as_str(), Font::Bold)],
                size,
                label_width - 2.0 * TABLE_PADDING,
            );
            let value_lines = wrap_runs(
                &[Run::new(value.as_str(), Font::Regular)],
                size,
                value_width - 2.0 * TABLE_PADDING,
            );
            let lines = label_lines.len().max(value_lines.len()).max(1);
            let height = lines as f32 * line_height + 2.0 * TABLE_PADDING;
            self.reserve(height);

            let top = self.y;
            let bottom = top - height;
            self.ops.extend([
                op("q", vec![]),
                op("g", vec![real(0.83)]),
                op("re", vec![real(MARGIN), real(bottom), real(label_width), real(height)]),
                op("f", vec![]),
                op("G", vec![real(0.5)]),
                op("w", vec![real(0.5)]),
                op("re", vec![real(MARGIN), real(bottom), real(total_width), real(height)]),
                op("S", vec![]),
                op("m", vec![real(MARGIN + label_width), real(bottom)]),
                op("l", vec![real(MARGIN + label_width), real(top)]),
                op("S", vec![]),
                op("Q", vec![]),
            ]);

            for (column_x, cell) in [(MARGIN, &label_lines), (MARGIN + label_width, &value_lines)] {
                for (i, line) in cell.iter().enumerate() {
                    let baseline = top - TABLE_PADDING - size - i as f32 * line_height;
                    self.emit_line(line, column_x + TABLE_PADDING, baseline, style);
                }
            }
            self.y = bottom;
        }
    }

    /// A QR code `size` points square, centred, quiet zone included.
    pub fn qr(&mut self, matrix: &QrMatrix, size: f32) {
        self.reserve(size);
        let modules = matrix.width() + 2 * QR_QUIET_ZONE;
        let module = size / modules as f32;
        let left = MARGIN + (self.content_width() - size) / 2.0;
        let top = self.y;

        self.ops.push(op("q", vec![]));
        self.ops.push(op("g", vec![real(0.0)]));
        for row in 0..matrix.width() {
            for col in 0..matrix.width() {
                if matrix.is_dark(col, row) {
                    let x = left + (col + QR_QUIET_ZONE) as f32 * module;
                    let y = top - (row + QR_QUIET_ZONE + 1) as f32 * module;
                    self.ops.push(op("re", vec![real(x), real(y), real(module), real(module)]));
                }
            }
        }
        self.ops.push(op("f", vec![]));
        self.ops.push(op("Q", vec![]));
        self.y -= size;
    }

    fn emit_line(&mut self, runs: &[Run], x: f32, baseline: f32, style: TextStyle) {
        if runs.is_empty() {
            return;
        }
        if style.gray > 0.0 {
            self.ops.push(op("g", vec![real(style.gray)]));
        }
        self.ops.push(op("BT", vec![]));
        self.ops.push(op("Td", vec![real(x), real(baseline)]));
        for run in runs {
            self.ops.push(op(
                "Tf",
                vec![Object::Name(run.font.resource_name().into()), real(style.size)],
            ));
            self.ops
                .push(op("Tj", vec![Object::string_literal(win_ansi(&run.text))]));
        }
        self.ops.push(op("ET", vec![]));
        if style.gray > 0.0 {
            self.ops.push(op("g", vec![real(0.0)]));
        }
    }

    fn watermark_ops(&self) -> Vec<Operation> {
        let Some(text) = self.watermark.as_deref() else {
            return Vec::new();
        };
        let (sin, cos) = 45f32.to_radians().sin_cos();
        let width = Font::Regular.text_width(text, WATERMARK_SIZE);
        vec![
            op("q", vec![]),
            op("gs", vec![Object::Name(b"GS1".to_vec())]),
            op("g", vec![real(0.83)]),
            op(
                "cm",
                vec![
                    real(cos),
                    real(sin),
                    real(-sin),
                    real(cos),
                    real(PAGE_WIDTH / 2.0),
                    real(PAGE_HEIGHT / 2.0),
                ],
            ),
            op("BT", vec![]),
            op(
                "Tf",
                vec![Object::Name(Font::Regular.resource_name().into()), real(WATERMARK_SIZE)],
            ),
            op("Td", vec![real(-width / 2.0), real(-WATERMARK_SIZE / 3.0)]),
            op("Tj", vec![Object::string_literal(win_ansi(text))]),
            op("ET", vec![]),
            op("Q", vec![]),
        ]
    }

    fn resources(doc: &mut Document) -> ObjectId {
        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), id);
        }
        doc.add_object(dictionary! {
            "Font" => fonts,
            "ExtGState" => dictionary! {
                "GS1" => dictionary! {
                    "Type" => "ExtGState",
                    "ca" => real(WATERMARK_ALPHA),
                    "CA" => real(WATERMARK_ALPHA),
                },
            },
        })
    }

    /// Close the last page and assemble the document.
    pub fn into_document(mut self) -> Result<Document, SubmitError> {
        self.new_page();
        let watermark = self.watermark_ops();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let resources_id = Self::resources(&mut doc);

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page_ops in std::mem::take(&mut self.pages) {
            let mut operations = watermark.clone();
            operations.extend(page_ops);
            let bytes = Content { operations }
                .encode()
                .map_err(|e| SubmitError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
                "Resources" => resources_id,
                "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(win_ansi(&self.title)),
            "Producer" => Object::string_literal(format!("cprobe {}", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        Ok(doc)
    }

    /// Assemble, compress and write the document to `path`.
    pub fn save(self, path: &Path) -> Result<usize, SubmitError> {
        let mut doc = self.into_document()?;
        let pages = doc.get_pages().len();
        doc.compress();
        doc.save(path).map_err(|e| SubmitError::Pdf(format!("{}: {e}", path.display())))?;
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_text(ops: &[Operation]) -> Vec<Vec<u8>> {
        ops.iter()
            .filter(|o| o.operator == "Tj")
            .filter_map(|o| match o.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn helvetica_widths() {
        assert!((Font::Regular.text_width("i", 10.0) - 2.22).abs() < 1e-3);
        assert!((Font::Mono.text_width("abcd", 10.0) - 24.0).abs() < 1e-3);
        assert!(Font::Bold.text_width("Wide", 12.0) > Font::Regular.text_width("Wide", 12.0));
    }

    #[test]
    fn win_ansi_maps_typographic_characters() {
        assert_eq!(win_ansi("a\u{2022}\u{2014}é"), vec![b'a', 0x95, 0x97, 0xe9]);
        assert_eq!(win_ansi("\u{4e2d}"), vec![b'?']);
    }

    #[test]
    fn counts_characters_outside_win_ansi() {
        assert_eq!(unmappable_chars("\u{dc}ber caf\u{e9} \u{2014} na\u{ef}ve"), 0);
        assert_eq!(unmappable_chars("na\u{ef}ve \u{65e5}\u{672c}\u{8a9e}\n"), 3);
    }

    #[test]
    fn wraps_at_whitespace() {
        let runs = [Run::new("one two three four", Font::Mono)];
        // Mono at 10pt is 6pt per char; 50pt fits 8 chars.
        let lines = wrap_runs(&runs, 10.0, 50.0);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.iter().map(|r| r.text.as_str()).collect())
            .collect();
        assert_eq!(text, vec!["one two", "three", "four"]);
    }

    #[test]
    fn long_words_split_between_characters() {
        let runs = [Run::new("a".repeat(20), Font::Mono)];
        let lines = wrap_runs(&runs, 10.0, 60.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text.len(), 10);
    }

    #[test]
    fn newline_forces_break_and_styles_merge() {
        let runs = [
            Run::new("bold ", Font::Bold),
            Run::new("plain\nnext", Font::Regular),
        ];
        let lines = wrap_runs(&runs, 10.0, 400.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[0][0], Run::new("bold ", Font::Bold));
        assert_eq!(lines[1], vec![Run::new("next", Font::Regular)]);
    }

    #[test]
    fn overflowing_text_starts_new_pages() {
        let mut layout = PdfLayout::new("t", None);
        for i in 0..200 {
            layout.text(&format!("line {i}"), Font::Regular, TextStyle::new(10.0));
        }
        // 12pt per line on 648pt of usable height gives 54 lines a page.
        assert_eq!(layout.page_count(), 4);
    }

    #[test]
    fn page_break_on_empty_page_is_noop() {
        let mut layout = PdfLayout::new("t", None);
        layout.page_break();
        assert_eq!(layout.page_count(), 1);
        layout.text("x", Font::Regular, TextStyle::new(10.0));
        layout.page_break();
        assert_eq!(layout.page_count(), 2);
    }

    #[test]
    fn watermark_is_drawn_first_on_every_page() {
        let mut layout = PdfLayout::new("t", Some("CONFIDENTIAL"));
        layout.text("first", Font::Regular, TextStyle::new(10.0));
        layout.page_break();
        layout.text("second", Font::Regular, TextStyle::new(10.0));
        let doc = layout.into_document().unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);
        for page_id in pages.values() {
            let content = doc.get_and_decode_page_content(*page_id).unwrap();
            let text = shown_text(&content.operations);
            assert_eq!(text[0], b"CONFIDENTIAL".to_vec());
            assert_eq!(content.operations[1].operator, "gs");
        }
    }

    #[test]
    fn saved_document_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let mut layout = PdfLayout::new("Report", None);
        layout.table(
            &[("Submission ID".into(), "20260115_093000".into())],
            10.0,
            144.0,
        );
        layout.rule();
        layout.preformatted("  indented\n\nafter blank", TextStyle::new(9.0));
        assert_eq!(layout.save(&path).unwrap(), 1);

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
