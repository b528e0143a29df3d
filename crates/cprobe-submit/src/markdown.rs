//! # Markdown to Rich Text
//!
//! Response documents are rendered into the report as formatted text. This
//! module flattens CommonMark into a list of [`RichBlock`]s, each a run of
//! styled [`Span`]s, which the PDF layout then wraps and places.
//!
//! Only the constructs a participant is likely to type are distinguished:
//! headings, paragraphs, emphasis, strong, inline code, fenced or indented
//! code blocks, list items and thematic breaks. Everything else degrades to
//! plain paragraph text.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Heading level 1 through 6.
    Heading(u8),
    Paragraph,
    /// `marker` is `•` or `N.`; `depth` counts enclosing lists from 0.
    ListItem { marker: String, depth: usize },
    /// Preformatted text; spans keep their newlines.
    CodeBlock,
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichBlock {
    pub kind: BlockKind,
    pub spans: Vec<Span>,
}

impl RichBlock {
    fn new(kind: BlockKind) -> Self {
        Self { kind, spans: Vec::new() }
    }

    /// Concatenated text of every span.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                style,
            }),
        }
    }
}

#[derive(Default)]
struct Builder {
    blocks: Vec<RichBlock>,
    current: Option<RichBlock>,
    strong: usize,
    emphasis: usize,
    in_code_block: bool,
    /// One entry per open list: the next ordinal, or `None` for bullets.
    lists: Vec<Option<u64>>,
}

impl Builder {
    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            if !block.spans.is_empty() {
                self.blocks.push(block);
            }
        }
    }

    fn open(&mut self, kind: BlockKind) {
        self.flush();
        self.current = Some(RichBlock::new(kind));
    }

    fn style(&self) -> SpanStyle {
        match (self.strong > 0, self.emphasis > 0) {
            (true, true) => SpanStyle::BoldItalic,
            (true, false) => SpanStyle::Bold,
            (false, true) => SpanStyle::Italic,
            (false, false) => SpanStyle::Regular,
        }
    }

    fn text(&mut self, text: &str, style: SpanStyle) {
        self.current
            .get_or_insert_with(|| RichBlock::new(BlockKind::Paragraph))
            .push(text, style);
    }

    fn list_marker(&mut self) -> String {
        match self.lists.last_mut() {
            Some(Some(next)) => {
                let marker = format!("{next}.");
                *next += 1;
                marker
            }
            _ => "\u{2022}".to_string(),
        }
    }

    fn in_list_item(&self) -> bool {
        matches!(
            self.current,
            Some(RichBlock {
                kind: BlockKind::ListItem { .. },
                ..
            })
        )
    }
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Convert markdown source into rich text blocks.
pub fn to_rich_text(markdown: &str) -> Vec<RichBlock> {
    let mut b = Builder::default();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => b.open(BlockKind::Heading(heading_number(level))),
            Event::End(TagEnd::Heading(_)) => b.flush(),

            // Loose list items wrap their text in paragraphs; keep it on the item.
            Event::Start(Tag::Paragraph) => {
                if b.in_list_item() {
                    if let Some(item) = b.current.as_mut() {
                        if !item.spans.is_empty() {
                            item.push(" ", SpanStyle::Regular);
                        }
                    }
                } else {
                    b.open(BlockKind::Paragraph);
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if !b.in_list_item() {
                    b.flush();
                }
            }

            Event::Start(Tag::List(start)) => {
                b.flush();
                b.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                b.flush();
                b.lists.pop();
            }
            Event::Start(Tag::Item) => {
                let marker = b.list_marker();
                let depth = b.lists.len().saturating_sub(1);
                b.open(BlockKind::ListItem { marker, depth });
            }
            Event::End(TagEnd::Item) => b.flush(),

            Event::Start(Tag::CodeBlock(_)) => {
                b.open(BlockKind::CodeBlock);
                b.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = b.current.as_mut() {
                    if let Some(last) = block.spans.last_mut() {
                        let trimmed = last.text.trim_end_matches('\n').len();
                        last.text.truncate(trimmed);
                    }
                }
                b.flush();
                b.in_code_block = false;
            }

            Event::Start(Tag::Strong) => b.strong += 1,
            Event::End(TagEnd::Strong) => b.strong = b.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => b.emphasis += 1,
            Event::End(TagEnd::Emphasis) => b.emphasis = b.emphasis.saturating_sub(1),

            Event::Text(text) => {
                let style = if b.in_code_block { SpanStyle::Code } else { b.style() };
                b.text(&text, style);
            }
            Event::Code(code) => b.text(&code, SpanStyle::Code),
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = b.style();
                b.text(&html, style);
            }
            Event::SoftBreak => b.text(" ", SpanStyle::Regular),
            Event::HardBreak => b.text("\n", SpanStyle::Regular),
            Event::Rule => {
                b.flush();
                b.blocks.push(RichBlock::new(BlockKind::Rule));
            }
            _ => {}
        }
    }
    b.flush();
    b.blocks
}
