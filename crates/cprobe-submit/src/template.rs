//! # Email Template Rendering
//!
//! The configured email template uses named placeholders in braces, the
//! same syntax study coordinators already use for other tooling:
//!
//! ```text
//! Submission ID: {submission_id}
//! Literal braces are doubled: {{like this}}
//! ```
//!
//! A format spec or conversion after the name (`{num_responses:>3}`,
//! `{checksum!r}`) is accepted and ignored. Unknown names and unbalanced
//! braces are errors, so a typo in the template surfaces before the report
//! is written.

use std::collections::BTreeMap;

use thiserror::Error;

/// Value used for the checksum placeholder when no checksum was computed.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("unmatched '{brace}' at byte {offset}")]
    UnmatchedBrace { brace: char, offset: usize },
}

/// Substitute `{name}` placeholders from `values`.
pub fn render_format(template: &str, values: &BTreeMap<&str, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut field = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    if inner == '{' {
                        break;
                    }
                    field.push(inner);
                }
                if !closed {
                    return Err(TemplateError::UnmatchedBrace { brace: '{', offset });
                }
                let name = field
                    .split(|ch| ch == ':' || ch == '!')
                    .next()
                    .unwrap_or_default()
                    .trim();
                let value = values
                    .get(name)
                    .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;
                out.push_str(value);
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::UnmatchedBrace { brace: '}', offset }),
            other => out.push(other),
        }
    }
    Ok(out)
}

/// The facts substituted into the email template for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailFields {
    pub submission_id: String,
    pub timestamp: String,
    pub num_responses: usize,
    pub checksum: Option<String>,
    pub participant_name: String,
}

impl EmailFields {
    fn values(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("submission_id", self.submission_id.clone()),
            ("timestamp", self.timestamp.clone()),
            ("num_responses", self.num_responses.to_string()),
            (
                "checksum",
                self.checksum.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            ("participant_name", self.participant_name.clone()),
        ])
    }

    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        render_format(template, &self.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields() -> EmailFields {
        EmailFields {
            submission_id: "20260115_093000".into(),
            timestamp: "2026-01-15 09:30:00".into(),
            num_responses: 3,
            checksum: None,
            participant_name: "[Your Name]".into(),
        }
    }

    #[test]
    fn substitutes_every_field() {
        let out = fields()
            .render("{submission_id} at {timestamp}: {num_responses} files, {checksum}, {participant_name}")
            .unwrap();
        assert_eq!(
            out,
            "20260115_093000 at 2026-01-15 09:30:00: 3 files, N/A, [Your Name]"
        );
    }

    #[test]
    fn checksum_is_used_when_present() {
        let mut f = fields();
        f.checksum = Some("ab".repeat(32));
        assert_eq!(f.render("{checksum}").unwrap(), "ab".repeat(32));
    }

    #[test]
    fn doubled_braces_are_literal() {
        let out = fields().render("{{not a field}} {submission_id}").unwrap();
        assert_eq!(out, "{not a field} 20260115_093000");
    }

    #[test]
    fn format_spec_is_ignored() {
        assert_eq!(fields().render("{num_responses:>3}").unwrap(), "3");
        assert_eq!(fields().render("{submission_id!s}").unwrap(), "20260115_093000");
    }

    #[test]
    fn unknown_placeholder_is_error() {
        assert_eq!(
            fields().render("Hello {name}"),
            Err(TemplateError::UnknownPlaceholder("name".into()))
        );
    }

    #[test]
    fn unbalanced_braces_are_errors() {
        assert!(matches!(
            fields().render("open {submission_id"),
            Err(TemplateError::UnmatchedBrace { brace: '{', offset: 5 })
        ));
        assert!(matches!(
            fields().render("close }"),
            Err(TemplateError::UnmatchedBrace { brace: '}', offset: 6 })
        ));
    }

    proptest! {
        #[test]
        fn text_without_braces_is_unchanged(text in "[^{}]{0,200}") {
            prop_assert_eq!(render_format(&text, &BTreeMap::new()).unwrap(), text);
        }

        #[test]
        fn escaped_braces_roundtrip(text in "[^{}]{0,50}") {
            let template = format!("{{{{{text}}}}}");
            prop_assert_eq!(render_format(&template, &BTreeMap::new()).unwrap(), format!("{{{text}}}"));
        }
    }
}
