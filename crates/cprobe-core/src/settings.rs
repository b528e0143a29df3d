//! # Submission Settings: Typed View of `submission_settings`
//!
//! The configuration file is kept as a raw nested value so every section can
//! be copied verbatim into the submission metadata. The packager reads the
//! section it cares about through these typed structs instead of walking
//! string keys.
//!
//! Fields absent from the file fall back to `#[serde(default = ...)]`
//! helpers, so a minimal config containing only `directories` still
//! produces a complete submission. [`SubmissionSettings::from_value`] goes
//! one step further and defaults each mistyped value on its own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder substituted for the participant's name in the email template.
pub const DEFAULT_PARTICIPANT_PLACEHOLDER: &str = "[Your Name]";

/// Settings controlling what a submission contains and how it is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSettings {
    #[serde(default)]
    pub submission_format: SubmissionFormat,
    #[serde(default)]
    pub security: SecuritySettings,
    #[serde(default)]
    pub pdf_settings: PdfSettings,
    #[serde(default)]
    pub metadata: StudyMetadata,
    /// Address participants send the finished PDF to.
    #[serde(default)]
    pub receiver_email: Option<String>,
    #[serde(default = "default_participant_placeholder")]
    pub participant_placeholder: String,
}

/// Toggles for optional submission content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionFormat {
    /// Embed an OS / machine snapshot in the metadata document.
    #[serde(default = "default_true")]
    pub include_system_info: bool,
    /// Draw a QR code with the identifier and checksum on the cover page.
    #[serde(default = "default_true")]
    pub generate_qr: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySettings {
    /// Compute a SHA-256 digest of the finished archive.
    #[serde(default = "default_true")]
    pub generate_checksum: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfSettings {
    /// Diagonal watermark text. Absent or empty disables the watermark.
    #[serde(default)]
    pub watermark: Option<String>,
    #[serde(default = "default_true")]
    pub include_cover_page: bool,
}

/// Study facts printed on the cover page and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMetadata {
    #[serde(default = "default_research_project")]
    pub research_project: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default = "default_data_handling_notice")]
    pub data_handling_notice: String,
}

impl SubmissionSettings {
    /// Read settings from a raw `submission_settings` node, value by value.
    ///
    /// A value that is missing or has the wrong type takes its default
    /// without affecting the others. A `watermark` that is not a string
    /// (`false`, `~`) means no watermark.
    pub fn from_value(node: &Value) -> Self {
        let defaults = Self::default();
        Self {
            submission_format: SubmissionFormat {
                include_system_info: leaf(
                    node,
                    &["submission_format", "include_system_info"],
                    defaults.submission_format.include_system_info,
                ),
                generate_qr: leaf(
                    node,
                    &["submission_format", "generate_qr"],
                    defaults.submission_format.generate_qr,
                ),
            },
            security: SecuritySettings {
                generate_checksum: leaf(
                    node,
                    &["security", "generate_checksum"],
                    defaults.security.generate_checksum,
                ),
            },
            pdf_settings: PdfSettings {
                watermark: watermark(node),
                include_cover_page: leaf(
                    node,
                    &["pdf_settings", "include_cover_page"],
                    defaults.pdf_settings.include_cover_page,
                ),
            },
            metadata: StudyMetadata {
                research_project: leaf(
                    node,
                    &["metadata", "research_project"],
                    defaults.metadata.research_project,
                ),
                institution: leaf(node, &["metadata", "institution"], defaults.metadata.institution),
                contact_info: leaf(node, &["metadata", "contact_info"], defaults.metadata.contact_info),
                data_handling_notice: leaf(
                    node,
                    &["metadata", "data_handling_notice"],
                    defaults.metadata.data_handling_notice,
                ),
            },
            receiver_email: leaf(node, &["receiver_email"], defaults.receiver_email),
            participant_placeholder: leaf(
                node,
                &["participant_placeholder"],
                defaults.participant_placeholder,
            ),
        }
    }
}

fn leaf<T: DeserializeOwned>(node: &Value, keys: &[&str], default: T) -> T {
    let Some(value) = keys.iter().try_fold(node, |n, key| n.get(*key)) else {
        return default;
    };
    match serde_json::from_value(value.clone()) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(
                setting = %format!("submission_settings.{}", keys.join(".")),
                error = %e,
                "invalid setting; using default"
            );
            default
        }
    }
}

fn watermark(node: &Value) -> Option<String> {
    match node.get("pdf_settings").and_then(|pdf| pdf.get("watermark")) {
        Some(Value::String(text)) => Some(text.clone()),
        None | Some(Value::Null) | Some(Value::Bool(_)) => None,
        Some(other) => {
            tracing::warn!(value = %other, "watermark is not text; drawing none");
            None
        }
    }
}

impl PdfSettings {
    /// The watermark text, if one should be drawn.
    pub fn watermark_text(&self) -> Option<&str> {
        self.watermark.as_deref().filter(|w| !w.trim().is_empty())
    }
}

fn default_true() -> bool {
    true
}
fn default_participant_placeholder() -> String {
    DEFAULT_PARTICIPANT_PLACEHOLDER.to_string()
}
fn default_research_project() -> String {
    "Cultural Probe Study".to_string()
}
fn default_data_handling_notice() -> String {
    "Your responses are stored securely and used for research purposes only.".to_string()
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            submission_format: SubmissionFormat::default(),
            security: SecuritySettings::default(),
            pdf_settings: PdfSettings::default(),
            metadata: StudyMetadata::default(),
            receiver_email: None,
            participant_placeholder: default_participant_placeholder(),
        }
    }
}

impl Default for SubmissionFormat {
    fn default() -> Self {
        Self {
            include_system_info: default_true(),
            generate_qr: default_true(),
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            generate_checksum: default_true(),
        }
    }
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            watermark: None,
            include_cover_page: default_true(),
        }
    }
}

impl Default for StudyMetadata {
    fn default() -> Self {
        Self {
            research_project: default_research_project(),
            institution: String::new(),
            contact_info: String::new(),
            data_handling_notice: default_data_handling_notice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_yields_defaults() {
        let s: SubmissionSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(s, SubmissionSettings::default());
        assert!(s.security.generate_checksum);
        assert!(s.pdf_settings.include_cover_page);
        assert_eq!(s.participant_placeholder, "[Your Name]");
    }

    #[test]
    fn partial_section_keeps_explicit_values() {
        let yaml = r#"
submission_format:
  generate_qr: false
security:
  generate_checksum: false
pdf_settings:
  watermark: "CONFIDENTIAL"
metadata:
  institution: "Munich University of Applied Sciences"
receiver_email: "probes@example.org"
"#;
        let s: SubmissionSettings = serde_yaml::from_str(yaml).unwrap();
        assert!(!s.submission_format.generate_qr);
        assert!(s.submission_format.include_system_info);
        assert!(!s.security.generate_checksum);
        assert_eq!(s.pdf_settings.watermark_text(), Some("CONFIDENTIAL"));
        assert_eq!(s.metadata.institution, "Munich University of Applied Sciences");
        assert_eq!(s.metadata.research_project, "Cultural Probe Study");
        assert_eq!(s.receiver_email.as_deref(), Some("probes@example.org"));
    }

    #[test]
    fn from_value_defaults_only_the_bad_values() {
        let node: Value = serde_yaml::from_str(
            r#"
submission_format:
  include_system_info: false
security:
  generate_checksum: false
pdf_settings:
  watermark: false
  include_cover_page: "no"
metadata:
  institution: "Uni X"
  contact_info: 42
receiver_email: "a@b.c"
"#,
        )
        .unwrap();
        let s = SubmissionSettings::from_value(&node);

        assert!(!s.submission_format.include_system_info);
        assert!(s.submission_format.generate_qr);
        assert!(!s.security.generate_checksum);
        assert_eq!(s.pdf_settings.watermark, None);
        assert!(s.pdf_settings.include_cover_page);
        assert_eq!(s.metadata.institution, "Uni X");
        assert_eq!(s.metadata.contact_info, "");
        assert_eq!(s.receiver_email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn from_value_matches_serde_for_well_typed_input() {
        let yaml = "pdf_settings:\n  watermark: DRAFT\nmetadata:\n  research_project: Flows\nparticipant_placeholder: P7\n";
        let node: Value = serde_yaml::from_str(yaml).unwrap();
        let typed: SubmissionSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(SubmissionSettings::from_value(&node), typed);
        assert_eq!(SubmissionSettings::from_value(&Value::Null), SubmissionSettings::default());
    }

    #[test]
    fn blank_watermark_is_disabled() {
        let pdf = PdfSettings {
            watermark: Some("   ".into()),
            include_cover_page: true,
        };
        assert_eq!(pdf.watermark_text(), None);
    }
}
