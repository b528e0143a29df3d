//! The `submission_metadata.json` document stored beside the responses.

use cprobe_core::SystemInfo;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Name of the metadata entry inside every submission archive.
pub const METADATA_FILE_NAME: &str = "submission_metadata.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub submission_id: String,
    /// ISO-8601 local time of the run.
    pub timestamp: String,
    pub num_responses: usize,
    pub response_files: Vec<String>,
    /// Serialized as `{}` when system info collection is disabled.
    #[serde(
        serialize_with = "serialize_system_info",
        deserialize_with = "deserialize_system_info",
        default
    )]
    pub system_info: Option<SystemInfo>,
    /// The configuration the submission was produced with.
    pub config: Value,
}

impl SubmissionMetadata {
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn serialize_system_info<S: Serializer>(info: &Option<SystemInfo>, s: S) -> Result<S::Ok, S::Error> {
    match info {
        Some(info) => info.serialize(s),
        None => serde_json::Map::new().serialize(s),
    }
}

fn deserialize_system_info<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SystemInfo>, D::Error> {
    let value = Value::deserialize(d)?;
    match &value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom),
    }
}
