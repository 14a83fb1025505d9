use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Sidecar written next to every saved artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub model: Option<String>,
    pub mime_type: String,
    pub size_bytes: usize,
    pub parameters: Value,
}

impl ArtifactMetadata {
    pub fn new(model: Option<&str>, mime_type: &str, size_bytes: usize, parameters: Value) -> Self {
        Self {
            created_at: Utc::now(),
            model: model.map(str::to_string),
            mime_type: mime_type.to_string(),
            size_bytes,
            parameters: strip_nulls(parameters),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub metadata_path: PathBuf,
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect(),
        ),
        other => other,
    }
}
