use super::types::{ArtifactMetadata, SavedArtifact};
use crate::{Error, Result, config::StorageConfig, media::GeneratedMedia};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Writes generated files, each with a `.json` sidecar of its generation parameters.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_dir: Option<PathBuf>,
}

impl ArtifactStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            output_dir: config.output_dir().map(PathBuf::from),
        }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { output_dir: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.output_dir.is_some()
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Saves `media` as `<prefix>_<uuid>.<ext>`. Returns `None` when the store is disabled.
    pub async fn save(
        &self,
        prefix: &str,
        media: &GeneratedMedia,
        model: Option<&str>,
        parameters: Value,
    ) -> Result<Option<SavedArtifact>> {
        let Some(dir) = &self.output_dir else {
            debug!("Artifact storage is not configured. Skipping save of {}", prefix);
            return Ok(None);
        };

        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            Error::storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let file_name = format!("{}_{}.{}", prefix, Uuid::new_v4(), media.format.extension());
        let path = dir.join(&file_name);
        let metadata_path = dir.join(format!("{}.json", file_name));

        tokio::fs::write(&path, &media.data).await.map_err(|e| {
            Error::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        let metadata = ArtifactMetadata::new(
            model,
            media.format.mime_type(),
            media.data.len(),
            parameters,
        );
        let metadata_json = serde_json::to_string_pretty(&metadata)?;
        tokio::fs::write(&metadata_path, metadata_json)
            .await
            .map_err(|e| {
                Error::storage(format!("Failed to write {}: {}", metadata_path.display(), e))
            })?;

        info!("Saved artifact to {}", path.display());
        Ok(Some(SavedArtifact {
            path,
            metadata_path,
        }))
    }
}
