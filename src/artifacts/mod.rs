mod storage;
mod types;

pub use storage::ArtifactStore;
pub use types::{ArtifactMetadata, SavedArtifact};
