//! Storage Adapters

mod file_artifact_store;

pub use file_artifact_store::FileArtifactStore;
