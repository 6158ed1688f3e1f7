//! Worker Layer - Background Task Processing
//!
//! 实现 ArtifactGcWorker，定期回收过期产物

mod artifact_gc;

pub use artifact_gc::{ArtifactGcWorker, ArtifactGcWorkerConfig};
