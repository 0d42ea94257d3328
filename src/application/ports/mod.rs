//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_stager;
mod blob_store;
mod generation;
mod result_reporter;

pub use artifact_stager::{ArtifactSource, ArtifactStagerPort, StageRequest, StagingError};
pub use blob_store::{content_type_for, BlobStoreError, BlobStorePort};
pub use generation::{
    GenerationError, GenerationKind, GenerationPort, GenerationRequest, GenerationResult,
    SpeechArtifact,
};
pub use result_reporter::{ReportError, ResultReporterPort, RunReport};
