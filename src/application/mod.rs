//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Generation、BlobStore、ArtifactStager、ResultReporter）
//! - pipeline: 编排配置与阶段
//! - orchestrator: 故事流水线编排者
//! - error: 应用层错误定义

pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod ports;

pub use error::PipelineError;
pub use orchestrator::{RunStoryResponse, StoryOrchestrator};
pub use pipeline::{PipelineConfig, PipelineStage, RunManifest};

pub use ports::{
    // Artifact stager
    ArtifactSource,
    ArtifactStagerPort,
    StageRequest,
    StagingError,
    // Blob store
    content_type_for,
    BlobStoreError,
    BlobStorePort,
    // Generation
    GenerationError,
    GenerationKind,
    GenerationPort,
    GenerationRequest,
    GenerationResult,
    SpeechArtifact,
    // Result reporter
    ReportError,
    ResultReporterPort,
    RunReport,
};
