//! Domain Layer - 领域层
//!
//! - Run: 一次执行的标识、输入与终态结果
//! - 文本分割器: 将故事切分为可合成的片段

mod run;
mod text_segmenter;

pub use run::{CustomInputs, Run, RunResult, RunStatus, StagedArtifact, SUCCESS_MESSAGE};
pub use text_segmenter::{
    segment_text, SegmentationError, TextSegment, DEFAULT_MAX_CHARS,
};
