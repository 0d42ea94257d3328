//! 应用层错误定义
//!
//! 流水线各阶段错误统一汇入 PipelineError

use thiserror::Error;

use crate::application::ports::{GenerationError, ReportError, StagingError};
use crate::domain::SegmentationError;

/// 流水线错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 生成服务不可达或返回非成功状态
    #[error("Backend error: {0}")]
    Backend(String),

    /// 生成服务响应结构不符合预期
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// 故事文本无法分段
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    /// 暂存区对象缺失或不可读
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// 远程音频下载失败
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// 结果区写入失败
    #[error("Write error: {0}")]
    Write(String),

    /// 回调被拒绝或不可达
    #[error("Report error: {0}")]
    Report(String),
}

impl PipelineError {
    /// 创建响应结构错误
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Backend(msg) => Self::Backend(msg),
            GenerationError::MalformedResponse(msg) => Self::MalformedResponse(msg),
        }
    }
}

impl From<StagingError> for PipelineError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::Transfer(msg) => Self::Transfer(msg),
            StagingError::Fetch(msg) => Self::Fetch(msg),
            StagingError::Write(msg) => Self::Write(msg),
        }
    }
}

impl From<ReportError> for PipelineError {
    fn from(err: ReportError) -> Self {
        Self::Report(err.to_string())
    }
}
