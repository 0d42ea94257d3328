//! Generation Port - 文本/语音生成能力抽象
//!
//! 外部生成服务同时承担故事文本生成与语音合成，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Run;

/// 生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 服务不可达或返回非成功状态
    #[error("Backend error: {0}")]
    Backend(String),

    /// 响应结构与请求的变体不匹配
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// 请求变体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationKind {
    /// 文本生成（故事）
    Text { prompt: String },
    /// 语音合成（单个片段）
    Speech { input_text: String },
}

/// 生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub execution_id: String,
    pub user_id: i64,
    pub product_id: i64,
    /// 仅语音请求携带
    pub vendor_id: Option<String>,
    /// 服务标识，如 `chat-gpt-4o-mini` / `text_to_speech-tts-1`
    pub service: String,
    /// 规格提示，如 `2x`
    pub size: String,
    pub kind: GenerationKind,
}

impl GenerationRequest {
    /// 故事文本请求
    pub fn story(run: &Run, prompt: String, service: &str, size: &str) -> Self {
        Self {
            execution_id: run.execution_id.clone(),
            user_id: run.user_id,
            product_id: run.product_id,
            vendor_id: None,
            service: service.to_string(),
            size: size.to_string(),
            kind: GenerationKind::Text { prompt },
        }
    }

    /// 片段语音请求
    pub fn speech(run: &Run, input_text: String, service: &str, size: &str) -> Self {
        Self {
            execution_id: run.execution_id.clone(),
            user_id: run.user_id,
            product_id: run.product_id,
            vendor_id: Some(run.vendor_id.clone()),
            service: service.to_string(),
            size: size.to_string(),
            kind: GenerationKind::Speech { input_text },
        }
    }
}

/// 合成语音产物的引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechArtifact {
    /// 远程可下载的 URL 列表（`body.data[].url`）
    Hosted { urls: Vec<String> },
    /// 已写入暂存区的文件（`body.file_name`）
    Staged { file_name: String },
}

/// 生成结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Text(String),
    Speech(SpeechArtifact),
}

impl GenerationResult {
    /// 取出文本，变体不符时视为响应结构错误
    pub fn into_text(self) -> Result<String, GenerationError> {
        match self {
            GenerationResult::Text(text) => Ok(text),
            GenerationResult::Speech(_) => Err(GenerationError::MalformedResponse(
                "expected text content, got speech artifact".to_string(),
            )),
        }
    }

    /// 取出语音产物，变体不符时视为响应结构错误
    pub fn into_speech(self) -> Result<SpeechArtifact, GenerationError> {
        match self {
            GenerationResult::Speech(artifact) => Ok(artifact),
            GenerationResult::Text(_) => Err(GenerationError::MalformedResponse(
                "expected speech artifact, got text content".to_string(),
            )),
        }
    }
}

/// Generation Port
///
/// 同步调用（从编排者视角），不重试
#[async_trait]
pub trait GenerationPort: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, GenerationError>;
}
