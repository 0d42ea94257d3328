//! Pipeline 配置与阶段定义

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DEFAULT_MAX_CHARS;

/// 编排者配置，构造时显式传入
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 结果所在的存储桶
    pub bucket: String,
    /// 结果区目录
    pub results_folder: String,
    /// 故事生成服务标识
    pub story_service: String,
    /// 语音合成服务标识
    pub speech_service: String,
    /// 规格提示
    pub size: String,
    /// 单段最大字符数
    pub max_segment_chars: usize,
    /// 是否在结果区写入 result.json
    pub write_manifest: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucket: "kinder-executions".to_string(),
            results_folder: "results".to_string(),
            story_service: "chat-gpt-4o-mini".to_string(),
            speech_service: "text_to_speech-tts-1".to_string(),
            size: "2x".to_string(),
            max_segment_chars: DEFAULT_MAX_CHARS,
            write_manifest: true,
        }
    }
}

impl PipelineConfig {
    /// 结果清单的对象键
    pub fn manifest_key(&self, execution_id: &str) -> String {
        format!("{}/{}/result.json", self.results_folder, execution_id)
    }
}

/// 流水线阶段
///
/// Generating → Segmenting → Synthesizing ⇄ Staging → Reporting → Done，
/// 前四个阶段任一失败进入 Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Generating,
    Segmenting,
    Synthesizing,
    Staging,
    Reporting,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Generating => "generating",
            PipelineStage::Segmenting => "segmenting",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Staging => "staging",
            PipelineStage::Reporting => "reporting",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }

    /// 失败回报消息的前缀
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            PipelineStage::Generating => "Error generating story",
            _ => "Error generating audio",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 写入结果区的清单
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub execution_id: String,
    pub story: String,
    pub audio_urls: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
