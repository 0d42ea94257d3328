//! Artifact Stager Port - 音频产物转存抽象
//!
//! 两种实现：暂存区搬运（Relocate）与远程下载后写入（FetchAndStore），
//! 由语音结果的变体决定使用哪一种

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::StagedArtifact;

/// 转存错误
#[derive(Debug, Error)]
pub enum StagingError {
    /// 源对象缺失或不可读
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// 远程下载失败或返回非 2xx
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// 目标写入失败
    #[error("Write error: {0}")]
    Write(String),
}

/// 转存来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// 暂存区中的文件名
    Staged { file_name: String },
    /// 远程 URL
    Remote { url: String },
}

/// 转存请求
#[derive(Debug, Clone)]
pub struct StageRequest {
    pub execution_id: String,
    /// 片段序号（从 1 开始）
    pub part: usize,
    pub source: ArtifactSource,
}

impl StageRequest {
    /// 源文件名或 URL 路径中的扩展名，缺省为 mp3
    pub fn extension(&self) -> String {
        let name = match &self.source {
            ArtifactSource::Staged { file_name } => file_name.as_str(),
            ArtifactSource::Remote { url } => {
                let without_query = url.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
                let after_scheme = without_query
                    .split_once("://")
                    .map_or(without_query, |(_, rest)| rest);
                // 跳过主机名，只看路径的最后一节
                after_scheme
                    .split_once('/')
                    .map_or("", |(_, path)| path.rsplit('/').next().unwrap_or_default())
            }
        };
        name.rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "mp3".to_string())
    }

    /// 结果区对象名：`audio_part_<n>.<ext>`
    pub fn result_file_name(&self) -> String {
        format!("audio_part_{}.{}", self.part, self.extension())
    }
}

/// Artifact Stager Port
#[async_trait]
pub trait ArtifactStagerPort: Send + Sync {
    /// 策略名（用于日志）
    fn strategy(&self) -> &'static str;

    /// 将产物写入结果区并返回其位置
    async fn stage(&self, request: &StageRequest) -> Result<StagedArtifact, StagingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(source: ArtifactSource) -> StageRequest {
        StageRequest {
            execution_id: "e".to_string(),
            part: 3,
            source,
        }
    }

    #[test]
    fn test_extension_from_file_name() {
        let req = request(ArtifactSource::Staged {
            file_name: "speech_123.WAV".to_string(),
        });
        assert_eq!(req.result_file_name(), "audio_part_3.wav");
    }

    #[test]
    fn test_extension_from_url_ignores_query() {
        let req = request(ArtifactSource::Remote {
            url: "https://cdn.example.com/a/b/clip.opus?sig=abc.def".to_string(),
        });
        assert_eq!(req.extension(), "opus");
    }

    #[test]
    fn test_extension_defaults_to_mp3() {
        let req = request(ArtifactSource::Remote {
            url: "https://cdn.example.com/audio".to_string(),
        });
        assert_eq!(req.extension(), "mp3");
        let req = request(ArtifactSource::Staged {
            file_name: "noext".to_string(),
        });
        assert_eq!(req.result_file_name(), "audio_part_3.mp3");
    }
}
