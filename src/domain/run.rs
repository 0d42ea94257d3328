//! Run Context - 一次故事生成执行
//!
//! Run 由调用方提供的 execution_id 唯一标识，整个生命周期内不可变，
//! 本系统不负责持久化。

use serde::{Deserialize, Serialize};

/// 成功完成时回报的固定消息
pub const SUCCESS_MESSAGE: &str = "The story and audio parts are ready and have been uploaded to S3.";

/// 用户自定义输入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomInputs {
    /// 希望故事传达的行为（如 "sharing"）
    #[serde(default)]
    pub behavior: String,
    /// 孩子喜欢的主题（如 "dinosaurs"）
    #[serde(default)]
    pub favorite_theme: String,
}

/// 一次执行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub execution_id: String,
    pub user_id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub vendor_id: String,
    /// 回调时原样透传的令牌
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub custom_inputs: CustomInputs,
}

impl Run {
    /// 构造故事生成提示词
    pub fn story_prompt(&self) -> String {
        format!(
            "Create a very short story for kids under 8 about {} with a theme of {}.",
            self.custom_inputs.behavior, self.custom_inputs.favorite_theme
        )
    }
}

/// 终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Successful,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Successful => "successful",
            RunStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结果区中的音频产物
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedArtifact {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

/// 一次执行的终态结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub story: String,
    pub audio_urls: Vec<String>,
    pub status: RunStatus,
    pub message: String,
}

impl RunResult {
    pub fn successful(story: String, audio_urls: Vec<String>) -> Self {
        Self {
            story,
            audio_urls,
            status: RunStatus::Successful,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run() -> Run {
        Run {
            execution_id: "exec-1".to_string(),
            user_id: 7,
            product_id: 42,
            vendor_id: "vendor".to_string(),
            token: "opaque".to_string(),
            custom_inputs: CustomInputs {
                behavior: "sharing".to_string(),
                favorite_theme: "dinosaurs".to_string(),
            },
        }
    }

    #[test]
    fn test_story_prompt() {
        assert_eq!(
            sample_run().story_prompt(),
            "Create a very short story for kids under 8 about sharing with a theme of dinosaurs."
        );
    }

    #[test]
    fn test_run_deserialize_without_optional_fields() {
        let json = r#"{"execution_id":"e","user_id":1,"product_id":2}"#;
        let run: Run = serde_json::from_str(json).unwrap();
        assert_eq!(run.execution_id, "e");
        assert!(run.token.is_empty());
        assert_eq!(run.custom_inputs, CustomInputs::default());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&RunStatus::Failed).unwrap(), "\"failed\"");
        assert_eq!(RunStatus::Successful.to_string(), "successful");
    }
}
