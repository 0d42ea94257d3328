//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::PipelineConfig;
use crate::domain::DEFAULT_MAX_CHARS;
use crate::infrastructure::adapters::StagerConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 生成函数配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 对象存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 回调配置
    #[serde(default)]
    pub callback: CallbackConfig,

    /// 流水线配置
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 编排者配置
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            bucket: self.storage.bucket.clone(),
            results_folder: self.storage.results_folder.clone(),
            story_service: self.generation.story_service.clone(),
            speech_service: self.generation.speech_service.clone(),
            size: self.generation.size.clone(),
            max_segment_chars: self.pipeline.max_segment_chars,
            write_manifest: self.pipeline.write_manifest,
        }
    }

    /// 转存配置
    pub fn stager_config(&self) -> StagerConfig {
        StagerConfig {
            bucket: self.storage.bucket.clone(),
            staging_folder: self.storage.staging_folder.clone(),
            results_folder: self.storage.results_folder.clone(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 生成函数配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 函数调用服务基础 URL
    #[serde(default = "default_generation_url")]
    pub url: String,

    /// 生成函数名
    #[serde(default = "default_function_name")]
    pub function_name: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,

    /// 故事生成服务标识
    #[serde(default = "default_story_service")]
    pub story_service: String,

    /// 语音合成服务标识
    #[serde(default = "default_speech_service")]
    pub speech_service: String,

    /// 规格提示
    #[serde(default = "default_size")]
    pub size: String,
}

fn default_generation_url() -> String {
    "http://localhost:9001".to_string()
}

fn default_function_name() -> String {
    "openai-generation".to_string()
}

fn default_generation_timeout() -> u64 {
    300
}

fn default_story_service() -> String {
    "chat-gpt-4o-mini".to_string()
}

fn default_speech_service() -> String {
    "text_to_speech-tts-1".to_string()
}

fn default_size() -> String {
    "2x".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            url: default_generation_url(),
            function_name: default_function_name(),
            timeout_secs: default_generation_timeout(),
            story_service: default_story_service(),
            speech_service: default_speech_service(),
            size: default_size(),
        }
    }
}

/// 对象存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 本地文件系统
    #[default]
    File,
    /// 进程内存（重启即丢失）
    Memory,
}

/// 对象存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// 文件后端的根目录
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// 存储桶
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// 暂存区目录
    #[serde(default = "default_staging_folder")]
    pub staging_folder: String,

    /// 结果区目录
    #[serde(default = "default_results_folder")]
    pub results_folder: String,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 https://{bucket}.s3.amazonaws.com
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// 远程音频下载超时（秒）
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("data/blobs")
}

fn default_bucket() -> String {
    "kinder-executions".to_string()
}

fn default_staging_folder() -> String {
    "internal".to_string()
}

fn default_results_folder() -> String {
    "results".to_string()
}

fn default_fetch_timeout() -> u64 {
    120
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root_dir: default_root_dir(),
            bucket: default_bucket(),
            staging_folder: default_staging_folder(),
            results_folder: default_results_folder(),
            public_base_url: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

/// 回调配置
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackConfig {
    /// 回调端点
    #[serde(default = "default_callback_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_callback_timeout")]
    pub timeout_secs: u64,
}

fn default_callback_url() -> String {
    "http://localhost:8080/wp-json/product-extension/v1/lambda-results".to_string()
}

fn default_callback_timeout() -> u64 {
    30
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            url: default_callback_url(),
            timeout_secs: default_callback_timeout(),
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 单段最大字符数
    #[serde(default = "default_max_segment_chars")]
    pub max_segment_chars: usize,

    /// 是否写入 result.json
    #[serde(default = "default_write_manifest")]
    pub write_manifest: bool,
}

fn default_max_segment_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_write_manifest() -> bool {
    true
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_segment_chars: default_max_segment_chars(),
            write_manifest: default_write_manifest(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
