//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `KINDER_SERVER__PORT=8080`
/// - `KINDER_GENERATION__FUNCTION_NAME=pi-openai`
/// - `KINDER_STORAGE__BUCKET=pi-executions`
/// - `KINDER_STORAGE__STAGING_FOLDER=internal`
/// - `KINDER_STORAGE__RESULTS_FOLDER=results`
/// - `KINDER_CALLBACK__URL=https://example.com/lambda-results`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 前缀: KINDER_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix("KINDER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    // 缺省字段由 serde default 补齐
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn require(value: &str, name: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!("{} cannot be empty", name)));
    }
    Ok(())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    require(&config.generation.url, "Generation URL")?;
    require(&config.generation.function_name, "Generation function name")?;
    require(&config.storage.bucket, "Bucket name")?;
    require(&config.storage.staging_folder, "Staging folder")?;
    require(&config.storage.results_folder, "Results folder")?;
    require(&config.callback.url, "Callback URL")?;

    if config.pipeline.max_segment_chars == 0 {
        return Err(ConfigError::ValidationError(
            "max_segment_chars must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Generation URL: {}", config.generation.url);
    tracing::info!("Generation Function: {}", config.generation.function_name);
    tracing::info!(
        "Services: story={}, speech={}, size={}",
        config.generation.story_service,
        config.generation.speech_service,
        config.generation.size
    );
    tracing::info!("Storage Backend: {:?}", config.storage.backend);
    tracing::info!("Storage Root: {:?}", config.storage.root_dir);
    tracing::info!(
        "Bucket: {} (staging={}, results={})",
        config.storage.bucket,
        config.storage.staging_folder,
        config.storage.results_folder
    );
    tracing::info!("Callback URL: {}", config.callback.url);
    tracing::info!("Max Segment Chars: {}", config.pipeline.max_segment_chars);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
