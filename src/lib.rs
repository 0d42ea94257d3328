//! Kinder Stories - 儿童故事与有声片段生成服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Run: 一次执行的标识、输入与终态结果
//! - Text Segmenter: 故事文本分段
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Generation, BlobStore, ArtifactStager, ResultReporter）
//! - Orchestrator: 生成 → 分段 → 合成 → 转存 → 回报
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: 内存对象存储
//! - Adapters: 生成函数客户端、转存策略、对象存储、回调客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
