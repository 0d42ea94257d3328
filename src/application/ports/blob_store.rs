//! Blob Store Port - 对象存储抽象
//!
//! 按 (bucket, key) 读写字节

use async_trait::async_trait;
use thiserror::Error;

/// 对象存储错误
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// 由文件扩展名推断 Content-Type
pub fn content_type_for(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "opus" | "ogg" => "audio/ogg",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Blob Store Port
#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// 读取对象，不存在时返回 `NotFound`
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobStoreError>;

    /// 写入对象（覆盖）
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BlobStoreError>;

    /// 对象的公开访问 URL
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
