//! File Blob Store - 文件系统对象存储实现
//!
//! 实现 BlobStorePort trait，对象位于 `<root_dir>/<bucket>/<key>`

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::application::ports::{BlobStoreError, BlobStorePort};

use super::public_object_url;

/// 文件系统对象存储
pub struct FileBlobStore {
    /// 存储根目录
    root_dir: PathBuf,
    /// 公开访问的 Base URL
    public_base_url: Option<String>,
}

impl FileBlobStore {
    /// 创建新的文件存储
    pub async fn new(
        root_dir: impl AsRef<Path>,
        public_base_url: Option<String>,
    ) -> Result<Self, BlobStoreError> {
        let root_dir = root_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&root_dir)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

        Ok(Self {
            root_dir,
            public_base_url,
        })
    }

    /// 对象路径，拒绝绝对路径与 `..`
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, BlobStoreError> {
        let relative = Path::new(bucket).join(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if bucket.is_empty() || key.is_empty() || escapes {
            return Err(BlobStoreError::IoError(format!(
                "Invalid object location: {}/{}",
                bucket, key
            )));
        }
        Ok(self.root_dir.join(relative))
    }
}

#[async_trait]
impl BlobStorePort for FileBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobStoreError> {
        let path = self.object_path(bucket, key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BlobStoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(BlobStoreError::IoError(e.to_string())),
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BlobStoreError> {
        let path = self.object_path(bucket, key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobStoreError::IoError(e.to_string()))?;
        }

        let size = data.len();
        fs::write(&path, data)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved object: bucket={}, key={}, size={} bytes, content_type={:?}",
            bucket,
            key,
            size,
            content_type
        );

        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        public_object_url(self.public_base_url.as_deref(), bucket, key)
    }
}
