//! Relocating Stager - 暂存区搬运
//!
//! 生成服务把音频写入 `<staging>/<execution_id>/<file_name>`，
//! 这里原样复制到结果区。传输在内存中完成，不落本地临时文件。

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{
    content_type_for, ArtifactSource, ArtifactStagerPort, BlobStoreError, BlobStorePort,
    StageRequest, StagingError,
};
use crate::domain::StagedArtifact;

use super::StagerConfig;

pub struct RelocatingStager {
    blob_store: Arc<dyn BlobStorePort>,
    config: StagerConfig,
}

impl RelocatingStager {
    pub fn new(blob_store: Arc<dyn BlobStorePort>, config: StagerConfig) -> Self {
        Self { blob_store, config }
    }
}

#[async_trait]
impl ArtifactStagerPort for RelocatingStager {
    fn strategy(&self) -> &'static str {
        "relocate"
    }

    async fn stage(&self, request: &StageRequest) -> Result<StagedArtifact, StagingError> {
        let file_name = match &request.source {
            ArtifactSource::Staged { file_name } => file_name,
            ArtifactSource::Remote { url } => {
                return Err(StagingError::Transfer(format!(
                    "relocate expects a staged artifact, got remote url {}",
                    url
                )))
            }
        };

        let bucket = &self.config.bucket;
        let source_key = self.config.staging_key(&request.execution_id, file_name);
        tracing::debug!(bucket = %bucket, key = %source_key, "Reading staged audio");

        let data = self
            .blob_store
            .get(bucket, &source_key)
            .await
            .map_err(|e| match e {
                BlobStoreError::NotFound { .. } => {
                    StagingError::Transfer(format!("staged audio not found: {}/{}", bucket, source_key))
                }
                other => StagingError::Transfer(format!(
                    "failed to read {}/{}: {}",
                    bucket, source_key, other
                )),
            })?;

        let key = self.config.result_key(request);
        let size = data.len();
        self.blob_store
            .put(bucket, &key, data, Some(content_type_for(&key)))
            .await
            .map_err(|e| StagingError::Write(format!("failed to write {}/{}: {}", bucket, key, e)))?;

        tracing::debug!(from = %source_key, to = %key, size, "Relocated audio");

        Ok(StagedArtifact {
            bucket: bucket.clone(),
            url: self.blob_store.public_url(bucket, &key),
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryBlobStore;

    /// 读正常、写总失败的存储
    struct ReadOnlyStore(InMemoryBlobStore);

    #[async_trait]
    impl BlobStorePort for ReadOnlyStore {
        async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobStoreError> {
            self.0.get(bucket, key).await
        }

        async fn put(
            &self,
            _bucket: &str,
            _key: &str,
            _data: Vec<u8>,
            _content_type: Option<&str>,
        ) -> Result<(), BlobStoreError> {
            Err(BlobStoreError::IoError("read-only".to_string()))
        }

        fn public_url(&self, bucket: &str, key: &str) -> String {
            self.0.public_url(bucket, key)
        }
    }

    fn staged_request(part: usize, file_name: &str) -> StageRequest {
        StageRequest {
            execution_id: "exec-7".to_string(),
            part,
            source: ArtifactSource::Staged {
                file_name: file_name.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_relocate_copies_bytes_exactly() {
        let store = Arc::new(InMemoryBlobStore::new());
        let audio: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        store.insert("kinder-executions", "internal/exec-7/speech_x.mp3", audio.clone());

        let stager = RelocatingStager::new(store.clone(), StagerConfig::default());
        let staged = stager.stage(&staged_request(2, "speech_x.mp3")).await.unwrap();

        assert_eq!(staged.bucket, "kinder-executions");
        assert_eq!(staged.key, "results/exec-7/audio_part_2.mp3");
        assert_eq!(
            staged.url,
            "https://kinder-executions.s3.amazonaws.com/results/exec-7/audio_part_2.mp3"
        );
        assert_eq!(store.object("kinder-executions", &staged.key).unwrap(), audio);
        assert_eq!(
            store.content_type("kinder-executions", &staged.key).as_deref(),
            Some("audio/mpeg")
        );
        // 源对象保持不变
        assert!(store.object("kinder-executions", "internal/exec-7/speech_x.mp3").is_some());
    }

    #[tokio::test]
    async fn test_missing_source_is_transfer_error() {
        let store = Arc::new(InMemoryBlobStore::new());
        let stager = RelocatingStager::new(store.clone(), StagerConfig::default());

        let err = stager.stage(&staged_request(1, "missing.mp3")).await.unwrap_err();
        assert!(matches!(err, StagingError::Transfer(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_write_error() {
        let inner = InMemoryBlobStore::new();
        inner.insert("kinder-executions", "internal/exec-7/a.wav", b"wav".to_vec());
        let stager = RelocatingStager::new(Arc::new(ReadOnlyStore(inner)), StagerConfig::default());

        let err = stager.stage(&staged_request(1, "a.wav")).await.unwrap_err();
        assert!(matches!(err, StagingError::Write(_)));
    }

    #[tokio::test]
    async fn test_remote_source_rejected() {
        let stager = RelocatingStager::new(Arc::new(InMemoryBlobStore::new()), StagerConfig::default());
        let request = StageRequest {
            execution_id: "exec-7".to_string(),
            part: 1,
            source: ArtifactSource::Remote {
                url: "https://cdn/a.mp3".to_string(),
            },
        };
        assert!(matches!(
            stager.stage(&request).await.unwrap_err(),
            StagingError::Transfer(_)
        ));
    }
}
