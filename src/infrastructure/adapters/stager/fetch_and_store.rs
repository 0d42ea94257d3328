//! Fetching Stager - 远程下载后写入结果区

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    content_type_for, ArtifactSource, ArtifactStagerPort, BlobStorePort, StageRequest,
    StagingError,
};
use crate::domain::StagedArtifact;

use super::StagerConfig;

/// 默认下载超时（秒）
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;

pub struct FetchingStager {
    client: Client,
    blob_store: Arc<dyn BlobStorePort>,
    config: StagerConfig,
}

impl FetchingStager {
    pub fn new(blob_store: Arc<dyn BlobStorePort>, config: StagerConfig) -> Result<Self, StagingError> {
        Self::with_timeout(blob_store, config, DEFAULT_FETCH_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        blob_store: Arc<dyn BlobStorePort>,
        config: StagerConfig,
        timeout_secs: u64,
    ) -> Result<Self, StagingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StagingError::Fetch(e.to_string()))?;

        Ok(Self {
            client,
            blob_store,
            config,
        })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StagingError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StagingError::Fetch(format!("failed to download {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StagingError::Fetch(format!(
                "failed to download {}: HTTP {}",
                url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StagingError::Fetch(format!("failed to read body of {}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ArtifactStagerPort for FetchingStager {
    fn strategy(&self) -> &'static str {
        "fetch_and_store"
    }

    async fn stage(&self, request: &StageRequest) -> Result<StagedArtifact, StagingError> {
        let url = match &request.source {
            ArtifactSource::Remote { url } => url,
            ArtifactSource::Staged { file_name } => {
                return Err(StagingError::Fetch(format!(
                    "fetch expects a remote url, got staged file {}",
                    file_name
                )))
            }
        };

        tracing::debug!(url = %url, part = request.part, "Downloading audio");
        let data = self.fetch(url).await?;

        let bucket = &self.config.bucket;
        let key = self.config.result_key(request);
        let size = data.len();
        self.blob_store
            .put(bucket, &key, data, Some(content_type_for(&key)))
            .await
            .map_err(|e| StagingError::Write(format!("failed to write {}/{}: {}", bucket, key, e)))?;

        tracing::debug!(url = %url, key = %key, size, "Stored downloaded audio");

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
    use axum::{http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn remote_request(part: usize, url: String) -> StageRequest {
        StageRequest {
            execution_id: "exec-3".to_string(),
            part,
            source: ArtifactSource::Remote { url },
        }
    }

    #[tokio::test]
    async fn test_fetch_and_store() {
        let base = serve(Router::new().route("/audio/clip.wav", get(|| async { b"RIFFwave".to_vec() }))).await;
        let store = Arc::new(InMemoryBlobStore::new());
        let stager = FetchingStager::new(store.clone(), StagerConfig::default()).unwrap();

        let staged = stager
            .stage(&remote_request(1, format!("{}/audio/clip.wav", base)))
            .await
            .unwrap();

        assert_eq!(staged.key, "results/exec-3/audio_part_1.wav");
        assert_eq!(store.object("kinder-executions", &staged.key).unwrap(), b"RIFFwave");
        assert_eq!(
            store.content_type("kinder-executions", &staged.key).as_deref(),
            Some("audio/wav")
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let base = serve(Router::new().route("/gone.mp3", get(|| async { StatusCode::NOT_FOUND }))).await;
        let store = Arc::new(InMemoryBlobStore::new());
        let stager = FetchingStager::new(store.clone(), StagerConfig::default()).unwrap();

        let err = stager
            .stage(&remote_request(1, format!("{}/gone.mp3", base)))
            .await
            .unwrap_err();
        match err {
            StagingError::Fetch(msg) => assert!(msg.contains("404")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_url_is_fetch_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let stager = FetchingStager::with_timeout(
            Arc::new(InMemoryBlobStore::new()),
            StagerConfig::default(),
            5,
        )
        .unwrap();
        let err = stager
            .stage(&remote_request(1, format!("http://{}/a.mp3", addr)))
            .await
            .unwrap_err();
        assert!(matches!(err, StagingError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_staged_source_rejected() {
        let stager = FetchingStager::new(Arc::new(InMemoryBlobStore::new()), StagerConfig::default()).unwrap();
        let request = StageRequest {
            execution_id: "exec-3".to_string(),
            part: 1,
            source: ArtifactSource::Staged {
                file_name: "a.mp3".to_string(),
            },
        };
        assert!(matches!(
            stager.stage(&request).await.unwrap_err(),
            StagingError::Fetch(_)
        ));
    }
}
