//! In-Memory Blob Store Implementation

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{BlobStoreError, BlobStorePort};
use crate::infrastructure::adapters::storage::public_object_url;

/// 存储的对象
#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: Option<String>,
}

/// 内存对象存储
pub struct InMemoryBlobStore {
    /// (bucket, key) -> object
    objects: DashMap<(String, String), StoredObject>,
    public_base_url: Option<String>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            public_base_url: None,
        }
    }

    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = Some(base_url.into());
        self
    }

    /// 直接放入对象（不经过 Port）
    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data: data.into(),
                content_type: None,
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|entry| entry.data.clone())
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .and_then(|entry| entry.content_type.clone())
    }

    /// 桶内所有 key（已排序）
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().0 == bucket)
            .map(|entry| entry.key().1.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStorePort for InMemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.object(bucket, key).ok_or_else(|| BlobStoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BlobStoreError> {
        tracing::debug!(bucket = %bucket, key = %key, size = data.len(), "Stored object in memory");
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        public_object_url(self.public_base_url.as_deref(), bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryBlobStore::new();
        store
            .put("b", "results/e/audio_part_1.mp3", b"mp3".to_vec(), Some("audio/mpeg"))
            .await
            .unwrap();

        assert_eq!(store.get("b", "results/e/audio_part_1.mp3").await.unwrap(), b"mp3");
        assert_eq!(
            store.content_type("b", "results/e/audio_part_1.mp3").as_deref(),
            Some("audio/mpeg")
        );
        assert_eq!(store.keys("b"), vec!["results/e/audio_part_1.mp3".to_string()]);
        assert!(store.keys("other").is_empty());
    }

    #[tokio::test]
    async fn test_missing_object() {
        let store = InMemoryBlobStore::new();
        let err = store.get("b", "nope").await.unwrap_err();
        assert!(matches!(err, BlobStoreError::NotFound { .. }));
    }

    #[test]
    fn test_public_url() {
        let store = InMemoryBlobStore::new();
        assert_eq!(
            store.public_url("bucket", "results/e/a.mp3"),
            "https://bucket.s3.amazonaws.com/results/e/a.mp3"
        );
        let store = InMemoryBlobStore::new().with_public_base_url("http://localhost:9000/files/");
        assert_eq!(
            store.public_url("bucket", "k"),
            "http://localhost:9000/files/k"
        );
    }
}
