//! Storage Adapter - 对象存储实现

mod file_blob_store;

pub use file_blob_store::FileBlobStore;

/// 拼接对象的公开 URL
///
/// 未配置 base URL 时使用 S3 虚拟主机风格：`https://<bucket>.s3.amazonaws.com/<key>`
pub fn public_object_url(base_url: Option<&str>, bucket: &str, key: &str) -> String {
    match base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
        None => format!("https://{}.s3.amazonaws.com/{}", bucket, key),
    }
}
