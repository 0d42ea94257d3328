//! Memory Layer - In-Memory Blob Store
//!
//! 内存对象存储，供测试与 `memory` 存储后端使用

mod blob_store;

pub use blob_store::InMemoryBlobStore;
