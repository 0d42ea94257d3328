//! Kinder Stories - 儿童故事与有声片段生成服务
//!
//! - Domain: run, text_segmenter
//! - Application: ports, pipeline, orchestrator
//! - Infrastructure: http, memory, adapters

use std::sync::Arc;

use kinder_stories::application::{BlobStorePort, StoryOrchestrator};
use kinder_stories::config::{load_config, print_config, AppConfig, StorageBackend};
use kinder_stories::infrastructure::adapters::{
    FetchingStager, FileBlobStore, HttpGenerationClient, HttpGenerationClientConfig,
    HttpResultReporter, HttpResultReporterConfig, RelocatingStager,
};
use kinder_stories::infrastructure::http::{AppState, HttpServer, ServerConfig};
use kinder_stories::infrastructure::memory::InMemoryBlobStore;

/// 按配置选择对象存储后端
async fn build_blob_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStorePort>> {
    let public_base_url = config.storage.public_base_url.clone();
    let store: Arc<dyn BlobStorePort> = match config.storage.backend {
        StorageBackend::File => {
            Arc::new(FileBlobStore::new(&config.storage.root_dir, public_base_url).await?)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory blob store, objects are lost on restart");
            let store = InMemoryBlobStore::new();
            match public_base_url {
                Some(base) => Arc::new(store.with_public_base_url(base)),
                None => Arc::new(store),
            }
        }
    };
    Ok(store)
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},kinder_stories={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Kinder Stories - 儿童故事生成服务");
    print_config(&config);

    let blob_store = build_blob_store(&config).await?;

    // 生成函数客户端
    let generation_config =
        HttpGenerationClientConfig::new(&config.generation.url, &config.generation.function_name)
            .with_timeout(config.generation.timeout_secs);
    let generator = Arc::new(HttpGenerationClient::new(generation_config)?);

    // 两种转存策略
    let stager_config = config.stager_config();
    let relocator = Arc::new(RelocatingStager::new(
        blob_store.clone(),
        stager_config.clone(),
    ));
    let fetcher = Arc::new(FetchingStager::with_timeout(
        blob_store.clone(),
        stager_config,
        config.storage.fetch_timeout_secs,
    )?);

    // 回调客户端
    let reporter_config = HttpResultReporterConfig::new(&config.callback.url)
        .with_timeout(config.callback.timeout_secs);
    let reporter = Arc::new(HttpResultReporter::new(reporter_config)?);

    let orchestrator = Arc::new(StoryOrchestrator::new(
        config.pipeline_config(),
        generator,
        relocator,
        fetcher,
        blob_store,
        reporter,
    ));

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, AppState::new(orchestrator));

    tracing::info!("Server starting on {}", config.server.addr());

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
