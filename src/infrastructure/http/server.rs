//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 请求体上限，Run 请求只含少量字段
const MAX_BODY_BYTES: usize = 64 * 1024;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5070,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn build_router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600));

        create_routes()
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{PipelineConfig, StoryOrchestrator};
    use crate::infrastructure::adapters::{
        FetchingStager, HttpGenerationClient, HttpGenerationClientConfig, HttpResultReporter,
        HttpResultReporterConfig, RelocatingStager, StagerConfig,
    };
    use crate::infrastructure::memory::InMemoryBlobStore;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn server() -> HttpServer {
        let blob_store = Arc::new(InMemoryBlobStore::new());
        let orchestrator = StoryOrchestrator::new(
            PipelineConfig::default(),
            Arc::new(HttpGenerationClient::new(HttpGenerationClientConfig::default()).unwrap()),
            Arc::new(RelocatingStager::new(blob_store.clone(), StagerConfig::default())),
            Arc::new(FetchingStager::new(blob_store.clone(), StagerConfig::default()).unwrap()),
            blob_store,
            Arc::new(HttpResultReporter::new(HttpResultReporterConfig::default()).unwrap()),
        );
        HttpServer::new(
            ServerConfig::new("127.0.0.1", 0),
            AppState::new(Arc::new(orchestrator)),
        )
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(ServerConfig::new("127.0.0.1", 8080).addr(), "127.0.0.1:8080");
        assert_eq!(ServerConfig::default().addr(), "0.0.0.0:5070");
    }

    #[tokio::test]
    async fn test_ping_route() {
        let router = server().build_router();
        let response = router
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_run_route_rejects_invalid_json() {
        let router = server().build_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/story/run")
            .header("content-type", "application/json")
            .body(Body::from("{\"execution_id\": 1"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
