//! HTTP Result Reporter - 向回调端点发送终态
//!
//! POST {url}
//! Request: {"execution_id","user_id","product_id","token","status","results"}
//! user_id / product_id 以十进制字符串发送

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{ReportError, ResultReporterPort, RunReport};

/// 回调请求体 (JSON)
#[derive(Debug, Serialize)]
struct CallbackPayload<'a> {
    execution_id: &'a str,
    user_id: String,
    product_id: String,
    token: &'a str,
    status: &'static str,
    results: &'a str,
}

impl<'a> From<&'a RunReport> for CallbackPayload<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            execution_id: &report.execution_id,
            user_id: report.user_id.to_string(),
            product_id: report.product_id.to_string(),
            token: &report.token,
            status: report.status.as_str(),
            results: &report.message,
        }
    }
}

/// 回调客户端配置
#[derive(Debug, Clone)]
pub struct HttpResultReporterConfig {
    /// 回调端点
    pub url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpResultReporterConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/wp-json/product-extension/v1/lambda-results".to_string(),
            timeout_secs: 30,
        }
    }
}

impl HttpResultReporterConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 回调客户端
pub struct HttpResultReporter {
    client: Client,
    config: HttpResultReporterConfig,
}

impl HttpResultReporter {
    pub fn new(config: HttpResultReporterConfig) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReportError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ResultReporterPort for HttpResultReporter {
    async fn report(&self, report: RunReport) -> Result<(), ReportError> {
        let payload = CallbackPayload::from(&report);

        tracing::debug!(
            url = %self.config.url,
            execution_id = %report.execution_id,
            status = %report.status,
            "Sending result callback"
        );

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReportError::NetworkError(format!("error sending result: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            execution_id = %report.execution_id,
            status = %report.status,
            "Result callback accepted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomInputs, Run, RunStatus};
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    fn sample_report(status: RunStatus) -> RunReport {
        let run = Run {
            execution_id: "exec-5".to_string(),
            user_id: 12,
            product_id: 34,
            vendor_id: String::new(),
            token: "secret-token".to_string(),
            custom_inputs: CustomInputs::default(),
        };
        RunReport::new(&run, status, "done")
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/callback", addr)
    }

    #[test]
    fn test_payload_shape() {
        let report = sample_report(RunStatus::Failed);
        let value = serde_json::to_value(CallbackPayload::from(&report)).unwrap();
        assert_eq!(
            value,
            json!({
                "execution_id": "exec-5",
                "user_id": "12",
                "product_id": "34",
                "token": "secret-token",
                "status": "failed",
                "results": "done"
            })
        );
    }

    #[tokio::test]
    async fn test_report_posts_payload() {
        let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let url = serve(Router::new().route(
            "/callback",
            post(move |Json(payload): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(payload);
                    StatusCode::OK
                }
            }),
        ))
        .await;

        let reporter = HttpResultReporter::new(HttpResultReporterConfig::new(url)).unwrap();
        reporter.report(sample_report(RunStatus::Successful)).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["status"], "successful");
        assert_eq!(received[0]["user_id"], "12");
    }

    #[tokio::test]
    async fn test_rejected_callback() {
        let url = serve(Router::new().route(
            "/callback",
            post(|| async { (StatusCode::FORBIDDEN, "bad token") }),
        ))
        .await;

        let reporter = HttpResultReporter::new(HttpResultReporterConfig::new(url)).unwrap();
        let err = reporter
            .report(sample_report(RunStatus::Failed))
            .await
            .unwrap_err();
        match err {
            ReportError::Rejected { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "bad token");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_config_builder() {
        let config = HttpResultReporterConfig::new("http://cb").with_timeout(3);
        assert_eq!(config.url, "http://cb");
        assert_eq!(config.timeout_secs, 3);
    }
}
