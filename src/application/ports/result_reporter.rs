//! Result Reporter Port - 终态回调抽象

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Run, RunStatus};

/// 回调错误
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Callback rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// 一次终态回报
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub execution_id: String,
    pub user_id: i64,
    pub product_id: i64,
    pub token: String,
    pub status: RunStatus,
    pub message: String,
}

impl RunReport {
    pub fn new(run: &Run, status: RunStatus, message: impl Into<String>) -> Self {
        Self {
            execution_id: run.execution_id.clone(),
            user_id: run.user_id,
            product_id: run.product_id,
            token: run.token.clone(),
            status,
            message: message.into(),
        }
    }
}

/// Result Reporter Port
#[async_trait]
pub trait ResultReporterPort: Send + Sync {
    async fn report(&self, report: RunReport) -> Result<(), ReportError>;
}
