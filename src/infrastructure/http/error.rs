//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::PipelineError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    /// 上游返回了无法识别的内容
    BadGateway(String),
    ServiceUnavailable(String),
}

impl ApiError {
    fn parts(&self) -> (i32, &str) {
        match self {
            ApiError::BadRequest(msg) => (errno::BAD_REQUEST, msg.as_str()),
            ApiError::Internal(msg) => (errno::INTERNAL_ERROR, msg.as_str()),
            ApiError::BadGateway(msg) => (errno::BAD_GATEWAY, msg.as_str()),
            ApiError::ServiceUnavailable(msg) => (errno::SERVICE_UNAVAILABLE, msg.as_str()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, msg) = self.parts();
        match &self {
            ApiError::BadRequest(_) => {
                tracing::warn!(errno = code, error = %msg, "Bad request");
            }
            ApiError::Internal(_) => {
                tracing::error!(errno = code, error = %msg, "Internal server error");
            }
            ApiError::BadGateway(_) => {
                tracing::error!(errno = code, error = %msg, "Malformed upstream response");
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!(errno = code, error = %msg, "Service unavailable");
            }
        }

        // 业务错误统一以 200 返回，由 errno 区分
        (StatusCode::OK, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        let msg = e.to_string();
        match e {
            PipelineError::Backend(_) | PipelineError::Fetch(_) | PipelineError::Report(_) => {
                ApiError::ServiceUnavailable(msg)
            }
            PipelineError::MalformedResponse(_) => ApiError::BadGateway(msg),
            PipelineError::Segmentation(_) => ApiError::BadGateway(msg),
            PipelineError::Transfer(_) | PipelineError::Write(_) => ApiError::Internal(msg),
        }
    }
}
