//! Data Transfer Objects

use serde::Serialize;

use crate::application::RunStoryResponse;

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 故事执行结果
#[derive(Debug, Serialize)]
pub struct RunStoryResponseDto {
    pub message: String,
    pub story: String,
}

impl From<RunStoryResponse> for RunStoryResponseDto {
    fn from(response: RunStoryResponse) -> Self {
        Self {
            message: response.message,
            story: response.story,
        }
    }
}
