//! Story HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::Run;
use crate::infrastructure::http::dto::{ApiResponse, RunStoryResponseDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 执行一次故事生成
///
/// 同步等待流水线结束；终态回调由编排者发出
pub async fn run_story(
    State(state): State<Arc<AppState>>,
    Json(run): Json<Run>,
) -> Result<Json<ApiResponse<RunStoryResponseDto>>, ApiError> {
    if run.execution_id.trim().is_empty() {
        return Err(ApiError::BadRequest("execution_id cannot be empty".to_string()));
    }

    tracing::info!(
        execution_id = %run.execution_id,
        user_id = run.user_id,
        product_id = run.product_id,
        "Story run requested"
    );

    let response = state.orchestrator.run(&run).await?;
    Ok(Json(ApiResponse::success(response.into())))
}
