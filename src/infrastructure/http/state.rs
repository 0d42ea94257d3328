//! Application State

use std::sync::Arc;

use crate::application::StoryOrchestrator;

/// 应用状态
pub struct AppState {
    pub orchestrator: Arc<StoryOrchestrator>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(orchestrator: Arc<StoryOrchestrator>) -> Self {
        Self { orchestrator }
    }
}
