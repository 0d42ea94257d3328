//! Stager Adapter - 音频产物转存实现
//!
//! - RelocatingStager: 暂存区 → 结果区
//! - FetchingStager: 远程 URL → 结果区

mod fetch_and_store;
mod relocate;

pub use fetch_and_store::FetchingStager;
pub use relocate::RelocatingStager;

use crate::application::ports::StageRequest;

/// 转存配置
#[derive(Debug, Clone)]
pub struct StagerConfig {
    /// 存储桶
    pub bucket: String,
    /// 暂存区目录（生成服务写入）
    pub staging_folder: String,
    /// 结果区目录
    pub results_folder: String,
}

impl Default for StagerConfig {
    fn default() -> Self {
        Self {
            bucket: "kinder-executions".to_string(),
            staging_folder: "internal".to_string(),
            results_folder: "results".to_string(),
        }
    }
}

impl StagerConfig {
    /// 暂存区对象键：`<staging>/<execution_id>/<file_name>`
    pub fn staging_key(&self, execution_id: &str, file_name: &str) -> String {
        format!("{}/{}/{}", self.staging_folder, execution_id, file_name)
    }

    /// 结果区对象键：`<results>/<execution_id>/audio_part_<n>.<ext>`
    pub fn result_key(&self, request: &StageRequest) -> String {
        format!(
            "{}/{}/{}",
            self.results_folder,
            request.execution_id,
            request.result_file_name()
        )
    }
}
