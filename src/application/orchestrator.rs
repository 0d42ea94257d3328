//! Story Orchestrator - 故事生成流水线编排
//!
//! 故事生成 → 分段 → 逐段语音合成 → 转存 → 回报，
//! 严格串行执行，任一阶段失败即短路并回报 failed

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::application::error::PipelineError;
use crate::application::pipeline::{PipelineConfig, PipelineStage, RunManifest};
use crate::application::ports::{
    ArtifactSource, ArtifactStagerPort, BlobStorePort, GenerationPort, GenerationRequest,
    ResultReporterPort, RunReport, SpeechArtifact, StageRequest,
};
use crate::domain::{segment_text, Run, RunResult, RunStatus, SegmentationError, TextSegment};

/// 调用方拿到的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStoryResponse {
    pub message: String,
    pub story: String,
}

/// 某阶段的失败
#[derive(Debug)]
struct StageFailure {
    stage: PipelineStage,
    error: PipelineError,
}

/// 将任意阶段错误标记到所属阶段
fn at<E: Into<PipelineError>>(stage: PipelineStage) -> impl FnOnce(E) -> StageFailure {
    move |err| StageFailure {
        stage,
        error: err.into(),
    }
}

/// 故事流水线编排者
pub struct StoryOrchestrator {
    config: PipelineConfig,
    generator: Arc<dyn GenerationPort>,
    /// 暂存区搬运
    relocator: Arc<dyn ArtifactStagerPort>,
    /// 远程下载写入
    fetcher: Arc<dyn ArtifactStagerPort>,
    blob_store: Arc<dyn BlobStorePort>,
    reporter: Arc<dyn ResultReporterPort>,
}

impl StoryOrchestrator {
    pub fn new(
        config: PipelineConfig,
        generator: Arc<dyn GenerationPort>,
        relocator: Arc<dyn ArtifactStagerPort>,
        fetcher: Arc<dyn ArtifactStagerPort>,
        blob_store: Arc<dyn BlobStorePort>,
        reporter: Arc<dyn ResultReporterPort>,
    ) -> Self {
        Self {
            config,
            generator,
            relocator,
            fetcher,
            blob_store,
            reporter,
        }
    }

    /// 执行一次完整的 Run
    ///
    /// 无论成功失败都恰好发出一次终态回报。
    /// 失败回报本身出错只记录日志，返回原始错误；
    /// 成功回报出错则直接返回回报错误，不再补发。
    pub async fn run(&self, run: &Run) -> Result<RunStoryResponse, PipelineError> {
        tracing::info!(execution_id = %run.execution_id, "Run started");

        let result = match self.execute(run).await {
            Ok(result) => result,
            Err(failure) => {
                self.report_failure(run, &failure).await;
                return Err(failure.error);
            }
        };

        self.enter(run, PipelineStage::Reporting);
        let report = RunReport::new(run, RunStatus::Successful, result.message.clone());
        if let Err(e) = self.reporter.report(report).await {
            tracing::error!(
                execution_id = %run.execution_id,
                error = %e,
                "Failed to report successful run"
            );
            return Err(e.into());
        }

        self.enter(run, PipelineStage::Done);
        tracing::info!(
            execution_id = %run.execution_id,
            audio_parts = result.audio_urls.len(),
            story_chars = result.story.chars().count(),
            "Run completed"
        );

        Ok(RunStoryResponse {
            message: result.message,
            story: result.story,
        })
    }

    fn enter(&self, run: &Run, stage: PipelineStage) {
        tracing::debug!(execution_id = %run.execution_id, stage = %stage, "Entering stage");
    }

    /// 前四个阶段：生成、分段、合成、转存
    async fn execute(&self, run: &Run) -> Result<RunResult, StageFailure> {
        self.enter(run, PipelineStage::Generating);
        let story = self.generate_story(run).await?;

        self.enter(run, PipelineStage::Segmenting);
        let segments = self.segment_story(&story).map_err(at(PipelineStage::Segmenting))?;
        tracing::info!(
            execution_id = %run.execution_id,
            segments = segments.len(),
            max_chars = self.config.max_segment_chars,
            "Story segmented"
        );

        let mut audio_urls = Vec::with_capacity(segments.len());
        for segment in &segments {
            let url = self.synthesize_and_stage(run, segment).await?;
            audio_urls.push(url);
        }

        if self.config.write_manifest {
            self.write_manifest(run, &story, &audio_urls)
                .await
                .map_err(at(PipelineStage::Staging))?;
        }

        Ok(RunResult::successful(story, audio_urls))
    }

    async fn generate_story(&self, run: &Run) -> Result<String, StageFailure> {
        let request = GenerationRequest::story(
            run,
            run.story_prompt(),
            &self.config.story_service,
            &self.config.size,
        );

        let story = self
            .generator
            .generate(request)
            .await
            .and_then(|result| result.into_text())
            .map_err(at(PipelineStage::Generating))?;

        tracing::info!(
            execution_id = %run.execution_id,
            story_chars = story.chars().count(),
            "Story generated"
        );
        Ok(story)
    }

    fn segment_story(&self, story: &str) -> Result<Vec<TextSegment>, SegmentationError> {
        if story.trim().is_empty() {
            return Err(SegmentationError::EmptyText);
        }
        segment_text(story, self.config.max_segment_chars)
    }

    /// 单个片段：合成语音并转存到结果区，返回公开 URL
    async fn synthesize_and_stage(
        &self,
        run: &Run,
        segment: &TextSegment,
    ) -> Result<String, StageFailure> {
        self.enter(run, PipelineStage::Synthesizing);
        let request = GenerationRequest::speech(
            run,
            segment.content.clone(),
            &self.config.speech_service,
            &self.config.size,
        );

        let artifact = self
            .generator
            .generate(request)
            .await
            .and_then(|result| result.into_speech())
            .map_err(at(PipelineStage::Synthesizing))?;

        let source = resolve_source(artifact, segment.index).map_err(at(PipelineStage::Synthesizing))?;

        self.enter(run, PipelineStage::Staging);
        let stager = match source {
            ArtifactSource::Staged { .. } => &self.relocator,
            ArtifactSource::Remote { .. } => &self.fetcher,
        };
        let request = StageRequest {
            execution_id: run.execution_id.clone(),
            part: segment.index,
            source,
        };

        let staged = stager
            .stage(&request)
            .await
            .map_err(at(PipelineStage::Staging))?;

        tracing::info!(
            execution_id = %run.execution_id,
            segment = segment.index,
            strategy = stager.strategy(),
            key = %staged.key,
            url = %staged.url,
            "Audio part staged"
        );
        Ok(staged.url)
    }

    async fn write_manifest(
        &self,
        run: &Run,
        story: &str,
        audio_urls: &[String],
    ) -> Result<(), PipelineError> {
        let manifest = RunManifest {
            execution_id: run.execution_id.clone(),
            story: story.to_string(),
            audio_urls: audio_urls.to_vec(),
            generated_at: Utc::now(),
        };
        let data = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| PipelineError::Write(format!("Failed to encode manifest: {}", e)))?;

        let key = self.config.manifest_key(&run.execution_id);
        self.blob_store
            .put(&self.config.bucket, &key, data, Some("application/json"))
            .await
            .map_err(|e| PipelineError::Write(e.to_string()))?;

        tracing::debug!(execution_id = %run.execution_id, key = %key, "Manifest written");
        Ok(())
    }

    /// 尽力发送一次 failed 回报，自身失败只记录日志
    async fn report_failure(&self, run: &Run, failure: &StageFailure) {
        tracing::error!(
            execution_id = %run.execution_id,
            stage = %failure.stage,
            error = %failure.error,
            "Run failed"
        );
        self.enter(run, PipelineStage::Failed);

        let message = format!("{}: {}", failure.stage.failure_prefix(), failure.error);
        let report = RunReport::new(run, RunStatus::Failed, message);
        if let Err(e) = self.reporter.report(report).await {
            tracing::error!(
                execution_id = %run.execution_id,
                error = %e,
                "Failed to report failed run"
            );
        }
    }
}

/// 语音结果 → 转存来源
///
/// 远程 URL 必须恰好一个，多个或零个均视为响应结构错误
fn resolve_source(artifact: SpeechArtifact, part: usize) -> Result<ArtifactSource, PipelineError> {
    match artifact {
        SpeechArtifact::Staged { file_name } => Ok(ArtifactSource::Staged { file_name }),
        SpeechArtifact::Hosted { mut urls } => match urls.len() {
            1 => Ok(ArtifactSource::Remote { url: urls.remove(0) }),
            0 => Err(PipelineError::malformed(format!(
                "no audio url returned for part {}",
                part
            ))),
            n => Err(PipelineError::malformed(format!(
                "{} audio urls returned for part {}, expected exactly one",
                n, part
            ))),
        },
    }
}
