//! Pipeline orchestration: transcript → moments → clips.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use mclip_media::RenderEngine;
use mclip_models::{ClipOptions, PipelineOutcome, Transcript};
use mclip_oracle::{MomentOracle, Transcriber};
use tracing::Instrument;

use crate::assembler::ClipAssembler;
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::RunLogger;
use crate::metrics;
use crate::selector::MomentSelector;

/// Something that turns a source video into clips.
///
/// The HTTP layer holds this as a trait object so it does not depend on
/// the concrete render engine. `run_id` tags every log line of the run.
#[async_trait]
pub trait ClipService: Send + Sync {
    async fn clip_video(&self, source: &Path, options: &ClipOptions, run_id: &str) -> WorkerResult<PipelineOutcome>;
}

/// Runs the moment selector and then the clip assembler for one source.
pub struct Pipeline<E: RenderEngine> {
    selector: MomentSelector,
    assembler: ClipAssembler<E>,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl<E: RenderEngine> Pipeline<E> {
    pub fn new(selector: MomentSelector, assembler: ClipAssembler<E>) -> Self {
        Self {
            selector,
            assembler,
            transcriber: None,
        }
    }

    /// Wire a pipeline from configuration.
    pub fn from_config(engine: E, oracle: Arc<dyn MomentOracle>, config: &WorkerConfig) -> Self {
        let selector = MomentSelector::new(oracle, config.bounds);
        let assembler = ClipAssembler::new(engine, config.output_dir.clone())
            .with_subtitle_style(config.subtitle.clone())
            .with_encoding(config.encoding.clone());
        Self::new(selector, assembler)
    }

    /// Transcriber used by [`Pipeline::run_from_video`].
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn assembler(&self) -> &ClipAssembler<E> {
        &self.assembler
    }

    /// Select moments in `transcript` and render them from `source`.
    ///
    /// Selector failures abort the run before anything is rendered.
    /// Per-clip failures are reported in the outcome.
    pub async fn run(
        &self,
        source: &Path,
        transcript: &Transcript,
        options: &ClipOptions,
    ) -> WorkerResult<PipelineOutcome> {
        let logger = RunLogger::new("clip_pipeline");
        self.run_logged(&logger, source, transcript, options)
            .instrument(logger.create_span())
            .await
    }

    /// Transcribe `source`, then [`Pipeline::run`] on the result.
    pub async fn run_from_video(&self, source: &Path, options: &ClipOptions) -> WorkerResult<PipelineOutcome> {
        self.transcribe_and_run(RunLogger::new("clip_video"), source, options)
            .await
    }

    async fn transcribe_and_run(
        &self,
        logger: RunLogger,
        source: &Path,
        options: &ClipOptions,
    ) -> WorkerResult<PipelineOutcome> {
        let span = logger.create_span();

        async {
            let transcriber = self
                .transcriber
                .as_ref()
                .ok_or_else(|| WorkerError::config_error("No transcriber configured"))?;

            logger.log_start(&format!("transcribing {}", source.display()));
            let started = Instant::now();
            let transcript = transcriber.transcribe(source).await;
            metrics::record_oracle_call("transcribe", started.elapsed().as_secs_f64());

            let transcript = transcript.map_err(|e| {
                logger.log_error(&format!("transcription failed: {}", e));
                WorkerError::Transcription(e)
            })?;
            logger.log_progress(&format!("transcribed {} segments", transcript.segments.len()));

            self.run_logged(&logger, source, &transcript, options).await
        }
        .instrument(span)
        .await
    }

    async fn run_logged(
        &self,
        logger: &RunLogger,
        source: &Path,
        transcript: &Transcript,
        options: &ClipOptions,
    ) -> WorkerResult<PipelineOutcome> {
        logger.log_start(&format!("selecting moments for {}", source.display()));

        let moments = match self.selector.select_moments(transcript).await {
            Ok(moments) => moments,
            Err(e) => {
                logger.log_error(&format!("moment selection failed: {}", e));
                return Err(e);
            }
        };

        if moments.is_empty() {
            logger.log_warning("no moments within duration bounds");
        } else {
            logger.log_progress(&format!("assembling {} clips", moments.len()));
        }

        let assembly = self
            .assembler
            .assemble(source, transcript, &moments, options)
            .await;

        logger.log_completion(&format!(
            "{} clips rendered, {} failed",
            assembly.artifacts.len(),
            assembly.errors.len()
        ));

        Ok(PipelineOutcome {
            artifacts: assembly.artifacts,
            transcription_text: transcript.full_text.clone(),
            errors: assembly.errors,
            moment_count: moments.len(),
        })
    }
}

#[async_trait]
impl<E: RenderEngine + 'static> ClipService for Pipeline<E> {
    async fn clip_video(&self, source: &Path, options: &ClipOptions, run_id: &str) -> WorkerResult<PipelineOutcome> {
        self.transcribe_and_run(RunLogger::with_run_id(run_id, "clip_video"), source, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_transcript, FakeEngine, FakeOracle, FakeTranscriber};
    use mclip_models::MomentBounds;

    const FIVE_MOMENTS: &str = r#"{"moments": [
        {"start_time": 0, "end_time": 40, "text": "a"},
        {"start_time": 40, "end_time": 90, "text": "b"},
        {"start_time": 100, "end_time": 160, "text": "c"},
        {"start_time": 200, "end_time": 300, "text": "d"},
        {"start_time": 300, "end_time": 420, "text": "e"}
    ]}"#;

    fn pipeline(engine: FakeEngine, oracle: Arc<FakeOracle>, dir: &Path) -> Pipeline<FakeEngine> {
        Pipeline::new(
            MomentSelector::new(oracle, MomentBounds::default()),
            ClipAssembler::new(engine, dir),
        )
    }

    #[tokio::test]
    async fn test_render_failure_is_reported_per_index() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(FakeOracle::answering(FIVE_MOMENTS));
        let pipeline = pipeline(FakeEngine::failing_at(2), oracle, dir.path());

        let outcome = pipeline
            .run(Path::new("/videos/talk.mp4"), &sample_transcript(), &ClipOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.moment_count, 5);
        assert_eq!(outcome.artifacts.len(), 4);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].moment_index, 2);
        assert!(outcome.per_moment()[2].is_err());
        assert_eq!(outcome.transcription_text, "intro main point outro");
    }

    #[tokio::test]
    async fn test_unparseable_oracle_answer_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(FakeOracle::answering("{not json"));
        let pipeline = pipeline(FakeEngine::default(), oracle.clone(), dir.path());

        let err = pipeline
            .run(Path::new("talk.mp4"), &sample_transcript(), &ClipOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_oracle_response());
        assert_eq!(oracle.calls(), 1);
        assert_eq!(pipeline.assembler().engine().loads(), 0);
        assert!(pipeline.assembler().engine().written().is_empty());
    }

    #[tokio::test]
    async fn test_no_valid_moments_is_empty_success() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(FakeOracle::answering(
            r#"{"moments": [{"start_time": 0, "end_time": 10, "text": "short"}]}"#,
        ));
        let pipeline = pipeline(FakeEngine::default(), oracle, dir.path());

        let outcome = pipeline
            .run(Path::new("talk.mp4"), &sample_transcript(), &ClipOptions::default())
            .await
            .unwrap();

        assert!(outcome.artifacts.is_empty());
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.moment_count, 0);
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn test_run_from_video() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(FakeOracle::answering(
            r#"{"moments": [{"start_time": 30, "end_time": 95, "text": "main point"}]}"#,
        ));
        let pipeline = pipeline(FakeEngine::default(), oracle, dir.path())
            .with_transcriber(Arc::new(FakeTranscriber::returning(sample_transcript())));

        let outcome = pipeline
            .clip_video(Path::new("/videos/talk.mp4"), &ClipOptions::default(), "req-7")
            .await
            .unwrap();

        assert_eq!(outcome.artifacts.len(), 1);
        assert_eq!(outcome.artifacts[0].index, 0);
        assert_eq!(pipeline.assembler().engine().written()[0].text, "intro main point outro");
    }

    #[tokio::test]
    async fn test_transcription_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(FakeOracle::answering(FIVE_MOMENTS));
        let pipeline = pipeline(FakeEngine::default(), oracle.clone(), dir.path())
            .with_transcriber(Arc::new(FakeTranscriber::failing()));

        let err = pipeline
            .run_from_video(Path::new("talk.mp4"), &ClipOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkerError::Transcription(_)));
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_run_from_video_without_transcriber() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = Arc::new(FakeOracle::answering(FIVE_MOMENTS));
        let pipeline = pipeline(FakeEngine::default(), oracle, dir.path());

        let err = pipeline
            .run_from_video(Path::new("talk.mp4"), &ClipOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::ConfigError(_)));
    }
}
