//! Application state.

use std::sync::Arc;

use anyhow::Context;
use mclip_media::{check_ffmpeg, check_ffprobe, FfmpegEngine};
use mclip_oracle::OpenAiClient;
use mclip_worker::{ClipService, Pipeline, WorkerConfig};
use tracing::info;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub clipper: Arc<dyn ClipService>,
}

impl AppState {
    /// Wire the clip pipeline from the environment.
    ///
    /// Fails when FFmpeg is missing or the oracle API key is not set.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let ffmpeg = check_ffmpeg().context("ffmpeg is required")?;
        let ffprobe = check_ffprobe().context("ffprobe is required")?;
        info!(ffmpeg = %ffmpeg.display(), ffprobe = %ffprobe.display(), "Found FFmpeg tools");

        let worker_config = WorkerConfig::from_env().context("Invalid worker configuration")?;
        let client = Arc::new(OpenAiClient::from_env().context("Invalid oracle configuration")?);
        tokio::fs::create_dir_all(&worker_config.output_dir)
            .await
            .with_context(|| format!("Cannot create {}", worker_config.output_dir.display()))?;

        info!(
            output_dir = %worker_config.output_dir.display(),
            min_secs = worker_config.bounds.min_secs,
            max_secs = worker_config.bounds.max_secs,
            "Clip pipeline configured"
        );

        let engine = FfmpegEngine::new().with_timeout(worker_config.render_timeout_secs);
        let pipeline = Pipeline::from_config(engine, client.clone(), &worker_config).with_transcriber(client);

        Ok(Self::with_service(config, Arc::new(pipeline)))
    }

    /// State around an already built clip service.
    pub fn with_service(config: ApiConfig, clipper: Arc<dyn ClipService>) -> Self {
        Self { config, clipper }
    }
}
