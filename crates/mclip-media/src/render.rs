//! FFmpeg implementation of [`RenderEngine`].
//!
//! Transforms only extend an in-memory plan; nothing touches FFmpeg until
//! [`FfmpegEngine::write`], which runs one process per clip:
//! input seek, `-vf` effects plus `drawtext`, `-af` effects, encode.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use mclip_models::{EffectKind, EncodingConfig, ModelError};
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::engine::RenderEngine;
use crate::error::{MediaError, MediaResult};
use crate::filters::{
    fade_audio_filter, fade_video_filter, speed_audio_filter, speed_video_filter, Fade,
};
use crate::probe::{probe_video, VideoInfo};
use crate::subtitle::{wrap_text, SubtitleStyle};

/// Slack allowed past the probed duration; container durations are rounded.
const END_TOLERANCE_SECS: f64 = 1.0;

/// A probed source video.
#[derive(Debug, Clone)]
pub struct SourceVideo {
    pub path: PathBuf,
    pub info: VideoInfo,
}

/// Render plan for one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlan {
    /// Source file
    pub input: PathBuf,
    /// Seek position in the source
    pub start: f64,
    /// Seconds read from the source
    pub source_duration: f64,
    /// Playback duration after effects
    pub duration: f64,
    /// Whether audio filters apply
    pub has_audio: bool,
    pub video_filters: Vec<String>,
    pub audio_filters: Vec<String>,
}

/// A wrapped subtitle layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub lines: Vec<String>,
    pub style: SubtitleStyle,
    pub duration: f64,
}

/// Clip plus overlay, ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePlan {
    pub clip: ClipPlan,
    pub overlay: TextOverlay,
}

/// Render engine backed by the `ffmpeg`/`ffprobe` binaries.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEngine {
    runner: FfmpegRunner,
}

impl FfmpegEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill an encode that runs longer than `secs`.
    pub fn with_timeout(mut self, secs: Option<u64>) -> Self {
        self.runner = self.runner.with_timeout(secs);
        self
    }

    /// Build the FFmpeg invocation for a composite whose subtitle text lives in `text_file`.
    pub fn build_command(
        plan: &CompositePlan,
        text_file: &Path,
        output: &Path,
        encoding: &EncodingConfig,
    ) -> FfmpegCommand {
        let clip = &plan.clip;

        let mut video_filters = clip.video_filters.clone();
        video_filters.push(
            plan.overlay
                .style
                .drawtext_filter(&text_file.to_string_lossy(), plan.overlay.duration),
        );

        let mut cmd = FfmpegCommand::new(&clip.input, output)
            .seek(clip.start)
            .duration(clip.source_duration)
            .video_filter(video_filters.join(","));

        if clip.has_audio && !clip.audio_filters.is_empty() {
            cmd = cmd.audio_filter(clip.audio_filters.join(","));
        }

        cmd = cmd.output_args(encoding.to_ffmpeg_args());

        if output.extension().is_none() {
            cmd = cmd.output_args(["-f", "mp4"]);
        }

        cmd
    }
}

fn check_parameter(kind: EffectKind, value: f64) -> MediaResult<()> {
    if !value.is_finite() {
        return Err(MediaError::effect_failed(kind, value, "parameter must be finite"));
    }
    Ok(())
}

/// Write subtitle text to a fresh temp file off the async runtime.
async fn write_subtitle_file(text: String) -> MediaResult<NamedTempFile> {
    tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("mclip-subtitle-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        Ok(file)
    })
    .await
    .map_err(|e| MediaError::render_failed(format!("Subtitle writer task failed: {}", e)))?
    .map_err(MediaError::from)
}

/// Temporary path next to `output` that keeps the container extension.
fn partial_path(output: &Path) -> PathBuf {
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "mp4".to_string());
    output.with_extension(format!("partial.{}", ext))
}

#[async_trait]
impl RenderEngine for FfmpegEngine {
    type Source = SourceVideo;
    type Clip = ClipPlan;
    type Overlay = TextOverlay;
    type Composite = CompositePlan;

    async fn load(&self, path: &Path) -> MediaResult<SourceVideo> {
        let info = probe_video(path).await?;
        debug!(
            path = %path.display(),
            duration = info.duration,
            width = info.width,
            height = info.height,
            "Loaded source video"
        );
        Ok(SourceVideo {
            path: path.to_path_buf(),
            info,
        })
    }

    fn subclip(&self, source: &SourceVideo, start: f64, end: f64) -> MediaResult<ClipPlan> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end <= start {
            return Err(ModelError::invalid_range(start, end).into());
        }
        if end > source.info.duration + END_TOLERANCE_SECS {
            return Err(MediaError::InvalidVideo(format!(
                "Clip end {:.2}s is past the source duration {:.2}s",
                end, source.info.duration
            )));
        }

        let end = end.min(source.info.duration);
        Ok(ClipPlan {
            input: source.path.clone(),
            start,
            source_duration: end - start,
            duration: end - start,
            has_audio: source.info.has_audio,
            video_filters: Vec::new(),
            audio_filters: Vec::new(),
        })
    }

    fn speed(&self, mut clip: ClipPlan, factor: f64) -> MediaResult<ClipPlan> {
        check_parameter(EffectKind::Speed, factor)?;
        if factor <= 0.0 {
            return Err(MediaError::effect_failed(
                EffectKind::Speed,
                factor,
                "speed factor must be positive",
            ));
        }

        clip.video_filters.push(speed_video_filter(factor));
        clip.audio_filters.push(speed_audio_filter(factor));
        clip.duration /= factor;
        Ok(clip)
    }

    fn fade_in(&self, mut clip: ClipPlan, secs: f64) -> MediaResult<ClipPlan> {
        check_parameter(EffectKind::FadeIn, secs)?;
        if secs < 0.0 {
            return Err(MediaError::effect_failed(
                EffectKind::FadeIn,
                secs,
                "fade duration must not be negative",
            ));
        }

        let secs = secs.min(clip.duration);
        clip.video_filters.push(fade_video_filter(Fade::In, 0.0, secs));
        clip.audio_filters.push(fade_audio_filter(Fade::In, 0.0, secs));
        Ok(clip)
    }

    fn fade_out(&self, mut clip: ClipPlan, secs: f64) -> MediaResult<ClipPlan> {
        check_parameter(EffectKind::FadeOut, secs)?;
        if secs < 0.0 {
            return Err(MediaError::effect_failed(
                EffectKind::FadeOut,
                secs,
                "fade duration must not be negative",
            ));
        }

        let secs = secs.min(clip.duration);
        let start = clip.duration - secs;
        clip.video_filters.push(fade_video_filter(Fade::Out, start, secs));
        clip.audio_filters.push(fade_audio_filter(Fade::Out, start, secs));
        Ok(clip)
    }

    fn text_overlay(&self, text: &str, style: &SubtitleStyle, duration: f64) -> MediaResult<TextOverlay> {
        style.validate()?;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(MediaError::invalid_parameter(format!(
                "overlay duration must be positive, got {}",
                duration
            )));
        }

        Ok(TextOverlay {
            lines: wrap_text(text, style.max_line_chars),
            style: style.clone(),
            duration,
        })
    }

    fn composite(&self, clip: ClipPlan, overlay: TextOverlay) -> MediaResult<CompositePlan> {
        Ok(CompositePlan { clip, overlay })
    }

    async fn write(&self, composite: CompositePlan, output: &Path, encoding: &EncodingConfig) -> MediaResult<()> {
        let started = Instant::now();

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // drawtext reads the subtitle from disk; the file lives until the encode ends
        let text_file = write_subtitle_file(composite.overlay.lines.join("\n")).await?;

        let partial = partial_path(output);
        let cmd = Self::build_command(&composite, text_file.path(), &partial, encoding);

        if let Err(e) = self.runner.run(&cmd).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        let size = match tokio::fs::metadata(&partial).await {
            Ok(meta) => meta.len(),
            Err(_) => 0,
        };
        if size == 0 {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(MediaError::render_failed(format!(
                "FFmpeg produced no output for {}",
                output.display()
            )));
        }

        tokio::fs::rename(&partial, output).await?;

        let elapsed = started.elapsed().as_secs_f64();
        metrics::histogram!("mclip_ffmpeg_duration_seconds").record(elapsed);
        info!(
            output = %output.display(),
            size_bytes = size,
            duration = composite.clip.duration,
            elapsed_secs = elapsed,
            "Rendered clip"
        );

        Ok(())
    }
}
