//! Clip assembly.
//!
//! For every accepted moment: look up the spoken text, cut the range,
//! apply the effect chain, burn in the subtitle and write the file. A
//! failure is recorded against the moment's index and the batch moves on.

use std::path::{Path, PathBuf};
use std::time::Instant;

use mclip_media::{apply_effects, parse_effects, RenderEngine, SubtitleStyle};
use mclip_models::{ClipArtifact, ClipFailure, ClipOptions, EncodingConfig, Moment, Transcript};
use tracing::{debug, info, warn};

use crate::error::WorkerResult;
use crate::metrics;

/// Fallback name when the source path has no file name.
const DEFAULT_BASENAME: &str = "video.mp4";

/// Artifacts and failures of one assembly batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    /// Rendered clips in moment order
    pub artifacts: Vec<ClipArtifact>,
    /// One entry per failed moment
    pub errors: Vec<ClipFailure>,
}

/// Renders moments of one source video through a [`RenderEngine`].
pub struct ClipAssembler<E: RenderEngine> {
    engine: E,
    output_dir: PathBuf,
    subtitle: SubtitleStyle,
    encoding: EncodingConfig,
}

impl<E: RenderEngine> ClipAssembler<E> {
    pub fn new(engine: E, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            output_dir: output_dir.into(),
            subtitle: SubtitleStyle::default(),
            encoding: EncodingConfig::default(),
        }
    }

    /// Base subtitle style; the font colour is taken from each request.
    pub fn with_subtitle_style(mut self, style: SubtitleStyle) -> Self {
        self.subtitle = style;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output path for the moment at `index`: `<output_dir>/clip_<index>_<basename>`.
    pub fn clip_path(&self, source: &Path, index: usize) -> PathBuf {
        let basename = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_BASENAME.to_string());
        self.output_dir.join(format!("clip_{}_{}", index, basename))
    }

    /// Render every moment. Never fails as a whole.
    ///
    /// Artifacts and errors carry the moment's position in `moments`, so a
    /// failed index shows up as a gap in the artifact indices.
    pub async fn assemble(
        &self,
        source: &Path,
        transcript: &Transcript,
        moments: &[Moment],
        options: &ClipOptions,
    ) -> Assembly {
        let mut assembly = Assembly::default();
        if moments.is_empty() {
            return assembly;
        }

        let video = match self.engine.load(source).await {
            Ok(video) => video,
            Err(e) => {
                warn!(source = %source.display(), error = %e, "Failed to load source video");
                let message = format!("Failed to load source video: {}", e);
                assembly.errors = (0..moments.len())
                    .map(|moment_index| {
                        metrics::record_clip_failed();
                        ClipFailure {
                            moment_index,
                            message: message.clone(),
                        }
                    })
                    .collect();
                return assembly;
            }
        };

        let style = self
            .subtitle
            .clone()
            .with_font_color(options.subtitle_color.clone());

        for (index, moment) in moments.iter().enumerate() {
            let started = Instant::now();

            match self
                .assemble_one(&video, source, transcript, index, moment, options, &style)
                .await
            {
                Ok(artifact) => {
                    metrics::record_clip_rendered(started.elapsed().as_secs_f64());
                    info!(
                        moment_index = index,
                        start = moment.start,
                        end = moment.end,
                        path = %artifact.path,
                        "Clip rendered"
                    );
                    assembly.artifacts.push(artifact);
                }
                Err(e) => {
                    metrics::record_clip_failed();
                    warn!(
                        moment_index = index,
                        start = moment.start,
                        end = moment.end,
                        error = %e,
                        "Clip failed"
                    );
                    assembly.errors.push(ClipFailure {
                        moment_index: index,
                        message: e.to_string(),
                    });
                }
            }
        }

        assembly
    }

    #[allow(clippy::too_many_arguments)]
    async fn assemble_one(
        &self,
        video: &E::Source,
        source: &Path,
        transcript: &Transcript,
        index: usize,
        moment: &Moment,
        options: &ClipOptions,
        style: &SubtitleStyle,
    ) -> WorkerResult<ClipArtifact> {
        let text = transcript.text_for_range(moment.start, moment.end)?;
        let subtitle = options.decorate_subtitle(&text);
        debug!(moment_index = index, chars = subtitle.len(), "Subtitle text resolved");

        let clip = self.engine.subclip(video, moment.start, moment.end)?;
        let chain = parse_effects(options.effects.as_deref());
        let clip = apply_effects(&self.engine, clip, &chain)?;

        let overlay = self.engine.text_overlay(&subtitle, style, moment.duration())?;
        let composite = self.engine.composite(clip, overlay)?;

        let path = self.clip_path(source, index);
        tokio::fs::create_dir_all(&self.output_dir).await?;
        self.engine.write(composite, &path, &self.encoding).await?;

        Ok(ClipArtifact {
            path: path.to_string_lossy().to_string(),
            index,
            moment: moment.clone(),
        })
    }
}
