//! In-memory collaborators for unit tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mclip_media::{MediaError, MediaResult, RenderEngine, SubtitleStyle};
use mclip_models::{EffectKind, EncodingConfig, Transcript, TranscriptSegment};
use mclip_oracle::{MomentOracle, OracleError, OracleResult, Transcriber};

/// The three-segment transcript used across pipeline tests.
pub fn sample_transcript() -> Transcript {
    Transcript::new(
        "intro main point outro",
        vec![
            TranscriptSegment::new(0.0, 40.0, "intro").unwrap(),
            TranscriptSegment::new(40.0, 90.0, " main point ").unwrap(),
            TranscriptSegment::new(90.0, 100.0, "outro").unwrap(),
        ],
    )
}

#[derive(Debug, Clone)]
pub struct FakeClip {
    pub start: f64,
    pub end: f64,
    pub effects: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FakeOverlay {
    pub text: String,
    pub color: String,
    pub duration: f64,
}

/// What the engine was asked to write.
#[derive(Debug, Clone)]
pub struct WrittenClip {
    pub path: PathBuf,
    pub text: String,
    pub color: String,
    pub effects: Vec<String>,
    pub overlay_duration: f64,
}

/// Render engine that writes placeholder files and can fail on demand.
#[derive(Debug, Default)]
pub struct FakeEngine {
    fail_index: Option<usize>,
    fail_load: bool,
    loads: AtomicUsize,
    written: Mutex<Vec<WrittenClip>>,
}

impl FakeEngine {
    /// Fail the write of the clip at `index`.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_index: Some(index),
            ..Default::default()
        }
    }

    /// Fail every `load`.
    pub fn unloadable() -> Self {
        Self {
            fail_load: true,
            ..Default::default()
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<WrittenClip> {
        self.written.lock().unwrap().clone()
    }

    fn effect(mut clip: FakeClip, kind: EffectKind, value: f64) -> MediaResult<FakeClip> {
        let valid = match kind {
            EffectKind::Speed => value > 0.0,
            EffectKind::FadeIn | EffectKind::FadeOut => value >= 0.0,
        };
        if !valid {
            return Err(MediaError::effect_failed(kind, value, "rejected by fake engine"));
        }
        clip.effects.push(format!("{}:{}", kind, value));
        Ok(clip)
    }
}

#[async_trait]
impl RenderEngine for FakeEngine {
    type Source = PathBuf;
    type Clip = FakeClip;
    type Overlay = FakeOverlay;
    type Composite = (FakeClip, FakeOverlay);

    async fn load(&self, path: &Path) -> MediaResult<PathBuf> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        Ok(path.to_path_buf())
    }

    fn subclip(&self, _source: &PathBuf, start: f64, end: f64) -> MediaResult<FakeClip> {
        Ok(FakeClip {
            start,
            end,
            effects: Vec::new(),
        })
    }

    fn speed(&self, clip: FakeClip, factor: f64) -> MediaResult<FakeClip> {
        Self::effect(clip, EffectKind::Speed, factor)
    }

    fn fade_in(&self, clip: FakeClip, secs: f64) -> MediaResult<FakeClip> {
        Self::effect(clip, EffectKind::FadeIn, secs)
    }

    fn fade_out(&self, clip: FakeClip, secs: f64) -> MediaResult<FakeClip> {
        Self::effect(clip, EffectKind::FadeOut, secs)
    }

    fn text_overlay(&self, text: &str, style: &SubtitleStyle, duration: f64) -> MediaResult<FakeOverlay> {
        Ok(FakeOverlay {
            text: text.to_string(),
            color: style.font_color.clone(),
            duration,
        })
    }

    fn composite(&self, clip: FakeClip, overlay: FakeOverlay) -> MediaResult<(FakeClip, FakeOverlay)> {
        Ok((clip, overlay))
    }

    async fn write(
        &self,
        composite: (FakeClip, FakeOverlay),
        output: &Path,
        _encoding: &EncodingConfig,
    ) -> MediaResult<()> {
        let (clip, overlay) = composite;
        if let Some(index) = self.fail_index {
            let name = output.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            if name.starts_with(&format!("clip_{}_", index)) {
                return Err(MediaError::render_failed("encoder exploded"));
            }
        }

        tokio::fs::write(output, format!("{}-{}", clip.start, clip.end)).await?;
        self.written.lock().unwrap().push(WrittenClip {
            path: output.to_path_buf(),
            text: overlay.text,
            color: overlay.color,
            effects: clip.effects,
            overlay_duration: overlay.duration,
        });
        Ok(())
    }
}

/// Oracle returning a fixed answer and counting calls.
#[derive(Debug)]
pub struct FakeOracle {
    answer: String,
    calls: AtomicUsize,
}

impl FakeOracle {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MomentOracle for FakeOracle {
    async fn complete_json(&self, _system: &str, _user: &str) -> OracleResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

/// Transcriber returning a fixed transcript, or failing.
#[derive(Debug)]
pub struct FakeTranscriber {
    transcript: Option<Transcript>,
}

impl FakeTranscriber {
    pub fn returning(transcript: Transcript) -> Self {
        Self {
            transcript: Some(transcript),
        }
    }

    pub fn failing() -> Self {
        Self { transcript: None }
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _path: &Path) -> OracleResult<Transcript> {
        self.transcript
            .clone()
            .ok_or_else(|| OracleError::request_failed("transcription service unavailable"))
    }
}
