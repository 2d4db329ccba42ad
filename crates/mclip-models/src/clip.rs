//! Clip request options, artifacts and the batch outcome.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::moment::Moment;

/// Default subtitle text colour.
pub const DEFAULT_SUBTITLE_COLOR: &str = "white";

/// Per-batch rendering options chosen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipOptions {
    /// Subtitle text colour (FFmpeg colour name or `0xRRGGBB`)
    #[serde(default = "default_subtitle_color")]
    pub subtitle_color: String,

    /// Optional emoji string prepended to every subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_prefix: Option<String>,

    /// Raw effect specification, e.g. `speed:1.5,fadein:0.5`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<String>,
}

fn default_subtitle_color() -> String {
    DEFAULT_SUBTITLE_COLOR.to_string()
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            subtitle_color: default_subtitle_color(),
            emoji_prefix: None,
            effects: None,
        }
    }
}

impl ClipOptions {
    pub fn with_subtitle_color(mut self, color: impl Into<String>) -> Self {
        self.subtitle_color = color.into();
        self
    }

    pub fn with_emoji_prefix(mut self, emoji: impl Into<String>) -> Self {
        self.emoji_prefix = Some(emoji.into());
        self
    }

    pub fn with_effects(mut self, effects: impl Into<String>) -> Self {
        self.effects = Some(effects.into());
        self
    }

    /// Subtitle text with the emoji prefix applied, if any.
    pub fn decorate_subtitle(&self, text: &str) -> String {
        match self.emoji_prefix.as_deref() {
            Some(emoji) if !emoji.is_empty() => format!("{} {}", emoji, text),
            _ => text.to_string(),
        }
    }
}

/// A rendered clip written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipArtifact {
    /// Output file path
    pub path: String,

    /// Position of the source moment in the accepted moment list
    pub index: usize,

    /// Moment this clip was cut from
    pub moment: Moment,
}

/// A moment whose assembly failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipFailure {
    /// Position of the failed moment in the accepted moment list
    pub moment_index: usize,

    /// Error detail
    pub message: String,
}

/// Result of one pipeline run over a source video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PipelineOutcome {
    /// Successfully rendered clips, in moment order
    pub artifacts: Vec<ClipArtifact>,

    /// Full transcription text of the source
    pub transcription_text: String,

    /// One entry per failed moment
    pub errors: Vec<ClipFailure>,

    /// Number of moments accepted by the selector
    pub moment_count: usize,
}

impl PipelineOutcome {
    /// Check if every accepted moment produced a clip.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.artifacts.len() == self.moment_count
    }

    /// Index-aligned view: one entry per accepted moment.
    ///
    /// Moments with neither an artifact nor an error (which the assembler
    /// never produces) are omitted.
    pub fn per_moment(&self) -> Vec<Result<&ClipArtifact, &ClipFailure>> {
        (0..self.moment_count)
            .filter_map(|i| {
                if let Some(artifact) = self.artifacts.iter().find(|a| a.index == i) {
                    Some(Ok(artifact))
                } else {
                    self.errors.iter().find(|e| e.moment_index == i).map(Err)
                }
            })
            .collect()
    }
}
