//! Render engine abstraction.
//!
//! The clip assembler only talks to this trait. Each engine picks its own
//! handle types: the FFmpeg engine builds immutable render plans and runs a
//! single encode per clip on [`RenderEngine::write`], while test engines can
//! record calls or fail on demand.

use std::path::Path;

use async_trait::async_trait;
use mclip_models::EncodingConfig;

use crate::error::MediaResult;
use crate::subtitle::SubtitleStyle;

/// Primitive video operations used to assemble a clip.
///
/// Clip handles are consumed by every transform and a new handle is
/// returned, so a failed step never leaves a half-modified clip behind.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// An opened source video.
    type Source: Send + Sync;
    /// A time range of a source, possibly with effects applied.
    type Clip: Send;
    /// A text layer.
    type Overlay: Send;
    /// A clip with its overlay, ready to write.
    type Composite: Send;

    /// Open a source video.
    async fn load(&self, path: &Path) -> MediaResult<Self::Source>;

    /// Cut `[start, end)` seconds out of `source`.
    fn subclip(&self, source: &Self::Source, start: f64, end: f64) -> MediaResult<Self::Clip>;

    /// Change playback speed by `factor`; the clip duration becomes `duration / factor`.
    fn speed(&self, clip: Self::Clip, factor: f64) -> MediaResult<Self::Clip>;

    /// Fade in from black over the first `secs` seconds.
    fn fade_in(&self, clip: Self::Clip, secs: f64) -> MediaResult<Self::Clip>;

    /// Fade out to black over the last `secs` seconds.
    fn fade_out(&self, clip: Self::Clip, secs: f64) -> MediaResult<Self::Clip>;

    /// Build a text layer visible for `duration` seconds.
    fn text_overlay(&self, text: &str, style: &SubtitleStyle, duration: f64) -> MediaResult<Self::Overlay>;

    /// Stack `overlay` on top of `clip`.
    fn composite(&self, clip: Self::Clip, overlay: Self::Overlay) -> MediaResult<Self::Composite>;

    /// Encode `composite` to `output`.
    async fn write(&self, composite: Self::Composite, output: &Path, encoding: &EncodingConfig) -> MediaResult<()>;
}
