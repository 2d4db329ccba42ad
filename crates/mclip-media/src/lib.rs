//! Video rendering for MomentClip.
//!
//! This crate provides:
//! - The [`RenderEngine`] abstraction used by the clip assembler
//! - An FFmpeg-backed engine that renders each clip in a single pass
//! - Effect chain parsing (`speed`, `fadein`, `fadeout`)
//! - Subtitle styling via `drawtext`
//! - FFprobe video inspection

pub mod command;
pub mod effects;
pub mod engine;
pub mod error;
pub mod filters;
pub mod probe;
pub mod progress;
pub mod render;
pub mod subtitle;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use effects::{apply_effects, parse_effects};
pub use engine::RenderEngine;
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use progress::FfmpegProgress;
pub use render::{ClipPlan, CompositePlan, FfmpegEngine, SourceVideo, TextOverlay};
pub use subtitle::{wrap_text, SubtitleStyle};
