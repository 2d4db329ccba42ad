//! Shared data models for the MomentClip pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Transcripts and the segment overlap query
//! - Validated key moments and their duration bounds
//! - Effect specifications and chains
//! - Clip artifacts, per-clip failures and the batch outcome
//! - Encoding configuration

pub mod clip;
pub mod effect;
pub mod encoding;
pub mod error;
pub mod moment;
pub mod transcript;

// Re-export common types
pub use clip::{ClipArtifact, ClipFailure, ClipOptions, PipelineOutcome, DEFAULT_SUBTITLE_COLOR};
pub use effect::{EffectChain, EffectKind, EffectSpec};
pub use encoding::EncodingConfig;
pub use error::{ModelError, ModelResult};
pub use moment::{Moment, MomentBounds, MomentRejection, MAX_MOMENT_SECS, MIN_MOMENT_SECS};
pub use transcript::{text_for_range, Transcript, TranscriptSegment};
