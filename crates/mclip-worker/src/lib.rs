//! Key-moment selection and clip assembly.
//!
//! This crate provides:
//! - [`MomentSelector`]: prompts the scoring oracle and validates its answer
//! - [`ClipAssembler`]: renders each moment with per-clip failure isolation
//! - [`Pipeline`]: transcription, selection and assembly for one source video
//! - Configuration, run logging and metrics shared by the binaries

pub mod assembler;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod selector;

#[cfg(test)]
mod testing;

pub use assembler::{Assembly, ClipAssembler};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::RunLogger;
pub use pipeline::{ClipService, Pipeline};
pub use selector::{parse_moments, MomentSelector};
