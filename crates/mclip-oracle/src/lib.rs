//! Clients for the external inference services used by the pipeline.
//!
//! Two capabilities are modelled as traits so the pipeline can run against
//! fakes in tests:
//! - [`MomentOracle`]: scores a transcript and returns raw JSON text
//! - [`Transcriber`]: turns a media file into a timestamped [`Transcript`]
//!
//! [`OpenAiClient`] implements both against an OpenAI-compatible API.
//!
//! [`Transcript`]: mclip_models::Transcript

pub mod client;
pub mod error;
pub mod oracle;
pub mod types;

pub use client::{OpenAiClient, OracleConfig};
pub use error::{OracleError, OracleResult};
pub use oracle::{MomentOracle, Transcriber};
