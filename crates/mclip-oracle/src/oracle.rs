//! Oracle capability traits.

use std::path::Path;

use async_trait::async_trait;
use mclip_models::Transcript;

use crate::error::OracleResult;

/// Chat-style scorer that answers with a single JSON object.
#[async_trait]
pub trait MomentOracle: Send + Sync {
    /// Send one system/user prompt pair and return the raw response text.
    ///
    /// The text is not validated here; interpreting it is the caller's job.
    async fn complete_json(&self, system: &str, user: &str) -> OracleResult<String>;
}

/// Speech-to-text service producing timestamped segments.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, path: &Path) -> OracleResult<Transcript>;
}
