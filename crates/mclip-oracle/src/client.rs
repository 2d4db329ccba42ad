//! OpenAI-compatible HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use mclip_models::Transcript;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::error::{OracleError, OracleResult};
use crate::oracle::{MomentOracle, Transcriber};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat, TranscriptionResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MOMENT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TRANSCRIBE_MODEL: &str = "whisper-1";

/// Configuration for the oracle client.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// API key sent as a bearer token
    pub api_key: Option<String>,
    /// Base URL of the API (no trailing slash)
    pub base_url: String,
    /// Chat model used for moment scoring
    pub moment_model: String,
    /// Speech-to-text model
    pub transcribe_model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            moment_model: DEFAULT_MOMENT_MODEL.to_string(),
            transcribe_model: DEFAULT_TRANSCRIBE_MODEL.to_string(),
            // Long uploads and transcriptions
            timeout: Duration::from_secs(300),
        }
    }
}

impl OracleConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            moment_model: std::env::var("MOMENT_MODEL").unwrap_or(defaults.moment_model),
            transcribe_model: std::env::var("TRANSCRIBE_MODEL").unwrap_or(defaults.transcribe_model),
            timeout: std::env::var("ORACLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for chat completions and audio transcriptions.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    moment_model: String,
    transcribe_model: String,
}

impl OpenAiClient {
    /// Create a new client. Fails if no API key is configured.
    pub fn new(config: OracleConfig) -> OracleResult<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| OracleError::config("OPENAI_API_KEY is not set"))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(OracleError::Network)?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            moment_model: config.moment_model,
            transcribe_model: config.transcribe_model,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> OracleResult<Self> {
        Self::new(OracleConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map non-2xx responses to [`OracleError::RequestFailed`].
    async fn check_status(response: Response) -> OracleResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(OracleError::request_failed(format!(
            "API returned {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl MomentOracle for OpenAiClient {
    async fn complete_json(&self, system: &str, user: &str) -> OracleResult<String> {
        let request = ChatRequest {
            model: &self.moment_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat::json_object(),
        };

        debug!(model = %self.moment_model, prompt_chars = user.len(), "Requesting moment scoring");

        let response = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let chat: ChatResponse = response.json().await?;
        chat.into_content()
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(&self, path: &Path) -> OracleResult<Transcript> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.mp4".to_string());

        info!(
            path = %path.display(),
            size_bytes = bytes.len(),
            model = %self.transcribe_model,
            "Uploading media for transcription"
        );

        let form = Form::new()
            .text("model", self.transcribe_model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(self.url("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body: TranscriptionResponse = response.json().await?;
        let transcript = Transcript::try_from(body)?;

        debug!(segments = transcript.segments.len(), "Transcription complete");
        Ok(transcript)
    }
}
