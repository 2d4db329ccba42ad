//! Wire types for the OpenAI-compatible API.

use mclip_models::{Transcript, TranscriptSegment};
use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object" }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice.
    pub fn into_content(self) -> OracleResult<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OracleError::invalid_response("No content in chat completion"))
    }
}

/// `verbose_json` transcription response.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSegment {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl TryFrom<TranscriptionResponse> for Transcript {
    type Error = OracleError;

    fn try_from(response: TranscriptionResponse) -> OracleResult<Self> {
        let segments = response
            .segments
            .into_iter()
            .map(|s| {
                TranscriptSegment::new(s.start, s.end, s.text)
                    .map_err(|e| OracleError::invalid_response(format!("Bad transcript segment: {}", e)))
            })
            .collect::<OracleResult<Vec<_>>>()?;

        Ok(Transcript::new(response.text, segments))
    }
}
