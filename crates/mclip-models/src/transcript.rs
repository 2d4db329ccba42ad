//! Transcript models and the segment overlap query.
//!
//! Segments are produced by the transcription oracle and are read-only
//! input to the pipeline. Every downstream stage that needs "the words
//! spoken between two timestamps" goes through [`text_for_range`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// One timestamped span of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds (`end >= start`)
    pub end: f64,

    /// Spoken text
    pub text: String,
}

impl TranscriptSegment {
    /// Create a segment, rejecting `end < start` and non-finite bounds.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> ModelResult<Self> {
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(ModelError::invalid_range(start, end));
        }
        Ok(Self {
            start,
            end,
            text: text.into(),
        })
    }

    /// Inclusive overlap test: a segment touching the window boundary counts.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.end >= start && self.start <= end
    }

    /// Segment length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Full transcript of one source video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    /// Full transcription text
    #[serde(rename = "text")]
    pub full_text: String,

    /// Time-aligned segments, ordered by start time
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Create a new transcript.
    pub fn new(full_text: impl Into<String>, segments: Vec<TranscriptSegment>) -> Self {
        Self {
            full_text: full_text.into(),
            segments,
        }
    }

    /// Text spoken in `[start, end]`, see [`text_for_range`].
    pub fn text_for_range(&self, start: f64, end: f64) -> ModelResult<String> {
        text_for_range(&self.segments, start, end)
    }

    /// Check if the transcript has no timed segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End time of the last segment, if any.
    pub fn duration(&self) -> Option<f64> {
        self.segments.iter().map(|s| s.end).reduce(f64::max)
    }
}

/// Concatenate the text of every segment overlapping `[start, end]`.
///
/// A segment is included iff `segment.end >= start && segment.start <= end`.
/// Included texts are trimmed and joined with a single space in sequence
/// order; no re-ordering by time and no de-duplication. No overlap yields an
/// empty string.
///
/// # Errors
/// Returns [`ModelError::InvalidRange`] for negative or non-finite bounds or
/// when `end < start`.
pub fn text_for_range(segments: &[TranscriptSegment], start: f64, end: f64) -> ModelResult<String> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end < start {
        return Err(ModelError::invalid_range(start, end));
    }

    let texts: Vec<&str> = segments
        .iter()
        .filter(|seg| seg.overlaps(start, end))
        .map(|seg| seg.text.trim())
        .collect();

    Ok(texts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(start, end, text).unwrap()
    }

    fn sample() -> Vec<TranscriptSegment> {
        vec![
            seg(0.0, 40.0, "intro"),
            seg(40.0, 90.0, "main point"),
            seg(90.0, 100.0, "outro"),
        ]
    }

    #[test]
    fn test_overlap_includes_all_touching_segments() {
        let text = text_for_range(&sample(), 30.0, 95.0).unwrap();
        assert_eq!(text, "intro main point outro");
    }

    #[test]
    fn test_boundary_touch_is_included() {
        // Segment 1 ends exactly at the window start, segment 3 starts exactly at its end.
        let text = text_for_range(&sample(), 40.0, 90.0).unwrap();
        assert_eq!(text, "intro main point outro");
    }

    #[test]
    fn test_window_inside_one_segment() {
        let text = text_for_range(&sample(), 50.0, 60.0).unwrap();
        assert_eq!(text, "main point");
    }

    #[test]
    fn test_no_overlap_is_empty_not_error() {
        let text = text_for_range(&sample(), 150.0, 200.0).unwrap();
        assert_eq!(text, "");
        assert_eq!(text_for_range(&[], 0.0, 10.0).unwrap(), "");
    }

    #[test]
    fn test_text_is_trimmed_and_single_space_joined() {
        let segments = vec![seg(0.0, 5.0, "  hello  "), seg(5.0, 10.0, "\tworld\n")];
        assert_eq!(text_for_range(&segments, 0.0, 10.0).unwrap(), "hello world");
    }

    #[test]
    fn test_sequence_order_kept_and_no_dedup() {
        let segments = vec![
            seg(20.0, 30.0, "later"),
            seg(0.0, 10.0, "earlier"),
            seg(0.0, 10.0, "earlier"),
        ];
        assert_eq!(
            text_for_range(&segments, 0.0, 30.0).unwrap(),
            "later earlier earlier"
        );
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            text_for_range(&sample(), 10.0, 5.0),
            Err(ModelError::InvalidRange { .. })
        ));
        assert!(matches!(
            text_for_range(&sample(), -1.0, 5.0),
            Err(ModelError::InvalidRange { .. })
        ));
        assert!(matches!(
            text_for_range(&sample(), 0.0, f64::NAN),
            Err(ModelError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_zero_width_window() {
        assert_eq!(text_for_range(&sample(), 40.0, 40.0).unwrap(), "intro main point");
    }

    #[test]
    fn test_segment_rejects_reversed_bounds() {
        assert!(TranscriptSegment::new(5.0, 4.0, "x").is_err());
        assert!(TranscriptSegment::new(5.0, 5.0, "x").is_ok());
    }

    #[test]
    fn test_transcript_deserializes_whisper_shape() {
        let json = r#"{"text": "hi there", "segments": [{"start": 0.0, "end": 1.5, "text": " hi there"}]}"#;
        let transcript: Transcript = serde_json::from_str(json).unwrap();
        assert_eq!(transcript.full_text, "hi there");
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.duration(), Some(1.5));
        assert_eq!(transcript.text_for_range(0.0, 1.0).unwrap(), "hi there");
    }
}
