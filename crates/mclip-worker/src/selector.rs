//! Key-moment selection.
//!
//! The transcript is rendered as timestamped lines, sent to the scoring
//! oracle, and the JSON answer is turned into validated [`Moment`]s.
//! An answer that is not a moment list aborts the run; individual
//! candidates outside the duration bounds are dropped.

use std::sync::Arc;
use std::time::Instant;

use mclip_models::{Moment, MomentBounds, Transcript};
use mclip_oracle::MomentOracle;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{WorkerError, WorkerResult};
use crate::metrics;

/// Raw oracle answer.
#[derive(Debug, Deserialize)]
struct OracleMoments {
    moments: Vec<CandidateMoment>,
}

#[derive(Debug, Deserialize)]
struct CandidateMoment {
    start_time: f64,
    end_time: f64,
    #[serde(default)]
    text: String,
}

/// Render segments as `[12.0s - 18.5s]: text` lines in stored order.
pub fn timestamped_transcript(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|s| format!("[{:.1}s - {:.1}s]: {}", s.start, s.end, s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed instruction for the scoring oracle.
pub fn system_prompt(bounds: &MomentBounds) -> String {
    format!(
        r#"You are an expert video editor who finds the most engaging moments in video transcripts and turns them into short social media clips.

Rules:
- Propose 3 to 5 moments.
- Every moment MUST last between {min:.0} and {max:.0} seconds.
- Each moment must be self-contained and engaging on its own: a story, an insight, a joke or a strong opinion.
- Take start and end times from the timestamps in the transcript.

Answer with a single JSON object and nothing else, in exactly this shape:
{{
  "moments": [
    {{"start_time": 12.0, "end_time": 58.5, "text": "Why this moment works as a clip"}}
  ]
}}"#,
        min = bounds.min_secs,
        max = bounds.max_secs,
    )
}

/// Per-request instruction embedding the transcript.
pub fn user_prompt(transcript: &Transcript, bounds: &MomentBounds) -> String {
    format!(
        "Find 3 to 5 key moments for social media clips in this timestamped transcript.\n\n\
         TRANSCRIPT:\n{}\n\n\
         Each moment must be {:.0}-{:.0} seconds long and use timestamps from the transcript.",
        timestamped_transcript(transcript),
        bounds.min_secs,
        bounds.max_secs,
    )
}

/// Remove a surrounding markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Parse an oracle answer and keep the candidates whose duration is within `bounds`.
///
/// Invalid JSON, a missing `moments` array or a candidate without numeric
/// times is an [`WorkerError::OracleResponse`]. Out-of-range candidates are
/// logged and skipped; the oracle's order is kept.
pub fn parse_moments(raw: &str, bounds: &MomentBounds) -> WorkerResult<Vec<Moment>> {
    let parsed: OracleMoments = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| WorkerError::oracle_response(format!("Failed to parse moments JSON: {}", e)))?;

    metrics::record_moments_proposed(parsed.moments.len());

    let mut accepted = Vec::with_capacity(parsed.moments.len());
    for (position, candidate) in parsed.moments.into_iter().enumerate() {
        match Moment::accept(candidate.start_time, candidate.end_time, candidate.text, bounds) {
            Ok(moment) => accepted.push(moment),
            Err(rejection) => {
                warn!(
                    position = position,
                    start = candidate.start_time,
                    end = candidate.end_time,
                    reason = rejection.reason(),
                    "Dropping moment: {}",
                    rejection
                );
                metrics::record_moment_rejected(rejection.reason());
            }
        }
    }

    Ok(accepted)
}

/// Chooses clip-worthy moments with the help of a [`MomentOracle`].
#[derive(Clone)]
pub struct MomentSelector {
    oracle: Arc<dyn MomentOracle>,
    bounds: MomentBounds,
}

impl MomentSelector {
    pub fn new(oracle: Arc<dyn MomentOracle>, bounds: MomentBounds) -> Self {
        Self { oracle, bounds }
    }

    pub fn bounds(&self) -> &MomentBounds {
        &self.bounds
    }

    /// Ask the oracle for moments and return the ones within bounds.
    ///
    /// An empty result is valid. Oracle transport failures and
    /// uninterpretable answers are returned as errors.
    pub async fn select_moments(&self, transcript: &Transcript) -> WorkerResult<Vec<Moment>> {
        let system = system_prompt(&self.bounds);
        let user = user_prompt(transcript, &self.bounds);

        debug!(segments = transcript.segments.len(), prompt_chars = user.len(), "Scoring transcript");

        let started = Instant::now();
        let raw = self.oracle.complete_json(&system, &user).await;
        metrics::record_oracle_call("moments", started.elapsed().as_secs_f64());

        let moments = parse_moments(&raw?, &self.bounds)?;

        info!(accepted = moments.len(), "Selected key moments");
        Ok(moments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mclip_models::TranscriptSegment;
    use mclip_oracle::{OracleError, OracleResult};
    use std::sync::Mutex;

    /// Oracle returning a canned answer and recording the prompts it saw.
    struct CannedOracle {
        answer: OracleResult<String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl CannedOracle {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MomentOracle for CannedOracle {
        async fn complete_json(&self, system: &str, user: &str) -> OracleResult<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(OracleError::request_failed(e.to_string())),
            }
        }
    }

    fn transcript() -> Transcript {
        Transcript::new(
            "intro main point outro",
            vec![
                TranscriptSegment::new(0.0, 40.0, "intro").unwrap(),
                TranscriptSegment::new(40.0, 90.0, "main point").unwrap(),
                TranscriptSegment::new(90.0, 100.0, "outro").unwrap(),
            ],
        )
    }

    #[test]
    fn test_timestamped_transcript() {
        assert_eq!(
            timestamped_transcript(&transcript()),
            "[0.0s - 40.0s]: intro\n[40.0s - 90.0s]: main point\n[90.0s - 100.0s]: outro"
        );
        assert_eq!(timestamped_transcript(&Transcript::default()), "");
    }

    #[test]
    fn test_prompts_carry_bounds_and_transcript() {
        let bounds = MomentBounds::default();
        let system = system_prompt(&bounds);
        assert!(system.contains("between 30 and 120 seconds"));
        assert!(system.contains("\"moments\""));

        let user = user_prompt(&transcript(), &bounds);
        assert!(user.contains("[40.0s - 90.0s]: main point"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let raw = r#"{"moments": [
            {"start_time": 0, "end_time": 30, "text": "exactly min"},
            {"start_time": 10, "end_time": 130, "text": "exactly max"},
            {"start_time": 0, "end_time": 29.9, "text": "short"},
            {"start_time": 0, "end_time": 120.1, "text": "long"}
        ]}"#;

        let moments = parse_moments(raw, &MomentBounds::default()).unwrap();
        let texts: Vec<_> = moments.iter().map(|m| m.rationale.as_str()).collect();
        assert_eq!(texts, vec!["exactly min", "exactly max"]);
    }

    #[test]
    fn test_only_duration_filters_candidates() {
        let raw = r#"{"moments": [
            {"start_time": 90, "end_time": 30},
            {"start_time": -5, "end_time": 40},
            {"start_time": 100, "end_time": 160}
        ]}"#;

        let moments = parse_moments(raw, &MomentBounds::default()).unwrap();
        let ranges: Vec<_> = moments.iter().map(|m| (m.start, m.end)).collect();
        // A misplaced range with a valid duration is kept and fails at assembly
        assert_eq!(ranges, vec![(-5.0, 40.0), (100.0, 160.0)]);
        assert_eq!(moments[1].rationale, "");
    }

    #[test]
    fn test_structural_failures() {
        let bounds = MomentBounds::default();
        for raw in [
            "{not json",
            r#"{"clips": []}"#,
            r#"{"moments": null}"#,
            r#"{"moments": [{"start_time": "ten", "end_time": 50}]}"#,
            r#"{"moments": [{"end_time": 50}]}"#,
        ] {
            let err = parse_moments(raw, &bounds).unwrap_err();
            assert!(err.is_oracle_response(), "{raw}");
        }
    }

    #[test]
    fn test_empty_moment_list_is_valid() {
        assert!(parse_moments(r#"{"moments": []}"#, &MomentBounds::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_strips_code_fences() {
        let raw = "```json\n{\"moments\": [{\"start_time\": 0, \"end_time\": 60}]}\n```";
        assert_eq!(parse_moments(raw, &MomentBounds::default()).unwrap().len(), 1);
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[tokio::test]
    async fn test_select_moments() {
        let oracle = Arc::new(CannedOracle::answering(
            r#"{"moments": [{"start_time": 30, "end_time": 95, "text": "main point"}]}"#,
        ));
        let selector = MomentSelector::new(oracle.clone(), MomentBounds::default());

        let moments = selector.select_moments(&transcript()).await.unwrap();
        assert_eq!(moments, vec![Moment::new(30.0, 95.0, "main point").unwrap()]);

        let prompts = oracle.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].1.contains("[90.0s - 100.0s]: outro"));
    }

    #[tokio::test]
    async fn test_oracle_failure_is_fatal() {
        let oracle = Arc::new(CannedOracle {
            answer: Err(OracleError::request_failed("503")),
            prompts: Mutex::new(Vec::new()),
        });
        let selector = MomentSelector::new(oracle, MomentBounds::default());

        let err = selector.select_moments(&transcript()).await.unwrap_err();
        assert!(matches!(err, WorkerError::Oracle(_)));
    }
}
