//! Pipeline metrics.

/// Metric names.
pub mod names {
    pub const MOMENTS_PROPOSED_TOTAL: &str = "mclip_moments_proposed_total";
    pub const MOMENTS_REJECTED_TOTAL: &str = "mclip_moments_rejected_total";
    pub const CLIPS_RENDERED_TOTAL: &str = "mclip_clips_rendered_total";
    pub const CLIPS_FAILED_TOTAL: &str = "mclip_clips_failed_total";
    pub const RENDER_DURATION_SECONDS: &str = "mclip_render_duration_seconds";
    pub const ORACLE_DURATION_SECONDS: &str = "mclip_oracle_duration_seconds";
}

pub fn record_moments_proposed(count: usize) {
    metrics::counter!(names::MOMENTS_PROPOSED_TOTAL).increment(count as u64);
}

pub fn record_moment_rejected(reason: &'static str) {
    metrics::counter!(names::MOMENTS_REJECTED_TOTAL, "reason" => reason).increment(1);
}

pub fn record_clip_rendered(duration_secs: f64) {
    metrics::counter!(names::CLIPS_RENDERED_TOTAL).increment(1);
    metrics::histogram!(names::RENDER_DURATION_SECONDS).record(duration_secs);
}

pub fn record_clip_failed() {
    metrics::counter!(names::CLIPS_FAILED_TOTAL).increment(1);
}

/// `call` is `"moments"` or `"transcribe"`.
pub fn record_oracle_call(call: &'static str, duration_secs: f64) {
    metrics::histogram!(names::ORACLE_DURATION_SECONDS, "call" => call).record(duration_secs);
}
