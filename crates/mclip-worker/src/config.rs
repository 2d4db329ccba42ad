//! Worker configuration.

use std::path::PathBuf;
use std::str::FromStr;

use mclip_media::SubtitleStyle;
use mclip_models::{EncodingConfig, MomentBounds, MAX_MOMENT_SECS, MIN_MOMENT_SECS};

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory rendered clips are written to
    pub output_dir: PathBuf,
    /// Accepted moment durations
    pub bounds: MomentBounds,
    /// Subtitle style; the colour is replaced per request
    pub subtitle: SubtitleStyle,
    /// Kill a single clip encode after this many seconds
    pub render_timeout_secs: Option<u64>,
    /// Output encoding
    pub encoding: EncodingConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("clips"),
            bounds: MomentBounds::default(),
            subtitle: SubtitleStyle::default(),
            render_timeout_secs: None,
            encoding: EncodingConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        let defaults = Self::default();

        let bounds = MomentBounds::new(
            env_or("CLIP_MIN_SECS", MIN_MOMENT_SECS),
            env_or("CLIP_MAX_SECS", MAX_MOMENT_SECS),
        )
        .map_err(|e| WorkerError::config_error(e.to_string()))?;

        let subtitle = defaults
            .subtitle
            .with_font_size(env_or("SUBTITLE_FONT_SIZE", mclip_media::subtitle::DEFAULT_FONT_SIZE))
            .with_background_color(
                std::env::var("SUBTITLE_BG_COLOR")
                    .unwrap_or_else(|_| mclip_media::subtitle::DEFAULT_BACKGROUND_COLOR.to_string()),
            )
            .with_max_line_chars(env_or(
                "SUBTITLE_MAX_LINE_CHARS",
                mclip_media::subtitle::DEFAULT_MAX_LINE_CHARS,
            ));
        subtitle
            .validate()
            .map_err(|e| WorkerError::config_error(e.to_string()))?;

        let mut encoding = defaults.encoding;
        if let Ok(codec) = std::env::var("VIDEO_CODEC") {
            encoding = encoding.with_codec(codec);
        }

        Ok(Self {
            output_dir: std::env::var("CLIP_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            bounds,
            subtitle,
            render_timeout_secs: std::env::var("RENDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            encoding,
        })
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// Parse an env var, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("clips"));
        assert_eq!(config.bounds.min_secs, 30.0);
        assert_eq!(config.bounds.max_secs, 120.0);
        assert_eq!(config.subtitle.font_size, 24);
        assert_eq!(config.encoding.codec, "libx264");
        assert!(config.render_timeout_secs.is_none());
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("MCLIP_TEST_UNSET_VARIABLE", 42u32), 42);
    }
}
