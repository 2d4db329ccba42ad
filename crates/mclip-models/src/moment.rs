//! Key-moment models.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Shortest accepted clip, in seconds.
pub const MIN_MOMENT_SECS: f64 = 30.0;
/// Longest accepted clip, in seconds.
pub const MAX_MOMENT_SECS: f64 = 120.0;

/// A time range selected for clipping.
///
/// Moments from the selector are only checked for duration; a range that
/// starts before zero is reported when its clip is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Moment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Why the scoring oracle picked this range
    #[serde(default)]
    pub rationale: String,
}

impl Moment {
    /// Create a moment with `0 <= start < end`.
    pub fn new(start: f64, end: f64, rationale: impl Into<String>) -> ModelResult<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end <= start {
            return Err(ModelError::invalid_range(start, end));
        }
        Ok(Self {
            start,
            end,
            rationale: rationale.into(),
        })
    }

    /// Build a moment from an oracle candidate if its duration is within `bounds`.
    ///
    /// The position of the range is not checked here.
    pub fn accept(
        start: f64,
        end: f64,
        rationale: impl Into<String>,
        bounds: &MomentBounds,
    ) -> Result<Self, MomentRejection> {
        bounds.check(start, end)?;
        Ok(Self {
            start,
            end,
            rationale: rationale.into(),
        })
    }

    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Inclusive duration bounds for accepted moments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MomentBounds {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for MomentBounds {
    fn default() -> Self {
        Self {
            min_secs: MIN_MOMENT_SECS,
            max_secs: MAX_MOMENT_SECS,
        }
    }
}

impl MomentBounds {
    /// Create bounds, rejecting an empty or negative interval.
    pub fn new(min_secs: f64, max_secs: f64) -> ModelResult<Self> {
        if !min_secs.is_finite() || !max_secs.is_finite() || min_secs <= 0.0 || max_secs < min_secs {
            return Err(ModelError::invalid_moment(format!(
                "duration bounds [{}, {}] are not a valid interval",
                min_secs, max_secs
            )));
        }
        Ok(Self { min_secs, max_secs })
    }

    /// Check the duration `end - start` of a candidate. Both bounds are inclusive.
    ///
    /// An inverted range has a negative duration and is too short.
    pub fn check(&self, start: f64, end: f64) -> Result<(), MomentRejection> {
        let duration = end - start;
        if !duration.is_finite() {
            return Err(MomentRejection::InvalidTimes { start, end });
        }

        if duration < self.min_secs {
            return Err(MomentRejection::TooShort {
                duration,
                min_secs: self.min_secs,
            });
        }
        if duration > self.max_secs {
            return Err(MomentRejection::TooLong {
                duration,
                max_secs: self.max_secs,
            });
        }
        Ok(())
    }
}

/// Why a candidate range was dropped by the selector.
#[derive(Debug, Clone, PartialEq)]
pub enum MomentRejection {
    TooShort { duration: f64, min_secs: f64 },
    TooLong { duration: f64, max_secs: f64 },
    InvalidTimes { start: f64, end: f64 },
}

impl MomentRejection {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::InvalidTimes { .. } => "invalid_times",
        }
    }
}

impl fmt::Display for MomentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { duration, min_secs } => {
                write!(f, "too short ({:.1}s < {:.0}s)", duration, min_secs)
            }
            Self::TooLong { duration, max_secs } => {
                write!(f, "too long ({:.1}s > {:.0}s)", duration, max_secs)
            }
            Self::InvalidTimes { start, end } => {
                write!(f, "invalid time range [{}, {}]", start, end)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = MomentBounds::default();
        assert!(bounds.check(0.0, 30.0).is_ok());
        assert!(bounds.check(10.0, 130.0).is_ok());
        assert!(bounds.check(0.0, 29.9).is_err());
        assert!(bounds.check(0.0, 120.1).is_err());
    }

    #[test]
    fn test_rejection_reasons() {
        let bounds = MomentBounds::default();
        assert_eq!(bounds.check(0.0, 10.0).unwrap_err().reason(), "too_short");
        assert_eq!(bounds.check(0.0, 500.0).unwrap_err().reason(), "too_long");
        assert_eq!(bounds.check(50.0, 20.0).unwrap_err().reason(), "too_short");
        assert_eq!(
            bounds.check(f64::NAN, 40.0).unwrap_err().reason(),
            "invalid_times"
        );
    }

    #[test]
    fn test_only_duration_decides_acceptance() {
        let bounds = MomentBounds::default();
        let moment = Moment::accept(-5.0, 40.0, "", &bounds).unwrap();
        assert_eq!(moment.duration(), 45.0);
        assert!(Moment::new(-5.0, 40.0, "").is_err());
    }

    #[test]
    fn test_accept_builds_moment() {
        let moment = Moment::accept(30.0, 95.0, "main point", &MomentBounds::default()).unwrap();
        assert_eq!(moment.duration(), 65.0);
        assert_eq!(moment.rationale, "main point");
    }

    #[test]
    fn test_moment_requires_positive_length() {
        assert!(Moment::new(10.0, 10.0, "").is_err());
        assert!(Moment::new(10.0, 11.0, "").is_ok());
    }

    #[test]
    fn test_custom_bounds_validation() {
        assert!(MomentBounds::new(30.0, 120.0).is_ok());
        assert!(MomentBounds::new(60.0, 30.0).is_err());
        assert!(MomentBounds::new(0.0, 30.0).is_err());
    }

    #[test]
    fn test_rejection_display() {
        let rejection = MomentBounds::default().check(0.0, 12.0).unwrap_err();
        assert_eq!(rejection.to_string(), "too short (12.0s < 30s)");
    }
}
