//! Model-level error types.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Invalid time range: [{start}, {end}]")]
    InvalidRange { start: f64, end: f64 },

    #[error("Invalid moment: {0}")]
    InvalidMoment(String),
}

impl ModelError {
    pub fn invalid_range(start: f64, end: f64) -> Self {
        Self::InvalidRange { start, end }
    }

    pub fn invalid_moment(msg: impl Into<String>) -> Self {
        Self::InvalidMoment(msg.into())
    }
}
