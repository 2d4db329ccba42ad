//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// The scoring oracle answered with something that is not a moment list.
    #[error("Oracle response error: {0}")]
    OracleResponse(String),

    #[error("Oracle error: {0}")]
    Oracle(#[from] mclip_oracle::OracleError),

    #[error("Transcription failed: {0}")]
    Transcription(mclip_oracle::OracleError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] mclip_media::MediaError),

    #[error("Model error: {0}")]
    Model(#[from] mclip_models::ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn oracle_response(msg: impl Into<String>) -> Self {
        Self::OracleResponse(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if the run failed because the oracle output could not be interpreted.
    pub fn is_oracle_response(&self) -> bool {
        matches!(self, WorkerError::OracleResponse(_))
    }

    /// Check if an upstream service (oracle or transcriber) failed.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            WorkerError::OracleResponse(_) | WorkerError::Oracle(_) | WorkerError::Transcription(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(WorkerError::oracle_response("bad").is_oracle_response());
        assert!(WorkerError::oracle_response("bad").is_upstream());

        let err = WorkerError::Transcription(mclip_oracle::OracleError::request_failed("500"));
        assert!(err.is_upstream());
        assert!(!err.is_oracle_response());

        assert!(!WorkerError::config_error("x").is_upstream());
    }
}
