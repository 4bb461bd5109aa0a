use azureai_inference::{InferenceError, StatusCode};
use statsig_client::StatsigError;

/// Adapter result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the model client and server facade
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection parameters are missing or empty
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Endpoint is not a valid URL
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Remote call completed with a status other than 200 OK
    #[error("failed to {operation}: {status} {reason}")]
    Remote {
        /// What the client was trying to do
        operation: &'static str,
        /// HTTP status of the response
        status: u16,
        /// Reason phrase of the status
        reason: &'static str,
    },

    /// Inference service call failed
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// Telemetry client failed
    #[error(transparent)]
    Statsig(#[from] StatsigError),
}

impl Error {
    pub(crate) fn remote(operation: &'static str, status: StatusCode) -> Self {
        Self::Remote {
            operation,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default(),
        }
    }
}
