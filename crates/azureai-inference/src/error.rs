/// Inference client result type
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Errors from the inference client
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status
    #[error("inference API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Failed to decode a response body
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Stream broke off mid-response
    #[error("stream error: {0}")]
    Stream(String),
}
